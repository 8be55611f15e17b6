//! Invoice, bill, and payment types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{CompanyId, DocumentId, JournalEntryId, PaymentId};

/// Receivable or payable document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Customer invoice (receivable).
    Invoice,
    /// Vendor bill (payable).
    Bill,
}

impl DocumentKind {
    /// Returns the persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Bill => "bill",
        }
    }

    /// Returns the human label used in entry descriptions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::Bill => "Bill",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoice" => Ok(Self::Invoice),
            "bill" => Ok(Self::Bill),
            _ => Err(format!("Unknown document kind: {s}")),
        }
    }
}

/// Document status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Not yet submitted; no ledger effect.
    Draft,
    /// Submitted; originating entry posted.
    Submitted,
    /// Fully paid.
    Paid,
    /// Partially paid.
    Partial,
    /// Nothing paid.
    Unpaid,
    /// Voided; originating entry reversed.
    Voided,
    /// Fully refunded.
    Refunded,
    /// Partially refunded.
    PartialRefund,
    /// Cancelled while in draft.
    Cancelled,
}

impl DocumentStatus {
    /// Returns the persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Paid => "paid",
            Self::Partial => "partial",
            Self::Unpaid => "unpaid",
            Self::Voided => "voided",
            Self::Refunded => "refunded",
            Self::PartialRefund => "partial_refund",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true for statuses payment recomputation never overrides.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Voided | Self::Cancelled | Self::Refunded | Self::PartialRefund)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "paid" => Ok(Self::Paid),
            "partial" => Ok(Self::Partial),
            "unpaid" => Ok(Self::Unpaid),
            "voided" => Ok(Self::Voided),
            "refunded" => Ok(Self::Refunded),
            "partial_refund" => Ok(Self::PartialRefund),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown document status: {s}")),
        }
    }
}

/// An invoice or a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier.
    pub id: DocumentId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Invoice or bill.
    pub kind: DocumentKind,
    /// Customer (invoice) or vendor (bill) name.
    pub counterparty: String,
    /// Positive amount, fixed at creation.
    pub amount: Decimal,
    /// Current status.
    pub status: DocumentStatus,
    /// The originating entry posted on submission.
    pub journal_entry_id: Option<JournalEntryId>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
}

/// Payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash.
    #[default]
    Cash,
    /// Bank transfer.
    Bank,
    /// Card.
    Card,
    /// Anything else.
    Other,
}

impl PaymentMethod {
    /// Returns the persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
            Self::Card => "card",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "bank" => Ok(Self::Bank),
            "card" => Ok(Self::Card),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown payment method: {s}")),
        }
    }
}

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Recorded but not counted towards the paid total.
    Pending,
    /// Counted towards the paid total.
    #[default]
    Posted,
}

impl PaymentStatus {
    /// Returns the persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Posted => "posted",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "posted" => Ok(Self::Posted),
            _ => Err(format!("Unknown payment status: {s}")),
        }
    }
}

/// A payment against a document; negative amounts are refunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// The paid document.
    pub document_id: DocumentId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Signed amount.
    pub amount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Pending or posted.
    pub status: PaymentStatus,
    /// The cash-movement entry this payment produced.
    pub journal_entry_id: Option<JournalEntryId>,
    /// When the payment was recorded.
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    /// Returns true for refund payments.
    #[must_use]
    pub fn is_refund(&self) -> bool {
        self.amount.is_sign_negative()
    }
}

/// Paid total and remaining balance of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentBalance {
    /// Sum of posted payments.
    pub paid_amount: Decimal,
    /// `amount - paid_amount`.
    pub balance_due: Decimal,
}

/// Input for creating a document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Owning company.
    pub company_id: CompanyId,
    /// Invoice or bill.
    pub kind: DocumentKind,
    /// Customer or vendor name.
    pub counterparty: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Initial status: `draft` or `submitted`.
    pub status: DocumentStatus,
}

impl NewDocument {
    /// A draft invoice.
    #[must_use]
    pub fn invoice(company_id: CompanyId, customer: impl Into<String>, amount: Decimal) -> Self {
        Self {
            company_id,
            kind: DocumentKind::Invoice,
            counterparty: customer.into(),
            amount,
            status: DocumentStatus::Draft,
        }
    }

    /// A draft bill.
    #[must_use]
    pub fn bill(company_id: CompanyId, vendor: impl Into<String>, amount: Decimal) -> Self {
        Self {
            company_id,
            kind: DocumentKind::Bill,
            counterparty: vendor.into(),
            amount,
            status: DocumentStatus::Draft,
        }
    }

    /// Creates the document already submitted.
    #[must_use]
    pub fn submitted(mut self) -> Self {
        self.status = DocumentStatus::Submitted;
        self
    }
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// The paid document.
    pub document_id: DocumentId,
    /// Positive amount.
    pub amount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// `posted` books immediately, `pending` waits for confirmation.
    pub status: PaymentStatus,
}

impl NewPayment {
    /// A posted payment.
    #[must_use]
    pub fn new(document_id: DocumentId, amount: Decimal, method: PaymentMethod) -> Self {
        Self {
            document_id,
            amount,
            method,
            status: PaymentStatus::Posted,
        }
    }

    /// Records the payment as pending.
    #[must_use]
    pub fn pending(mut self) -> Self {
        self.status = PaymentStatus::Pending;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DocumentStatus::Draft)]
    #[case(DocumentStatus::Submitted)]
    #[case(DocumentStatus::Paid)]
    #[case(DocumentStatus::Partial)]
    #[case(DocumentStatus::Unpaid)]
    #[case(DocumentStatus::Voided)]
    #[case(DocumentStatus::Refunded)]
    #[case(DocumentStatus::PartialRefund)]
    #[case(DocumentStatus::Cancelled)]
    fn test_status_round_trips_through_str(#[case] status: DocumentStatus) {
        assert_eq!(status.as_str().parse::<DocumentStatus>().unwrap(), status);
    }

    #[test]
    fn test_partial_refund_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(DocumentStatus::PartialRefund).unwrap(),
            serde_json::json!("partial_refund")
        );
    }

    #[test]
    fn test_settled_statuses() {
        assert!(DocumentStatus::Voided.is_settled());
        assert!(DocumentStatus::PartialRefund.is_settled());
        assert!(!DocumentStatus::Paid.is_settled());
        assert!(!DocumentStatus::Submitted.is_settled());
    }
}
