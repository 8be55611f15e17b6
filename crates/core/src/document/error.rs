//! Document lifecycle error types.

use rust_decimal::Decimal;
use tally_shared::AppError;
use tally_shared::types::{DocumentId, PaymentId};
use thiserror::Error;

use super::types::DocumentStatus;
use crate::ledger::LedgerError;
use crate::store::StoreError;

/// Errors that can occur during document lifecycle operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document not found.
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// Document is voided and accepts no payments.
    #[error("Document {0} is voided")]
    DocumentVoided(DocumentId),

    /// Refund amount is not positive or exceeds the paid total.
    #[error("Invalid refund amount {requested}; paid total is {paid}")]
    InvalidRefundAmount {
        /// Requested refund.
        requested: Decimal,
        /// Paid total at request time.
        paid: Decimal,
    },

    /// Document or payment amount must be positive with at most two decimal places.
    #[error("Amount must be positive with at most two decimal places, got {0}")]
    InvalidAmount(Decimal),

    /// Operation is not allowed in the current status.
    #[error("Cannot {action} a document in status {from}")]
    InvalidTransition {
        /// Current status.
        from: DocumentStatus,
        /// Attempted operation.
        action: &'static str,
    },

    /// Payment is already posted.
    #[error("Payment {0} is already posted")]
    PaymentAlreadyPosted(PaymentId),

    /// Ledger error.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DocumentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DocumentNotFound(_) => "DOCUMENT_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::DocumentVoided(_) => "DOCUMENT_VOIDED",
            Self::InvalidRefundAmount { .. } => "INVALID_REFUND_AMOUNT",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::PaymentAlreadyPosted(_) => "PAYMENT_ALREADY_POSTED",
            Self::Ledger(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Ledger(e) => e.is_retryable(),
            Self::Store(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        let message = err.to_string();
        match err {
            DocumentError::Ledger(e) => e.into(),
            DocumentError::Store(e) => LedgerError::Store(e).into(),
            DocumentError::DocumentNotFound(_) | DocumentError::PaymentNotFound(_) => {
                Self::NotFound(message)
            }
            DocumentError::InvalidRefundAmount { .. } | DocumentError::InvalidAmount(_) => {
                Self::Validation(message)
            }
            DocumentError::DocumentVoided(_)
            | DocumentError::InvalidTransition { .. }
            | DocumentError::PaymentAlreadyPosted(_) => Self::BusinessRule(message),
        }
    }
}
