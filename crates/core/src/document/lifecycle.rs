//! Document status rules.
//!
//! Pure functions over statuses and amounts; the service applies them under
//! the document's row lock.

use rust_decimal::Decimal;
use tally_shared::types::fits_money_scale;

use super::error::DocumentError;
use super::types::{Document, DocumentStatus};

/// Derives the status of a document from its posted payment total.
///
/// Settled statuses (voided, cancelled, refunded, partially refunded) are
/// returned unchanged. With nothing paid, draft and submitted documents keep
/// their status and anything else becomes unpaid.
#[must_use]
pub fn derive_status(current: DocumentStatus, amount: Decimal, paid: Decimal) -> DocumentStatus {
    if current.is_settled() {
        return current;
    }
    if paid >= amount {
        DocumentStatus::Paid
    } else if paid > Decimal::ZERO {
        DocumentStatus::Partial
    } else {
        match current {
            DocumentStatus::Draft | DocumentStatus::Submitted => current,
            _ => DocumentStatus::Unpaid,
        }
    }
}

/// Rejects payments on documents that no longer accept them.
pub fn ensure_payable(document: &Document) -> Result<(), DocumentError> {
    match document.status {
        DocumentStatus::Voided => Err(DocumentError::DocumentVoided(document.id)),
        status if status.is_settled() => Err(DocumentError::InvalidTransition {
            from: status,
            action: "pay",
        }),
        _ => Ok(()),
    }
}

/// Voids are allowed from draft, submitted, and partial.
pub fn ensure_voidable(status: DocumentStatus) -> Result<(), DocumentError> {
    match status {
        DocumentStatus::Draft | DocumentStatus::Submitted | DocumentStatus::Partial => Ok(()),
        from => Err(DocumentError::InvalidTransition { from, action: "void" }),
    }
}

/// Resolves the refund amount; `None` refunds everything paid.
///
/// # Errors
///
/// Returns `InvalidRefundAmount` if the amount is not positive, exceeds
/// the paid total, or has more than two decimal places.
pub fn refund_amount(
    requested: Option<Decimal>,
    paid: Decimal,
) -> Result<Decimal, DocumentError> {
    let amount = requested.unwrap_or(paid);
    if amount <= Decimal::ZERO || amount > paid || !fits_money_scale(amount) {
        return Err(DocumentError::InvalidRefundAmount { requested: amount, paid });
    }
    Ok(amount)
}

/// Status after refunding `refund` out of `paid`.
#[must_use]
pub fn status_after_refund(paid: Decimal, refund: Decimal) -> DocumentStatus {
    if (paid - refund).is_zero() {
        DocumentStatus::Refunded
    } else {
        DocumentStatus::PartialRefund
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(DocumentStatus::Submitted, dec!(0), DocumentStatus::Submitted)]
    #[case(DocumentStatus::Draft, dec!(0), DocumentStatus::Draft)]
    #[case(DocumentStatus::Partial, dec!(0), DocumentStatus::Unpaid)]
    #[case(DocumentStatus::Submitted, dec!(30), DocumentStatus::Partial)]
    #[case(DocumentStatus::Partial, dec!(100), DocumentStatus::Paid)]
    #[case(DocumentStatus::Partial, dec!(120), DocumentStatus::Paid)]
    #[case(DocumentStatus::Voided, dec!(100), DocumentStatus::Voided)]
    #[case(DocumentStatus::PartialRefund, dec!(60), DocumentStatus::PartialRefund)]
    #[case(DocumentStatus::Refunded, dec!(0), DocumentStatus::Refunded)]
    #[case(DocumentStatus::Cancelled, dec!(0), DocumentStatus::Cancelled)]
    fn test_derive_status(
        #[case] current: DocumentStatus,
        #[case] paid: Decimal,
        #[case] expected: DocumentStatus,
    ) {
        assert_eq!(derive_status(current, dec!(100), paid), expected);
    }

    #[test]
    fn test_derive_status_is_idempotent() {
        let once = derive_status(DocumentStatus::Submitted, dec!(100), dec!(30));
        assert_eq!(derive_status(once, dec!(100), dec!(30)), once);
    }

    #[rstest]
    #[case(DocumentStatus::Draft, true)]
    #[case(DocumentStatus::Submitted, true)]
    #[case(DocumentStatus::Partial, true)]
    #[case(DocumentStatus::Paid, false)]
    #[case(DocumentStatus::Voided, false)]
    #[case(DocumentStatus::Refunded, false)]
    fn test_voidable(#[case] status: DocumentStatus, #[case] allowed: bool) {
        assert_eq!(ensure_voidable(status).is_ok(), allowed);
    }

    #[rstest]
    #[case(None, dec!(100), Some(dec!(100)))]
    #[case(Some(dec!(40)), dec!(100), Some(dec!(40)))]
    #[case(Some(dec!(100)), dec!(100), Some(dec!(100)))]
    #[case(Some(dec!(0)), dec!(100), None)]
    #[case(Some(dec!(-5)), dec!(100), None)]
    #[case(Some(dec!(100.01)), dec!(100), None)]
    #[case(None, dec!(0), None)]
    #[case(Some(dec!(10.005)), dec!(100), None)]
    #[case(Some(dec!(10.500)), dec!(100), Some(dec!(10.5)))]
    fn test_refund_amount(
        #[case] requested: Option<Decimal>,
        #[case] paid: Decimal,
        #[case] expected: Option<Decimal>,
    ) {
        assert_eq!(refund_amount(requested, paid).ok(), expected);
    }

    #[test]
    fn test_status_after_refund() {
        assert_eq!(status_after_refund(dec!(100), dec!(100)), DocumentStatus::Refunded);
        assert_eq!(status_after_refund(dec!(100), dec!(40)), DocumentStatus::PartialRefund);
    }
}
