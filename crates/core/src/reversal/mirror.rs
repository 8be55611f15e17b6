//! Mirror line construction for reversal entries.

use rust_decimal::Decimal;
use tally_shared::types::round_money;

use crate::ledger::{EntryTotals, LedgerError, NewLine, TransactionLine, TxType};

/// How much of the original entry a reversal cancels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReversalPolicy {
    /// Cancel every line in full (void).
    Full,
    /// Cancel `refund_amount / document_amount` of every line (refund).
    Proportional {
        /// Amount being refunded.
        refund_amount: Decimal,
        /// Amount of the document the original entry booked.
        document_amount: Decimal,
    },
}

impl ReversalPolicy {
    /// Prefix of mirrored line descriptions.
    #[must_use]
    pub const fn line_prefix(self) -> &'static str {
        match self {
            Self::Full => "Reversal of: ",
            Self::Proportional { .. } => "Refund reversal of: ",
        }
    }
}

/// Builds the mirror image of `lines`: same accounts and order, opposite polarity.
///
/// Under a proportional policy every amount is scaled and rounded to cents;
/// the rounding residual goes to the largest line of the short side so the
/// result balances, and lines that round to zero are dropped.
///
/// # Errors
///
/// Returns `InvalidAmount` for a proportional policy with a non-positive
/// document or refund amount.
pub fn mirror_lines(
    lines: &[TransactionLine],
    fallback_description: &str,
    policy: ReversalPolicy,
) -> Result<Vec<NewLine>, LedgerError> {
    let prefix = policy.line_prefix();
    let mut mirrored: Vec<NewLine> = lines
        .iter()
        .map(|line| NewLine {
            account_id: line.account_id,
            amount: line.amount,
            tx_type: line.tx_type.opposite(),
            description: Some(format!(
                "{prefix}{}",
                line.description.as_deref().unwrap_or(fallback_description)
            )),
        })
        .collect();

    if let ReversalPolicy::Proportional {
        refund_amount,
        document_amount,
    } = policy
    {
        if document_amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(document_amount));
        }
        if refund_amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(refund_amount));
        }
        for line in &mut mirrored {
            line.amount = round_money(refund_amount * line.amount / document_amount);
        }
        rebalance(&mut mirrored);
        mirrored.retain(|line| !line.amount.is_zero());
    }

    Ok(mirrored)
}

/// Adds the debit/credit difference to the largest line of the short side.
fn rebalance(lines: &mut [NewLine]) {
    let difference = EntryTotals::of_new(lines).difference();
    if difference.is_zero() {
        return;
    }
    let short_side = if difference > Decimal::ZERO {
        TxType::Credit
    } else {
        TxType::Debit
    };

    let mut largest: Option<usize> = None;
    for (i, line) in lines.iter().enumerate() {
        if line.tx_type == short_side && largest.is_none_or(|j| line.amount > lines[j].amount) {
            largest = Some(i);
        }
    }
    if let Some(i) = largest {
        lines[i].amount += difference.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_shared::types::{AccountId, JournalEntryId, TransactionLineId};

    fn line(tx_type: TxType, amount: Decimal, description: Option<&str>) -> TransactionLine {
        TransactionLine {
            id: TransactionLineId::new(),
            journal_entry_id: JournalEntryId::new(),
            account_id: AccountId::new(),
            amount,
            tx_type,
            description: description.map(str::to_string),
            position: 0,
        }
    }

    #[test]
    fn test_full_mirror_flips_polarity() {
        let original = vec![
            line(TxType::Credit, dec!(100.00), None),
            line(TxType::Debit, dec!(100.00), Some("Receivable")),
        ];

        let mirrored = mirror_lines(&original, "Invoice: Acme", ReversalPolicy::Full).unwrap();

        assert_eq!(mirrored.len(), 2);
        assert_eq!(mirrored[0].tx_type, TxType::Debit);
        assert_eq!(mirrored[0].account_id, original[0].account_id);
        assert_eq!(mirrored[0].amount, dec!(100.00));
        assert_eq!(mirrored[0].description.as_deref(), Some("Reversal of: Invoice: Acme"));
        assert_eq!(mirrored[1].tx_type, TxType::Credit);
        assert_eq!(mirrored[1].description.as_deref(), Some("Reversal of: Receivable"));
    }

    #[test]
    fn test_proportional_mirror_scales_lines() {
        let original = vec![
            line(TxType::Credit, dec!(100.00), None),
            line(TxType::Credit, dec!(10.00), Some("VAT")),
            line(TxType::Debit, dec!(110.00), None),
        ];
        let policy = ReversalPolicy::Proportional {
            refund_amount: dec!(40),
            document_amount: dec!(100),
        };

        let mirrored = mirror_lines(&original, "Invoice: Acme", policy).unwrap();

        let amounts: Vec<_> = mirrored.iter().map(|l| l.amount).collect();
        assert_eq!(amounts, vec![dec!(40.00), dec!(4.00), dec!(44.00)]);
        assert_eq!(
            mirrored[1].description.as_deref(),
            Some("Refund reversal of: VAT")
        );
    }

    #[test]
    fn test_proportional_residual_lands_on_largest_short_line() {
        // Half of 0.05 rounds to 0.02 twice, half of 0.10 is 0.05.
        let original = vec![
            line(TxType::Credit, dec!(0.05), None),
            line(TxType::Credit, dec!(0.05), None),
            line(TxType::Debit, dec!(0.10), None),
        ];
        let policy = ReversalPolicy::Proportional {
            refund_amount: dec!(1),
            document_amount: dec!(2),
        };

        let mirrored = mirror_lines(&original, "x", policy).unwrap();

        let amounts: Vec<_> = mirrored.iter().map(|l| l.amount).collect();
        assert_eq!(amounts, vec![dec!(0.03), dec!(0.02), dec!(0.05)]);
        assert!(EntryTotals::of_new(&mirrored).is_balanced());
    }

    #[test]
    fn test_proportional_drops_lines_rounding_to_zero() {
        let original = vec![
            line(TxType::Credit, dec!(0.01), None),
            line(TxType::Credit, dec!(99.99), None),
            line(TxType::Debit, dec!(100.00), None),
        ];
        let policy = ReversalPolicy::Proportional {
            refund_amount: dec!(10),
            document_amount: dec!(100),
        };

        let mirrored = mirror_lines(&original, "x", policy).unwrap();

        assert_eq!(mirrored.len(), 2);
        assert!(EntryTotals::of_new(&mirrored).is_balanced());
        assert!(mirrored.iter().all(|l| l.amount > Decimal::ZERO));
    }

    #[test]
    fn test_proportional_rejects_zero_document_amount() {
        let original = vec![
            line(TxType::Debit, dec!(1), None),
            line(TxType::Credit, dec!(1), None),
        ];
        let policy = ReversalPolicy::Proportional {
            refund_amount: dec!(1),
            document_amount: Decimal::ZERO,
        };

        assert!(matches!(
            mirror_lines(&original, "x", policy),
            Err(LedgerError::InvalidAmount(_))
        ));
    }
}
