//! Entry-level balance verification.
//!
//! Every journal entry must satisfy `sum(debits) == sum(credits)` before it
//! can be posted.

use rust_decimal::Decimal;
use tally_shared::types::JournalEntryId;

use super::error::LedgerError;
use super::types::{NewLine, TransactionLine, TxType};

/// Debit and credit totals of a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
}

impl EntryTotals {
    /// Sums persisted lines.
    #[must_use]
    pub fn of(lines: &[TransactionLine]) -> Self {
        Self::from_pairs(lines.iter().map(|l| (l.tx_type, l.amount)))
    }

    /// Sums lines that are not persisted yet.
    #[must_use]
    pub fn of_new(lines: &[NewLine]) -> Self {
        Self::from_pairs(lines.iter().map(|l| (l.tx_type, l.amount)))
    }

    fn from_pairs(pairs: impl Iterator<Item = (TxType, Decimal)>) -> Self {
        let mut totals = Self {
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
        };
        for (tx_type, amount) in pairs {
            match tx_type {
                TxType::Debit => totals.debit += amount,
                TxType::Credit => totals.credit += amount,
            }
        }
        totals
    }

    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Verifies the balance invariant of an entry's lines without mutating anything.
///
/// # Errors
///
/// Returns `EmptyEntry` when there are no lines and `UnbalancedEntry` when
/// debits and credits differ.
pub fn verify_lines(
    entry_id: JournalEntryId,
    lines: &[TransactionLine],
) -> Result<EntryTotals, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::EmptyEntry(entry_id));
    }

    let totals = EntryTotals::of(lines);
    if !totals.is_balanced() {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_shared::types::{AccountId, TransactionLineId};

    fn make_line(tx_type: TxType, amount: Decimal) -> TransactionLine {
        TransactionLine {
            id: TransactionLineId::new(),
            journal_entry_id: JournalEntryId::new(),
            account_id: AccountId::new(),
            amount,
            tx_type,
            description: None,
            position: 0,
        }
    }

    #[test]
    fn test_balanced_lines() {
        let lines = vec![
            make_line(TxType::Debit, dec!(110.00)),
            make_line(TxType::Credit, dec!(100.00)),
            make_line(TxType::Credit, dec!(10.00)),
        ];
        let totals = verify_lines(JournalEntryId::new(), &lines).unwrap();
        assert_eq!(totals.debit, dec!(110.00));
        assert_eq!(totals.credit, dec!(110.00));
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_unbalanced_lines() {
        let lines = vec![
            make_line(TxType::Debit, dec!(100.00)),
            make_line(TxType::Credit, dec!(100.00)),
            make_line(TxType::Credit, dec!(10.00)),
        ];
        assert!(matches!(
            verify_lines(JournalEntryId::new(), &lines),
            Err(LedgerError::UnbalancedEntry { debit, credit })
                if debit == dec!(100) && credit == dec!(110)
        ));
    }

    #[test]
    fn test_empty_entry() {
        assert!(matches!(
            verify_lines(JournalEntryId::new(), &[]),
            Err(LedgerError::EmptyEntry(_))
        ));
    }

    #[test]
    fn test_totals_of_new_lines() {
        let account = AccountId::new();
        let totals = EntryTotals::of_new(&[
            NewLine::debit(account, dec!(30)),
            NewLine::credit(account, dec!(20)),
            NewLine::credit(account, dec!(10)),
        ]);
        assert!(totals.is_balanced());
    }
}
