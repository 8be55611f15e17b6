//! Property-based tests for entry balance verification.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, JournalEntryId, TransactionLineId};

use super::balance::{EntryTotals, verify_lines};
use super::error::LedgerError;
use super::types::{TransactionLine, TxType};

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

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

/// Builds lines whose debits are the given amounts and whose single credit
/// line carries the total.
fn balanced_lines(debits: &[Decimal]) -> Vec<TransactionLine> {
    let total: Decimal = debits.iter().sum();
    let mut lines: Vec<_> = debits.iter().map(|a| make_line(TxType::Debit, *a)).collect();
    lines.push(make_line(TxType::Credit, total));
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any split of a total into debit lines against one credit line balances.
    #[test]
    fn prop_split_debits_balance(debits in prop::collection::vec(positive_amount(), 1..10)) {
        let lines = balanced_lines(&debits);
        let totals = verify_lines(JournalEntryId::new(), &lines);
        prop_assert!(totals.is_ok(), "expected balanced, got {:?}", totals);
        let totals = totals.unwrap();
        prop_assert_eq!(totals.debit, totals.credit);
    }

    /// Nudging any line by a cent unbalances the entry.
    #[test]
    fn prop_off_by_one_cent_rejected(
        debits in prop::collection::vec(positive_amount(), 1..10),
        index in any::<prop::sample::Index>(),
    ) {
        let mut lines = balanced_lines(&debits);
        let i = index.index(lines.len());
        lines[i].amount += Decimal::new(1, 2);

        let result = verify_lines(JournalEntryId::new(), &lines);
        prop_assert!(
            matches!(result, Err(LedgerError::UnbalancedEntry { .. })),
            "expected unbalanced, got {:?}",
            result
        );
    }

    /// Flipping every line's polarity preserves the balance.
    #[test]
    fn prop_mirrored_lines_stay_balanced(
        debits in prop::collection::vec(positive_amount(), 1..10),
    ) {
        let mirrored: Vec<_> = balanced_lines(&debits)
            .into_iter()
            .map(|mut l| {
                l.tx_type = l.tx_type.opposite();
                l
            })
            .collect();
        let totals = EntryTotals::of(&mirrored);
        prop_assert!(totals.is_balanced());
    }
}
