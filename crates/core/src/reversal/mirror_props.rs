//! Property-based tests for mirror line construction.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, JournalEntryId, TransactionLineId};

use super::mirror::{ReversalPolicy, mirror_lines};
use crate::ledger::{EntryTotals, TransactionLine, TxType};

/// Strategy to generate a valid positive amount (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
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

/// A balanced entry: several credit lines against one debit line.
fn balanced_entry() -> impl Strategy<Value = Vec<TransactionLine>> {
    prop::collection::vec(positive_amount(), 1..6).prop_map(|credits| {
        let total: Decimal = credits.iter().sum();
        let mut lines: Vec<_> = credits.into_iter().map(|a| make_line(TxType::Credit, a)).collect();
        lines.push(make_line(TxType::Debit, total));
        lines
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A full reversal cancels every account exactly.
    #[test]
    fn prop_full_reversal_cancels_original(lines in balanced_entry()) {
        let mirrored = mirror_lines(&lines, "entry", ReversalPolicy::Full).unwrap();

        prop_assert_eq!(mirrored.len(), lines.len());
        for (original, mirror) in lines.iter().zip(&mirrored) {
            prop_assert_eq!(original.account_id, mirror.account_id);
            prop_assert_eq!(original.amount, mirror.amount);
            prop_assert_eq!(original.tx_type.opposite(), mirror.tx_type);
        }
    }

    /// A proportional reversal always balances and never has non-positive lines.
    #[test]
    fn prop_proportional_reversal_balances(
        lines in balanced_entry(),
        document_cents in 1i64..10_000_000i64,
        percent in 1i64..=100i64,
    ) {
        let document_amount = Decimal::new(document_cents, 2);
        let refund_amount = (document_amount * Decimal::new(percent, 2)).round_dp(2);
        prop_assume!(refund_amount > Decimal::ZERO);

        let policy = ReversalPolicy::Proportional { refund_amount, document_amount };
        let mirrored = mirror_lines(&lines, "entry", policy).unwrap();

        prop_assert!(EntryTotals::of_new(&mirrored).is_balanced());
        prop_assert!(mirrored.iter().all(|l| l.amount > Decimal::ZERO));
    }

    /// Refunding the whole document reverses every line in full.
    #[test]
    fn prop_full_refund_equals_void(
        lines in balanced_entry(),
        document_cents in 1i64..10_000_000i64,
    ) {
        let document_amount = Decimal::new(document_cents, 2);
        let policy = ReversalPolicy::Proportional {
            refund_amount: document_amount,
            document_amount,
        };

        let refund = mirror_lines(&lines, "entry", policy).unwrap();
        let void = mirror_lines(&lines, "entry", ReversalPolicy::Full).unwrap();

        let refund_amounts: Vec<_> = refund.iter().map(|l| l.amount).collect();
        let void_amounts: Vec<_> = void.iter().map(|l| l.amount).collect();
        prop_assert_eq!(refund_amounts, void_amounts);
    }
}
