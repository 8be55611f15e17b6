//! Double-entry bookkeeping primitives.
//!
//! This module implements the ledger store component:
//! - Ledgers, journal entries, and transaction lines
//! - Balance verification of an entry's lines
//! - The ledger persistence port
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod store;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use balance::{EntryTotals, verify_lines};
pub use error::LedgerError;
pub use store::LedgerStore;
pub use types::{JournalEntry, Ledger, NewLine, TransactionLine, TxType};
