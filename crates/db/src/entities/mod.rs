//! `SeaORM` entities, one module per table.
//!
//! Every entity converts to and from its domain type in `tally-core`.
//! Enumerations are stored as text guarded by `CHECK` constraints and
//! parsed back through `FromStr`; a value the parser rejects surfaces as
//! [`StoreError::Corrupt`].

pub mod accounts;
pub mod charts_of_accounts;
pub mod companies;
pub mod documents;
pub mod journal_activity_log;
pub mod journal_entries;
pub mod ledgers;
pub mod payments;
pub mod tax_rules;
pub mod transaction_lines;

use std::str::FromStr;

use tally_core::store::StoreError;

/// Parses a text column into a domain enum.
fn parse_column<T>(table: &str, value: &str) -> Result<T, StoreError>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e: String| StoreError::Corrupt(format!("{table}: {e}")))
}
