//! Core bookkeeping engine for Tally.
//!
//! This crate contains the double-entry posting engine with ZERO web or
//! database dependencies. Persistence is reached through the async repository
//! traits in [`store`]; `tally-db` provides the PostgreSQL adapter and
//! [`store::memory`] an in-process one.
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts, well-known account codes, account directory
//! - `ledger` - Journal entries, transaction lines, balance verification
//! - `tax` - Tax rule application on in-flight journal entries
//! - `posting` - Journal posting state machine (post/unpost/verify)
//! - `reversal` - Mirror entries for voids and refunds
//! - `document` - Invoice/bill lifecycle driven by postings
//! - `audit` - Journal activity log and snapshots
//! - `company` - Companies owning charts, ledgers, and documents
//! - `store` - Unit of work and persistence ports

pub mod accounts;
pub mod audit;
pub mod company;
pub mod document;
pub mod ledger;
pub mod posting;
pub mod reversal;
pub mod store;
pub mod tax;
