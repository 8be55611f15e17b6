//! Ledger error types for account, posting, and reversal failures.
//!
//! This module defines every error the account directory, ledger store,
//! tax engine, posting state machine, and reversal engine can report.

use rust_decimal::Decimal;
use tally_shared::AppError;
use tally_shared::types::{AccountId, ChartId, CompanyId, EntityId, JournalEntryId};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Account Errors ==========
    /// A well-known account code is missing from the chart.
    #[error("Account code {code} is not configured in chart {chart_id}")]
    AccountNotConfigured {
        /// The chart that was searched.
        chart_id: ChartId,
        /// The missing account code.
        code: String,
    },

    /// The entity has no chart of accounts.
    #[error("No chart of accounts configured for entity {0}")]
    ChartNotConfigured(EntityId),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is referenced by transaction lines and cannot be removed.
    #[error("Account {0} is referenced by transaction lines")]
    AccountInUse(AccountId),

    // ========== Validation Errors ==========
    /// Line amount must be positive with at most two decimal places.
    #[error("Amount must be positive with at most two decimal places, got {0}")]
    InvalidAmount(Decimal),

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Entry has no lines to post.
    #[error("Journal entry {0} has no lines")]
    EmptyEntry(JournalEntryId),

    // ========== Entry State Errors ==========
    /// Entry is locked; its lines cannot change.
    #[error("Journal entry {0} is locked")]
    EntryLocked(JournalEntryId),

    /// Entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Operation requires a posted entry.
    #[error("Journal entry {0} is not posted")]
    NotPosted(JournalEntryId),

    /// A reversal link does not point to an earlier posted entry.
    #[error("Journal entry {target} cannot be reversed: {reason}")]
    InvalidReversalLink {
        /// The entry the reversal points to.
        target: JournalEntryId,
        /// Why the link was refused.
        reason: &'static str,
    },

    /// Entry is older than the unpost window.
    #[error(
        "Journal entry {entry_id} is {age_days} days old; \
         entries older than {window_days} days cannot be unposted"
    )]
    UnpostWindowExpired {
        /// The entry.
        entry_id: JournalEntryId,
        /// Age of the entry in whole days.
        age_days: i64,
        /// Configured unpost window.
        window_days: i64,
    },

    // ========== Ledger Errors ==========
    /// Entity already owns a ledger.
    #[error("Entity {0} already has a ledger")]
    DuplicateLedger(EntityId),

    /// Entity has no ledger.
    #[error("No ledger found for entity {0}")]
    LedgerNotFound(EntityId),

    /// Company not found.
    #[error("Company not found: {0}")]
    CompanyNotFound(CompanyId),

    // ========== Persistence Errors ==========
    /// Activity log snapshot could not be serialized.
    #[error("Snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotConfigured { .. } => "ACCOUNT_NOT_CONFIGURED",
            Self::ChartNotConfigured(_) => "CHART_NOT_CONFIGURED",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInUse(_) => "ACCOUNT_IN_USE",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::EmptyEntry(_) => "EMPTY_ENTRY",
            Self::EntryLocked(_) => "ENTRY_LOCKED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::NotPosted(_) => "NOT_POSTED",
            Self::InvalidReversalLink { .. } => "INVALID_REVERSAL_LINK",
            Self::UnpostWindowExpired { .. } => "UNPOST_WINDOW_EXPIRED",
            Self::DuplicateLedger(_) => "DUPLICATE_LEDGER",
            Self::LedgerNotFound(_) => "LEDGER_NOT_FOUND",
            Self::CompanyNotFound(_) => "COMPANY_NOT_FOUND",
            Self::Snapshot(_) => "SNAPSHOT_ERROR",
            Self::Store(e) => e.error_code(),
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::AccountNotFound(_)
            | LedgerError::EntryNotFound(_)
            | LedgerError::LedgerNotFound(_)
            | LedgerError::CompanyNotFound(_) => Self::NotFound(message),
            LedgerError::InvalidAmount(_)
            | LedgerError::UnbalancedEntry { .. }
            | LedgerError::EmptyEntry(_) => Self::Validation(message),
            LedgerError::DuplicateLedger(_) | LedgerError::AccountInUse(_) => {
                Self::Conflict(message)
            }
            LedgerError::AccountNotConfigured { .. }
            | LedgerError::ChartNotConfigured(_)
            | LedgerError::EntryLocked(_)
            | LedgerError::NotPosted(_)
            | LedgerError::InvalidReversalLink { .. }
            | LedgerError::UnpostWindowExpired { .. } => Self::BusinessRule(message),
            LedgerError::Snapshot(_) => Self::Internal(message),
            LedgerError::Store(StoreError::UniqueViolation(_)) => Self::Conflict(message),
            LedgerError::Store(_) => Self::Database(message),
        }
    }
}
