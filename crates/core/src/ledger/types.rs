//! Ledger domain types for journal entries and their lines.
//!
//! This module defines the core types of the double-entry bookkeeping
//! system: ledgers, journal entries, and the debit/credit lines they own.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, EntityId, JournalEntryId, LedgerId, TransactionLineId};

/// Line polarity: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/revenue accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/revenue accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    /// Debit line.
    Debit,
    /// Credit line.
    Credit,
}

impl TxType {
    /// Returns the opposite polarity.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Returns the persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            _ => Err(format!("Unknown transaction type: {s}")),
        }
    }
}

/// The single ledger of an accounting entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Unique identifier.
    pub id: LedgerId,
    /// The accounting entity that owns this ledger.
    pub entity_id: EntityId,
    /// Display name.
    pub name: String,
    /// When the ledger was opened.
    pub created_at: DateTime<Utc>,
}

impl Ledger {
    /// Creates a new ledger for an entity.
    #[must_use]
    pub fn new(entity_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id: LedgerId::new(),
            entity_id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// A journal entry: one business event expressed as balanced lines.
///
/// Lifecycle: created unposted and unlocked, posted (posted and locked),
/// and optionally unposted again. The lines of a locked entry are never
/// mutated; corrections happen through a reversal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// The ledger this entry belongs to.
    pub ledger_id: LedgerId,
    /// Free-text description.
    pub description: String,
    /// When the entry was created.
    pub timestamp: DateTime<Utc>,
    /// Whether the entry is authoritative.
    pub posted: bool,
    /// Whether the entry's lines are frozen.
    pub locked: bool,
    /// The earlier posted entry this one reverses, if any.
    pub reversal_of: Option<JournalEntryId>,
}

impl JournalEntry {
    /// Creates a new unposted, unlocked entry.
    #[must_use]
    pub fn new(
        ledger_id: LedgerId,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: JournalEntryId::new(),
            ledger_id,
            description: description.into(),
            timestamp,
            posted: false,
            locked: false,
            reversal_of: None,
        }
    }

    /// Sets the entry this one reverses.
    #[must_use]
    pub fn reversing(mut self, original: JournalEntryId) -> Self {
        self.reversal_of = Some(original);
        self
    }
}

/// One debit or credit line of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Unique identifier.
    pub id: TransactionLineId,
    /// The journal entry that owns this line.
    pub journal_entry_id: JournalEntryId,
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Positive amount.
    pub amount: Decimal,
    /// Debit or credit.
    pub tx_type: TxType,
    /// Optional description for this line item.
    pub description: Option<String>,
    /// Zero-based order of the line within its entry.
    pub position: i32,
}

impl TransactionLine {
    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.tx_type {
            TxType::Debit => self.amount,
            TxType::Credit => -self.amount,
        }
    }
}

/// Input for a line that has not been attached to an entry yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLine {
    /// The account to post to.
    pub account_id: AccountId,
    /// The amount (must be positive).
    pub amount: Decimal,
    /// Whether this is a debit or credit line.
    pub tx_type: TxType,
    /// Optional description for this line.
    pub description: Option<String>,
}

impl NewLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            amount,
            tx_type: TxType::Debit,
            description: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            amount,
            tx_type: TxType::Credit,
            description: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
