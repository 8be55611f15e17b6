//! Activity log records and journal snapshots.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, ActivityLogId, JournalEntryId, UserId};

use crate::ledger::{JournalEntry, TransactionLine, TxType};

/// What happened to a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    /// Entry was posted.
    Posted,
    /// Entry was unposted.
    Unposted,
    /// Entry was locked.
    Locked,
    /// Entry was unlocked.
    Unlocked,
    /// Entry was created.
    Created,
    /// Entry was updated.
    Updated,
}

impl ActivityAction {
    /// Returns the persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Posted => "posted",
            Self::Unposted => "unposted",
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "posted" => Ok(Self::Posted),
            "unposted" => Ok(Self::Unposted),
            "locked" => Ok(Self::Locked),
            "unlocked" => Ok(Self::Unlocked),
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            _ => Err(format!("Unknown activity action: {s}")),
        }
    }
}

/// One line as it looked when the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLine {
    /// Account of the line.
    pub account_id: AccountId,
    /// Account code at snapshot time.
    pub account_code: String,
    /// Debit or credit.
    pub tx_type: TxType,
    /// Amount, serialized as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Line description.
    pub description: Option<String>,
}

/// Point-in-time copy of a journal entry and its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalSnapshot {
    /// The entry.
    pub entry_id: JournalEntryId,
    /// Entry description.
    pub description: String,
    /// Posted flag at snapshot time.
    pub posted: bool,
    /// Locked flag at snapshot time.
    pub locked: bool,
    /// Entry timestamp.
    pub timestamp: DateTime<Utc>,
    /// Reversed entry, if any.
    pub reversal_of: Option<JournalEntryId>,
    /// Lines in position order.
    pub lines: Vec<SnapshotLine>,
}

impl JournalSnapshot {
    /// Captures an entry with its lines; `codes` holds the account code of each line.
    #[must_use]
    pub fn capture(entry: &JournalEntry, lines: &[TransactionLine], codes: &[String]) -> Self {
        Self {
            entry_id: entry.id,
            description: entry.description.clone(),
            posted: entry.posted,
            locked: entry.locked,
            timestamp: entry.timestamp,
            reversal_of: entry.reversal_of,
            lines: lines
                .iter()
                .zip(codes)
                .map(|(line, code)| SnapshotLine {
                    account_id: line.account_id,
                    account_code: code.clone(),
                    tx_type: line.tx_type,
                    amount: line.amount,
                    description: line.description.clone(),
                })
                .collect(),
        }
    }

    /// Serializes the snapshot for storage.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Immutable audit record of an action on a journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Unique identifier.
    pub id: ActivityLogId,
    /// The affected entry.
    pub journal_entry_id: JournalEntryId,
    /// What happened.
    pub action: ActivityAction,
    /// Who did it; `None` means the system.
    pub performed_by: Option<UserId>,
    /// When it happened.
    pub performed_at: DateTime<Utc>,
    /// Free-text note.
    pub note: String,
    /// Serialized [`JournalSnapshot`].
    pub snapshot: serde_json::Value,
}

impl ActivityLogEntry {
    /// Creates a log record stamped now.
    #[must_use]
    pub fn new(
        journal_entry_id: JournalEntryId,
        action: ActivityAction,
        performed_by: Option<UserId>,
        note: impl Into<String>,
        snapshot: serde_json::Value,
    ) -> Self {
        Self {
            id: ActivityLogId::new(),
            journal_entry_id,
            action,
            performed_by,
            performed_at: Utc::now(),
            note: note.into(),
            snapshot,
        }
    }

    /// Decodes the stored snapshot.
    pub fn journal_snapshot(&self) -> Result<JournalSnapshot, serde_json::Error> {
        serde_json::from_value(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_shared::types::{LedgerId, TransactionLineId};

    #[test]
    fn test_snapshot_renders_amounts_as_strings() {
        let entry = JournalEntry::new(LedgerId::new(), "Invoice: Acme", Utc::now());
        let line = TransactionLine {
            id: TransactionLineId::new(),
            journal_entry_id: entry.id,
            account_id: AccountId::new(),
            amount: dec!(100.00),
            tx_type: TxType::Credit,
            description: None,
            position: 0,
        };

        let snapshot = JournalSnapshot::capture(&entry, &[line], &["4000".to_string()]);
        let value = snapshot.to_value().unwrap();

        assert_eq!(value["lines"][0]["amount"], "100.00");
        assert_eq!(value["lines"][0]["account_code"], "4000");
        assert_eq!(value["lines"][0]["tx_type"], "credit");
        assert_eq!(value["posted"], false);
    }

    #[test]
    fn test_snapshot_survives_storage() {
        let entry = JournalEntry::new(LedgerId::new(), "Bill: Supplier", Utc::now());
        let snapshot = JournalSnapshot::capture(&entry, &[], &[]);
        let log = ActivityLogEntry::new(
            entry.id,
            ActivityAction::Posted,
            None,
            "Auto-posted by system",
            snapshot.to_value().unwrap(),
        );
        assert_eq!(log.journal_snapshot().unwrap(), snapshot);
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("unposted".parse::<ActivityAction>().unwrap(), ActivityAction::Unposted);
        assert!("deleted".parse::<ActivityAction>().is_err());
    }
}
