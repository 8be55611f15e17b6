//! Journal posting state machine.
//!
//! `Unposted -> Posted` through [`PostingMachine::post`] and back through
//! [`PostingMachine::unpost`]. Both run inside the caller's unit of work and
//! re-read the entry under its row lock, so concurrent callers serialise and
//! the loser observes the winner's state.

use chrono::Utc;
use tally_shared::types::{JournalEntryId, UserId};
use tracing::{debug, info};

use super::rules::{check_unpost_window, post_note, unpost_note};
use crate::accounts::AccountDirectory;
use crate::audit::{ActivityAction, ActivityLogEntry, JournalSnapshot};
use crate::ledger::{EntryTotals, JournalEntry, LedgerError, LedgerStore, verify_lines};
use crate::store::UnitOfWork;

/// Posts, unposts, and verifies journal entries.
#[derive(Debug, Clone, Copy)]
pub struct PostingMachine {
    unpost_window_days: i64,
}

impl Default for PostingMachine {
    fn default() -> Self {
        Self::new(30)
    }
}

impl PostingMachine {
    /// Creates a posting machine with the given unpost window.
    #[must_use]
    pub const fn new(unpost_window_days: i64) -> Self {
        Self { unpost_window_days }
    }

    /// Checks the balance invariant of an entry without mutating it.
    pub async fn verify<T: UnitOfWork>(
        &self,
        tx: &mut T,
        entry_id: JournalEntryId,
    ) -> Result<EntryTotals, LedgerError> {
        if tx.find_entry(entry_id).await?.is_none() {
            return Err(LedgerError::EntryNotFound(entry_id));
        }
        let lines = tx.lines_of(entry_id).await?;
        verify_lines(entry_id, &lines)
    }

    /// Posts an entry.
    ///
    /// Returns `Ok(false)` when the entry is already posted and `force` is
    /// not set. Otherwise verifies the balance, marks the entry posted and
    /// locked, and logs a snapshot of the posted state.
    pub async fn post<T: UnitOfWork>(
        &self,
        tx: &mut T,
        entry_id: JournalEntryId,
        actor: Option<UserId>,
        force: bool,
    ) -> Result<bool, LedgerError> {
        let mut entry = tx
            .lock_entry(entry_id)
            .await?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        if entry.posted && !force {
            debug!(entry_id = %entry_id, "Journal entry already posted");
            return Ok(false);
        }

        let lines = tx.lines_of(entry_id).await?;
        let totals = verify_lines(entry_id, &lines)?;

        entry.posted = true;
        entry.locked = true;
        tx.update_entry(&entry).await?;

        let snapshot = capture_snapshot(tx, &entry).await?;
        let log = ActivityLogEntry::new(
            entry_id,
            ActivityAction::Posted,
            actor,
            post_note(actor.is_some()),
            snapshot,
        );
        tx.append_activity(&log).await?;

        info!(entry_id = %entry_id, total = %totals.debit, "Journal entry posted");
        Ok(true)
    }

    /// Unposts an entry.
    ///
    /// Returns `Ok(false)` when the entry is not posted and `force` is not
    /// set. Entries older than the unpost window need `force`. The snapshot
    /// is taken before the flags change.
    pub async fn unpost<T: UnitOfWork>(
        &self,
        tx: &mut T,
        entry_id: JournalEntryId,
        actor: Option<UserId>,
        force: bool,
    ) -> Result<bool, LedgerError> {
        let mut entry = tx
            .lock_entry(entry_id)
            .await?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        if !entry.posted && !force {
            debug!(entry_id = %entry_id, "Journal entry is not posted");
            return Ok(false);
        }
        if !force {
            check_unpost_window(&entry, Utc::now(), self.unpost_window_days)?;
        }

        let snapshot = capture_snapshot(tx, &entry).await?;
        let log = ActivityLogEntry::new(
            entry_id,
            ActivityAction::Unposted,
            actor,
            unpost_note(force),
            snapshot,
        );
        tx.append_activity(&log).await?;

        entry.posted = false;
        entry.locked = false;
        tx.update_entry(&entry).await?;

        info!(entry_id = %entry_id, force, "Journal entry unposted");
        Ok(true)
    }
}

/// Serializes an entry and its lines with the account code of every line.
pub async fn capture_snapshot<T>(
    tx: &mut T,
    entry: &JournalEntry,
) -> Result<serde_json::Value, LedgerError>
where
    T: LedgerStore + AccountDirectory,
{
    let lines = tx.lines_of(entry.id).await?;
    let mut codes = Vec::with_capacity(lines.len());
    for line in &lines {
        let account = tx
            .find_account(line.account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(line.account_id))?;
        codes.push(account.code);
    }
    Ok(JournalSnapshot::capture(entry, &lines, &codes).to_value()?)
}
