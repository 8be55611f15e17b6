//! Journal service: posting operations as standalone units of work.

use chrono::Utc;
use tally_shared::LedgerConfig;
use tally_shared::types::{EntityId, JournalEntryId, UserId};
use tracing::info;

use super::machine::PostingMachine;
use crate::audit::{ActivityLog, ActivityLogEntry};
use crate::ledger::{EntryTotals, JournalEntry, LedgerError, LedgerStore, NewLine, TransactionLine};
use crate::store::{Store, UnitOfWork};

/// Runs each posting operation in its own unit of work.
#[derive(Debug, Clone)]
pub struct JournalService<S> {
    store: S,
    machine: PostingMachine,
}

impl<S: Store> JournalService<S> {
    /// Creates a journal service.
    pub fn new(store: S, config: &LedgerConfig) -> Self {
        Self {
            store,
            machine: PostingMachine::new(config.unpost_window_days),
        }
    }

    /// Creates an unposted entry with its lines.
    pub async fn create_entry(
        &self,
        entity_id: EntityId,
        description: &str,
        lines: Vec<NewLine>,
    ) -> Result<JournalEntry, LedgerError> {
        let mut tx = self.store.begin().await?;

        let ledger = tx.ledger_for(entity_id).await?;
        let entry = tx.create_entry(ledger.id, description, None, Utc::now()).await?;
        tx.add_lines(entry.id, lines).await?;

        tx.commit().await?;
        info!(entry_id = %entry.id, "Journal entry created");
        Ok(entry)
    }

    /// Posts an entry; see [`PostingMachine::post`].
    pub async fn post(
        &self,
        entry_id: JournalEntryId,
        actor: Option<UserId>,
        force: bool,
    ) -> Result<bool, LedgerError> {
        let mut tx = self.store.begin().await?;
        let posted = self.machine.post(&mut tx, entry_id, actor, force).await?;
        tx.commit().await?;
        Ok(posted)
    }

    /// Unposts an entry; see [`PostingMachine::unpost`].
    pub async fn unpost(
        &self,
        entry_id: JournalEntryId,
        actor: Option<UserId>,
        force: bool,
    ) -> Result<bool, LedgerError> {
        let mut tx = self.store.begin().await?;
        let unposted = self.machine.unpost(&mut tx, entry_id, actor, force).await?;
        tx.commit().await?;
        Ok(unposted)
    }

    /// Checks the balance invariant of an entry.
    pub async fn verify(&self, entry_id: JournalEntryId) -> Result<EntryTotals, LedgerError> {
        let mut tx = self.store.begin().await?;
        let totals = self.machine.verify(&mut tx, entry_id).await;
        tx.rollback().await?;
        totals
    }

    /// Returns an entry with its lines in position order.
    pub async fn entry(
        &self,
        entry_id: JournalEntryId,
    ) -> Result<(JournalEntry, Vec<TransactionLine>), LedgerError> {
        let mut tx = self.store.begin().await?;
        let entry = tx
            .find_entry(entry_id)
            .await?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        let lines = tx.lines_of(entry_id).await?;
        tx.rollback().await?;
        Ok((entry, lines))
    }

    /// Returns the activity log of an entry in write order.
    pub async fn history(
        &self,
        entry_id: JournalEntryId,
    ) -> Result<Vec<ActivityLogEntry>, LedgerError> {
        let mut tx = self.store.begin().await?;
        if tx.find_entry(entry_id).await?.is_none() {
            return Err(LedgerError::EntryNotFound(entry_id));
        }
        let history = tx.activity_for_entry(entry_id).await?;
        tx.rollback().await?;
        Ok(history)
    }
}
