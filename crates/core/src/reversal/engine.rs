//! Reversal entries for voids and refunds.

use chrono::Utc;
use tally_shared::types::{JournalEntryId, UserId};
use tracing::info;

use super::mirror::{ReversalPolicy, mirror_lines};
use crate::ledger::{JournalEntry, LedgerError};
use crate::posting::PostingMachine;
use crate::store::UnitOfWork;

/// Builds and posts mirror entries of posted entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReversalEngine {
    machine: PostingMachine,
}

impl ReversalEngine {
    /// Creates a reversal engine posting through `machine`.
    #[must_use]
    pub const fn new(machine: PostingMachine) -> Self {
        Self { machine }
    }

    /// Reverses a posted entry inside the caller's unit of work.
    ///
    /// The original stays locked while its lines are read; the new entry is
    /// described `prefix + original description`, links back through
    /// `reversal_of`, and is posted before returning.
    ///
    /// # Errors
    ///
    /// Returns `NotPosted` if the original is not posted.
    pub async fn reverse<T: UnitOfWork>(
        &self,
        tx: &mut T,
        original_id: JournalEntryId,
        prefix: &str,
        policy: ReversalPolicy,
        actor: Option<UserId>,
    ) -> Result<JournalEntry, LedgerError> {
        let original = tx
            .lock_entry(original_id)
            .await?
            .ok_or(LedgerError::EntryNotFound(original_id))?;
        if !original.posted {
            return Err(LedgerError::NotPosted(original_id));
        }

        let lines = tx.lines_of(original_id).await?;
        let mirrored = mirror_lines(&lines, &original.description, policy)?;

        let description = format!("{prefix}{}", original.description);
        let now = Utc::now().max(original.timestamp);
        let reversal = tx
            .create_entry(original.ledger_id, &description, Some(original_id), now)
            .await?;
        tx.add_lines(reversal.id, mirrored).await?;
        self.machine.post(tx, reversal.id, actor, false).await?;

        info!(
            original_id = %original_id,
            reversal_id = %reversal.id,
            ?policy,
            "Journal entry reversed"
        );
        Ok(reversal)
    }
}
