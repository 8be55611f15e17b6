//! Activity log port: the append-only audit feed.

use async_trait::async_trait;
use tally_shared::types::JournalEntryId;

use super::types::ActivityLogEntry;
use crate::store::StoreError;

/// Append-only activity log persistence port.
#[async_trait]
pub trait ActivityLog: Send {
    /// Appends a record.
    async fn append_activity(&mut self, entry: &ActivityLogEntry) -> Result<(), StoreError>;

    /// Returns the records of a journal entry in write order.
    async fn activity_for_entry(
        &mut self,
        entry_id: JournalEntryId,
    ) -> Result<Vec<ActivityLogEntry>, StoreError>;
}
