//! `SeaORM` Entity for journal_activity_log table.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};
use tally_core::audit::ActivityLogEntry;
use tally_core::store::StoreError;
use tally_shared::types::{ActivityLogId, JournalEntryId, UserId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_activity_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub journal_entry_id: Uuid,
    pub action: String,
    pub performed_by: Option<Uuid>,
    pub performed_at: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Text")]
    pub note: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub snapshot: Json,
    pub seq: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entries::Column::Id",
        on_delete = "Cascade"
    )]
    JournalEntries,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into a domain log record.
    pub fn into_domain(self) -> Result<ActivityLogEntry, StoreError> {
        Ok(ActivityLogEntry {
            id: ActivityLogId::from_uuid(self.id),
            journal_entry_id: JournalEntryId::from_uuid(self.journal_entry_id),
            action: super::parse_column("journal_activity_log", &self.action)?,
            performed_by: self.performed_by.map(UserId::from_uuid),
            performed_at: self.performed_at.with_timezone(&Utc),
            note: self.note,
            snapshot: self.snapshot,
        })
    }
}

impl From<&ActivityLogEntry> for ActiveModel {
    fn from(record: &ActivityLogEntry) -> Self {
        Self {
            id: Set(record.id.into_inner()),
            journal_entry_id: Set(record.journal_entry_id.into_inner()),
            action: Set(record.action.as_str().to_string()),
            performed_by: Set(record.performed_by.map(UserId::into_inner)),
            performed_at: Set(record.performed_at.into()),
            note: Set(record.note.clone()),
            snapshot: Set(record.snapshot.clone()),
            seq: NotSet,
        }
    }
}
