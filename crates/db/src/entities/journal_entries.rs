//! `SeaORM` Entity for journal_entries table.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tally_core::ledger::JournalEntry;
use tally_shared::types::{JournalEntryId, LedgerId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub ledger_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub timestamp: DateTimeWithTimeZone,
    pub posted: bool,
    pub locked: bool,
    pub reversal_of: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ledgers::Entity",
        from = "Column::LedgerId",
        to = "super::ledgers::Column::Id"
    )]
    Ledgers,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ReversalOf",
        to = "Column::Id"
    )]
    ReversalOf,
    #[sea_orm(has_many = "super::transaction_lines::Entity")]
    TransactionLines,
    #[sea_orm(has_many = "super::journal_activity_log::Entity")]
    JournalActivityLog,
}

impl Related<super::ledgers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ledgers.def()
    }
}

impl Related<super::transaction_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionLines.def()
    }
}

impl Related<super::journal_activity_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalActivityLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into a domain entry.
    #[must_use]
    pub fn into_domain(self) -> JournalEntry {
        JournalEntry {
            id: JournalEntryId::from_uuid(self.id),
            ledger_id: LedgerId::from_uuid(self.ledger_id),
            description: self.description,
            timestamp: self.timestamp.with_timezone(&Utc),
            posted: self.posted,
            locked: self.locked,
            reversal_of: self.reversal_of.map(JournalEntryId::from_uuid),
        }
    }
}

impl From<&JournalEntry> for ActiveModel {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            id: Set(entry.id.into_inner()),
            ledger_id: Set(entry.ledger_id.into_inner()),
            description: Set(entry.description.clone()),
            timestamp: Set(entry.timestamp.into()),
            posted: Set(entry.posted),
            locked: Set(entry.locked),
            reversal_of: Set(entry.reversal_of.map(JournalEntryId::into_inner)),
        }
    }
}
