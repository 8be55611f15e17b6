//! `SeaORM` Entity for ledgers table.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tally_core::ledger::Ledger;
use tally_shared::types::{EntityId, LedgerId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub entity_id: Uuid,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_entries::Entity")]
    JournalEntries,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into a domain ledger.
    #[must_use]
    pub fn into_domain(self) -> Ledger {
        Ledger {
            id: LedgerId::from_uuid(self.id),
            entity_id: EntityId::from_uuid(self.entity_id),
            name: self.name,
            created_at: self.created_at.with_timezone(&Utc),
        }
    }
}

impl From<&Ledger> for ActiveModel {
    fn from(ledger: &Ledger) -> Self {
        Self {
            id: Set(ledger.id.into_inner()),
            entity_id: Set(ledger.entity_id.into_inner()),
            name: Set(ledger.name.clone()),
            created_at: Set(ledger.created_at.into()),
        }
    }
}
