//! `SeaORM` Entity for documents table.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tally_core::document::Document;
use tally_core::store::StoreError;
use tally_shared::types::{CompanyId, DocumentId, JournalEntryId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub kind: String,
    pub counterparty: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub status: String,
    pub journal_entry_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntries,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into a domain document.
    pub fn into_domain(self) -> Result<Document, StoreError> {
        Ok(Document {
            id: DocumentId::from_uuid(self.id),
            company_id: CompanyId::from_uuid(self.company_id),
            kind: super::parse_column("documents", &self.kind)?,
            counterparty: self.counterparty,
            amount: self.amount,
            status: super::parse_column("documents", &self.status)?,
            journal_entry_id: self.journal_entry_id.map(JournalEntryId::from_uuid),
            created_at: self.created_at.with_timezone(&Utc),
        })
    }
}

impl From<&Document> for ActiveModel {
    fn from(document: &Document) -> Self {
        Self {
            id: Set(document.id.into_inner()),
            company_id: Set(document.company_id.into_inner()),
            kind: Set(document.kind.as_str().to_string()),
            counterparty: Set(document.counterparty.clone()),
            amount: Set(document.amount),
            status: Set(document.status.as_str().to_string()),
            journal_entry_id: Set(document.journal_entry_id.map(JournalEntryId::into_inner)),
            created_at: Set(document.created_at.into()),
        }
    }
}
