//! `SeaORM` Entity for transaction_lines table.

use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tally_core::ledger::TransactionLine;
use tally_core::store::StoreError;
use tally_shared::types::{AccountId, JournalEntryId, TransactionLineId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub journal_entry_id: Uuid,
    pub account_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub tx_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub position: i32,
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
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_delete = "Restrict"
    )]
    Accounts,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into a domain line.
    pub fn into_domain(self) -> Result<TransactionLine, StoreError> {
        Ok(TransactionLine {
            id: TransactionLineId::from_uuid(self.id),
            journal_entry_id: JournalEntryId::from_uuid(self.journal_entry_id),
            account_id: AccountId::from_uuid(self.account_id),
            amount: self.amount,
            tx_type: super::parse_column("transaction_lines", &self.tx_type)?,
            description: self.description,
            position: self.position,
        })
    }
}

impl From<&TransactionLine> for ActiveModel {
    fn from(line: &TransactionLine) -> Self {
        Self {
            id: Set(line.id.into_inner()),
            journal_entry_id: Set(line.journal_entry_id.into_inner()),
            account_id: Set(line.account_id.into_inner()),
            amount: Set(line.amount),
            tx_type: Set(line.tx_type.as_str().to_string()),
            description: Set(line.description.clone()),
            position: Set(line.position),
        }
    }
}
