//! `SeaORM` Entity for accounts table.

use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tally_core::accounts::Account;
use tally_core::store::StoreError;
use tally_shared::types::{AccountId, ChartId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub chart_id: Uuid,
    pub code: String,
    pub name: String,
    pub role: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::charts_of_accounts::Entity",
        from = "Column::ChartId",
        to = "super::charts_of_accounts::Column::Id"
    )]
    ChartsOfAccounts,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,
    #[sea_orm(has_many = "super::transaction_lines::Entity")]
    TransactionLines,
}

impl Related<super::charts_of_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChartsOfAccounts.def()
    }
}

impl Related<super::transaction_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into a domain account.
    pub fn into_domain(self) -> Result<Account, StoreError> {
        Ok(Account {
            id: AccountId::from_uuid(self.id),
            chart_id: ChartId::from_uuid(self.chart_id),
            role: super::parse_column("accounts", &self.role)?,
            code: self.code,
            name: self.name,
            parent_id: self.parent_id.map(AccountId::from_uuid),
        })
    }
}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: Set(account.id.into_inner()),
            chart_id: Set(account.chart_id.into_inner()),
            code: Set(account.code.clone()),
            name: Set(account.name.clone()),
            role: Set(account.role.as_str().to_string()),
            parent_id: Set(account.parent_id.map(AccountId::into_inner)),
        }
    }
}
