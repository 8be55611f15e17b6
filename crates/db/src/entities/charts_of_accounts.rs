//! `SeaORM` Entity for charts_of_accounts table.

use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tally_core::accounts::ChartOfAccounts;
use tally_shared::types::{ChartId, EntityId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "charts_of_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub entity_id: Uuid,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into a domain chart.
    #[must_use]
    pub fn into_domain(self) -> ChartOfAccounts {
        ChartOfAccounts {
            id: ChartId::from_uuid(self.id),
            entity_id: EntityId::from_uuid(self.entity_id),
            name: self.name,
        }
    }
}

impl From<&ChartOfAccounts> for ActiveModel {
    fn from(chart: &ChartOfAccounts) -> Self {
        Self {
            id: Set(chart.id.into_inner()),
            entity_id: Set(chart.entity_id.into_inner()),
            name: Set(chart.name.clone()),
        }
    }
}
