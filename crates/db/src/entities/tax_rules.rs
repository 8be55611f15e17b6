//! `SeaORM` Entity for tax_rules table.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};
use tally_core::tax::TaxRule;
use tally_shared::types::{CompanyId, TaxRuleId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tax_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub region: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((7, 4)))")]
    pub rate: Decimal,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub seq: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into a domain rule.
    #[must_use]
    pub fn into_domain(self) -> TaxRule {
        TaxRule {
            id: TaxRuleId::from_uuid(self.id),
            company_id: CompanyId::from_uuid(self.company_id),
            name: self.name,
            region: self.region,
            rate: self.rate,
            is_active: self.is_active,
        }
    }
}

impl From<&TaxRule> for ActiveModel {
    fn from(rule: &TaxRule) -> Self {
        Self {
            id: Set(rule.id.into_inner()),
            company_id: Set(rule.company_id.into_inner()),
            name: Set(rule.name.clone()),
            region: Set(rule.region.clone()),
            rate: Set(rule.rate),
            is_active: Set(rule.is_active),
            created_at: Set(chrono::Utc::now().into()),
            seq: NotSet,
        }
    }
}
