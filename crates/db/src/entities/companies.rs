//! `SeaORM` Entity for companies table.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tally_core::company::Company;
use tally_shared::types::{CompanyId, EntityId, UserId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub entity_id: Uuid,
    pub name: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::documents::Entity")]
    Documents,
    #[sea_orm(has_many = "super::tax_rules::Entity")]
    TaxRules,
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl Related<super::tax_rules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxRules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into a domain company.
    #[must_use]
    pub fn into_domain(self) -> Company {
        Company {
            id: CompanyId::from_uuid(self.id),
            entity_id: EntityId::from_uuid(self.entity_id),
            name: self.name,
            owner: self.owner_id.map(UserId::from_uuid),
            created_at: self.created_at.with_timezone(&Utc),
        }
    }
}

impl From<&Company> for ActiveModel {
    fn from(company: &Company) -> Self {
        Self {
            id: Set(company.id.into_inner()),
            entity_id: Set(company.entity_id.into_inner()),
            name: Set(company.name.clone()),
            owner_id: Set(company.owner.map(UserId::into_inner)),
            created_at: Set(company.created_at.into()),
        }
    }
}
