//! `SeaORM` Entity for payments table.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};
use tally_core::document::Payment;
use tally_core::store::StoreError;
use tally_shared::types::{CompanyId, DocumentId, JournalEntryId, PaymentId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub document_id: Uuid,
    pub company_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    #[sea_orm(unique)]
    pub journal_entry_id: Option<Uuid>,
    pub paid_at: DateTimeWithTimeZone,
    pub seq: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::documents::Entity",
        from = "Column::DocumentId",
        to = "super::documents::Column::Id",
        on_delete = "Cascade"
    )]
    Documents,
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into a domain payment.
    pub fn into_domain(self) -> Result<Payment, StoreError> {
        Ok(Payment {
            id: PaymentId::from_uuid(self.id),
            document_id: DocumentId::from_uuid(self.document_id),
            company_id: CompanyId::from_uuid(self.company_id),
            amount: self.amount,
            method: super::parse_column("payments", &self.method)?,
            status: super::parse_column("payments", &self.status)?,
            journal_entry_id: self.journal_entry_id.map(JournalEntryId::from_uuid),
            paid_at: self.paid_at.with_timezone(&Utc),
        })
    }
}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        Self {
            id: Set(payment.id.into_inner()),
            document_id: Set(payment.document_id.into_inner()),
            company_id: Set(payment.company_id.into_inner()),
            amount: Set(payment.amount),
            method: Set(payment.method.as_str().to_string()),
            status: Set(payment.status.as_str().to_string()),
            journal_entry_id: Set(payment.journal_entry_id.map(JournalEntryId::into_inner)),
            paid_at: Set(payment.paid_at.into()),
            seq: NotSet,
        }
    }
}
