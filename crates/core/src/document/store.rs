//! Document persistence port.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tally_shared::types::{DocumentId, PaymentId};

use super::types::{Document, Payment, PaymentStatus};
use crate::store::StoreError;

/// Invoice, bill, and payment persistence port.
#[async_trait]
pub trait DocumentStore: Send {
    /// Inserts a document.
    async fn insert_document(&mut self, document: &Document) -> Result<(), StoreError>;

    /// Finds a document without locking it.
    async fn find_document(&mut self, id: DocumentId) -> Result<Option<Document>, StoreError>;

    /// Finds a document and holds its row lock until the unit of work ends.
    async fn lock_document(&mut self, id: DocumentId) -> Result<Option<Document>, StoreError>;

    /// Persists status and entry link of an existing document.
    async fn update_document(&mut self, document: &Document) -> Result<(), StoreError>;

    /// Inserts a payment.
    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), StoreError>;

    /// Finds a payment.
    async fn find_payment(&mut self, id: PaymentId) -> Result<Option<Payment>, StoreError>;

    /// Persists status and entry link of an existing payment.
    async fn update_payment(&mut self, payment: &Payment) -> Result<(), StoreError>;

    /// Returns the payments of a document in recording order.
    async fn payments_of(&mut self, document_id: DocumentId) -> Result<Vec<Payment>, StoreError>;

    /// Sums the posted payments of a document.
    async fn paid_total(&mut self, document_id: DocumentId) -> Result<Decimal, StoreError> {
        Ok(self
            .payments_of(document_id)
            .await?
            .iter()
            .filter(|p| p.status == PaymentStatus::Posted)
            .map(|p| p.amount)
            .sum())
    }
}
