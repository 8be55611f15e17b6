//! Unit of work and persistence ports.
//!
//! Every engine operation runs inside one [`UnitOfWork`]: journal entry
//! creation, its lines, the document status update, and the activity-log
//! write commit or roll back together. Dropping a unit of work without
//! calling [`UnitOfWork::commit`] discards every change it made.

pub mod error;
pub mod memory;

use async_trait::async_trait;

use crate::accounts::AccountDirectory;
use crate::audit::ActivityLog;
use crate::company::CompanyStore;
use crate::document::DocumentStore;
use crate::ledger::LedgerStore;
use crate::tax::TaxRuleStore;

pub use error::StoreError;
pub use memory::MemoryStore;

/// A transactional store that hands out units of work.
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    /// The unit of work type of this adapter.
    type Tx: UnitOfWork;

    /// Opens a new unit of work (database transaction).
    async fn begin(&self) -> Result<Self::Tx, StoreError>;
}

/// One atomic transaction over every repository the engine uses.
#[async_trait]
pub trait UnitOfWork:
    CompanyStore
    + AccountDirectory
    + LedgerStore
    + TaxRuleStore
    + DocumentStore
    + ActivityLog
    + Send
    + Sized
{
    /// Makes every change of this unit of work durable and visible.
    async fn commit(self) -> Result<(), StoreError>;

    /// Discards every change of this unit of work.
    async fn rollback(self) -> Result<(), StoreError>;
}
