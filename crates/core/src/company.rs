//! Companies owning a chart of accounts, a ledger, and documents.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::types::{CompanyId, EntityId, UserId};

use crate::store::StoreError;

/// A company operating one accounting entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier.
    pub id: CompanyId,
    /// The accounting entity whose chart and ledger this company books into.
    pub entity_id: EntityId,
    /// Display name.
    pub name: String,
    /// Owner used for audit attribution of automated postings, if any.
    pub owner: Option<UserId>,
    /// When the company was registered.
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Creates a company bound to a fresh accounting entity.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: Option<UserId>) -> Self {
        Self {
            id: CompanyId::new(),
            entity_id: EntityId::new(),
            name: name.into(),
            owner,
            created_at: Utc::now(),
        }
    }
}

/// Company persistence port.
#[async_trait]
pub trait CompanyStore: Send {
    /// Inserts a company.
    async fn insert_company(&mut self, company: &Company) -> Result<(), StoreError>;

    /// Finds a company by ID.
    async fn find_company(&mut self, id: CompanyId) -> Result<Option<Company>, StoreError>;
}
