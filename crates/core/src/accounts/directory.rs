//! Account directory port.
//!
//! Every lookup of an account by well-known code goes through
//! [`AccountDirectory::resolve`], so callers share one error path.

use async_trait::async_trait;
use tally_shared::types::{AccountId, ChartId, EntityId};

use super::types::{Account, ChartOfAccounts, StandardAccount};
use crate::ledger::LedgerError;
use crate::store::StoreError;

/// Chart of accounts persistence port.
#[async_trait]
pub trait AccountDirectory: Send {
    /// Finds the chart of an entity.
    async fn find_chart_by_entity(
        &mut self,
        entity_id: EntityId,
    ) -> Result<Option<ChartOfAccounts>, StoreError>;

    /// Inserts a chart unless the entity already has one.
    ///
    /// Returns false when an existing chart won.
    async fn insert_chart(&mut self, chart: &ChartOfAccounts) -> Result<bool, StoreError>;

    /// Finds an account by ID.
    async fn find_account(&mut self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Finds an account by code within a chart.
    async fn find_account_by_code(
        &mut self,
        chart_id: ChartId,
        code: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Inserts an account unless its code is already taken in the chart.
    ///
    /// Returns false when an existing account won.
    async fn insert_account(&mut self, account: &Account) -> Result<bool, StoreError>;

    /// Deletes an account; fails with `ForeignKeyViolation` while lines reference it.
    async fn delete_account(&mut self, id: AccountId) -> Result<(), StoreError>;

    /// Returns the chart of an entity.
    async fn chart_for(&mut self, entity_id: EntityId) -> Result<ChartOfAccounts, LedgerError> {
        self.find_chart_by_entity(entity_id)
            .await?
            .ok_or(LedgerError::ChartNotConfigured(entity_id))
    }

    /// Resolves an account by code.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotConfigured` if the chart lacks the code.
    async fn resolve(&mut self, chart_id: ChartId, code: &str) -> Result<Account, LedgerError> {
        self.find_account_by_code(chart_id, code)
            .await?
            .ok_or_else(|| LedgerError::AccountNotConfigured {
                chart_id,
                code: code.to_string(),
            })
    }

    /// Resolves one of the well-known accounts.
    async fn resolve_standard(
        &mut self,
        chart_id: ChartId,
        account: StandardAccount,
    ) -> Result<Account, LedgerError> {
        self.resolve(chart_id, account.code()).await
    }

    /// Removes an account that no transaction line references.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown account and `AccountInUse`
    /// when lines reference it.
    async fn remove_account(&mut self, id: AccountId) -> Result<(), LedgerError> {
        if self.find_account(id).await?.is_none() {
            return Err(LedgerError::AccountNotFound(id));
        }
        match self.delete_account(id).await {
            Ok(()) => Ok(()),
            Err(StoreError::ForeignKeyViolation(_)) => Err(LedgerError::AccountInUse(id)),
            Err(e) => Err(e.into()),
        }
    }
}
