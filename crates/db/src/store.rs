//! `SeaORM` implementation of the persistence ports.
//!
//! A [`SeaTx`] wraps one database transaction. Row locks taken by
//! `lock_entry` and `lock_document` (`SELECT ... FOR UPDATE`) are held until
//! the transaction commits or rolls back. Writes that may legitimately fail on
//! a constraint run inside a savepoint so the surrounding transaction stays
//! usable after the error is reported.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use tally_core::accounts::{Account, AccountDirectory, ChartOfAccounts};
use tally_core::audit::{ActivityLog, ActivityLogEntry};
use tally_core::company::{Company, CompanyStore};
use tally_core::document::{Document, DocumentStore, Payment};
use tally_core::ledger::{JournalEntry, Ledger, LedgerStore, TransactionLine};
use tally_core::store::{Store, StoreError, UnitOfWork};
use tally_core::tax::{TaxRule, TaxRuleStore};
use tally_shared::types::{
    AccountId, ChartId, CompanyId, DocumentId, EntityId, JournalEntryId, PaymentId,
};

use crate::entities::{
    accounts, charts_of_accounts, companies, documents, journal_activity_log, journal_entries,
    ledgers, payments, tax_rules, transaction_lines,
};

/// Maps a database error onto the port error, keeping constraint names.
fn db_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::UniqueViolation(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            StoreError::ForeignKeyViolation(detail)
        }
        _ => {
            tracing::debug!(error = %err, "Database error");
            StoreError::Database(err.to_string())
        }
    }
}

/// Store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct SeaStore {
    db: DatabaseConnection,
}

impl SeaStore {
    /// Creates a store over an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl Store for SeaStore {
    type Tx = SeaTx;

    async fn begin(&self) -> Result<SeaTx, StoreError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        Ok(SeaTx { txn })
    }
}

/// Unit of work over one database transaction.
///
/// Dropping it without committing rolls the transaction back.
pub struct SeaTx {
    txn: DatabaseTransaction,
}

impl std::fmt::Debug for SeaTx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeaTx").finish_non_exhaustive()
    }
}

#[async_trait]
impl UnitOfWork for SeaTx {
    async fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().await.map_err(db_err)
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.txn.rollback().await.map_err(db_err)
    }
}

#[async_trait]
impl CompanyStore for SeaTx {
    async fn insert_company(&mut self, company: &Company) -> Result<(), StoreError> {
        companies::Entity::insert(companies::ActiveModel::from(company))
            .exec_without_returning(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_company(&mut self, id: CompanyId) -> Result<Option<Company>, StoreError> {
        let row = companies::Entity::find_by_id(id.into_inner())
            .one(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(row.map(companies::Model::into_domain))
    }
}

#[async_trait]
impl AccountDirectory for SeaTx {
    async fn find_chart_by_entity(
        &mut self,
        entity_id: EntityId,
    ) -> Result<Option<ChartOfAccounts>, StoreError> {
        let row = charts_of_accounts::Entity::find()
            .filter(charts_of_accounts::Column::EntityId.eq(entity_id.into_inner()))
            .one(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(row.map(charts_of_accounts::Model::into_domain))
    }

    async fn insert_chart(&mut self, chart: &ChartOfAccounts) -> Result<bool, StoreError> {
        let model = charts_of_accounts::ActiveModel::from(chart);
        let inserted = charts_of_accounts::Entity::insert(model)
            .on_conflict(
                OnConflict::column(charts_of_accounts::Column::EntityId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(inserted > 0)
    }

    async fn find_account(&mut self, id: AccountId) -> Result<Option<Account>, StoreError> {
        accounts::Entity::find_by_id(id.into_inner())
            .one(&self.txn)
            .await
            .map_err(db_err)?
            .map(accounts::Model::into_domain)
            .transpose()
    }

    async fn find_account_by_code(
        &mut self,
        chart_id: ChartId,
        code: &str,
    ) -> Result<Option<Account>, StoreError> {
        accounts::Entity::find()
            .filter(accounts::Column::ChartId.eq(chart_id.into_inner()))
            .filter(accounts::Column::Code.eq(code))
            .one(&self.txn)
            .await
            .map_err(db_err)?
            .map(accounts::Model::into_domain)
            .transpose()
    }

    async fn insert_account(&mut self, account: &Account) -> Result<bool, StoreError> {
        let inserted = accounts::Entity::insert(accounts::ActiveModel::from(account))
            .on_conflict(
                OnConflict::columns([accounts::Column::ChartId, accounts::Column::Code])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(inserted > 0)
    }

    async fn delete_account(&mut self, id: AccountId) -> Result<(), StoreError> {
        let savepoint = self.txn.begin().await.map_err(db_err)?;
        match accounts::Entity::delete_by_id(id.into_inner()).exec(&savepoint).await {
            Ok(_) => savepoint.commit().await.map_err(db_err),
            Err(e) => {
                savepoint.rollback().await.map_err(db_err)?;
                Err(db_err(e))
            }
        }
    }
}

#[async_trait]
impl LedgerStore for SeaTx {
    async fn find_ledger_by_entity(
        &mut self,
        entity_id: EntityId,
    ) -> Result<Option<Ledger>, StoreError> {
        let row = ledgers::Entity::find()
            .filter(ledgers::Column::EntityId.eq(entity_id.into_inner()))
            .one(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(row.map(ledgers::Model::into_domain))
    }

    async fn insert_ledger(&mut self, ledger: &Ledger) -> Result<(), StoreError> {
        let savepoint = self.txn.begin().await.map_err(db_err)?;
        match ledgers::Entity::insert(ledgers::ActiveModel::from(ledger))
            .exec_without_returning(&savepoint)
            .await
        {
            Ok(_) => savepoint.commit().await.map_err(db_err),
            Err(e) => {
                savepoint.rollback().await.map_err(db_err)?;
                Err(db_err(e))
            }
        }
    }

    async fn find_entry(&mut self, id: JournalEntryId) -> Result<Option<JournalEntry>, StoreError> {
        let row = journal_entries::Entity::find_by_id(id.into_inner())
            .one(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(row.map(journal_entries::Model::into_domain))
    }

    async fn lock_entry(&mut self, id: JournalEntryId) -> Result<Option<JournalEntry>, StoreError> {
        let row = journal_entries::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(row.map(journal_entries::Model::into_domain))
    }

    async fn insert_entry(&mut self, entry: &JournalEntry) -> Result<(), StoreError> {
        journal_entries::Entity::insert(journal_entries::ActiveModel::from(entry))
            .exec_without_returning(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn update_entry(&mut self, entry: &JournalEntry) -> Result<(), StoreError> {
        journal_entries::Entity::update(journal_entries::ActiveModel::from(entry))
            .exec(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn insert_line(&mut self, line: &TransactionLine) -> Result<(), StoreError> {
        transaction_lines::Entity::insert(transaction_lines::ActiveModel::from(line))
            .exec_without_returning(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_reversals(
        &mut self,
        entry_id: JournalEntryId,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        let rows = journal_entries::Entity::find()
            .filter(journal_entries::Column::ReversalOf.eq(entry_id.into_inner()))
            .order_by_asc(journal_entries::Column::Timestamp)
            .order_by_asc(journal_entries::Column::Id)
            .all(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(journal_entries::Model::into_domain).collect())
    }

    async fn lines_of(
        &mut self,
        entry_id: JournalEntryId,
    ) -> Result<Vec<TransactionLine>, StoreError> {
        transaction_lines::Entity::find()
            .filter(transaction_lines::Column::JournalEntryId.eq(entry_id.into_inner()))
            .order_by_asc(transaction_lines::Column::Position)
            .all(&self.txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(transaction_lines::Model::into_domain)
            .collect()
    }
}

#[async_trait]
impl TaxRuleStore for SeaTx {
    async fn active_tax_rules(
        &mut self,
        company_id: CompanyId,
    ) -> Result<Vec<TaxRule>, StoreError> {
        let rows = tax_rules::Entity::find()
            .filter(tax_rules::Column::CompanyId.eq(company_id.into_inner()))
            .filter(tax_rules::Column::IsActive.eq(true))
            .order_by_asc(tax_rules::Column::Seq)
            .all(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(tax_rules::Model::into_domain).collect())
    }

    async fn insert_tax_rule(&mut self, rule: &TaxRule) -> Result<(), StoreError> {
        tax_rules::Entity::insert(tax_rules::ActiveModel::from(rule))
            .exec_without_returning(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SeaTx {
    async fn insert_document(&mut self, document: &Document) -> Result<(), StoreError> {
        documents::Entity::insert(documents::ActiveModel::from(document))
            .exec_without_returning(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_document(&mut self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        documents::Entity::find_by_id(id.into_inner())
            .one(&self.txn)
            .await
            .map_err(db_err)?
            .map(documents::Model::into_domain)
            .transpose()
    }

    async fn lock_document(&mut self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        documents::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(db_err)?
            .map(documents::Model::into_domain)
            .transpose()
    }

    async fn update_document(&mut self, document: &Document) -> Result<(), StoreError> {
        documents::Entity::update(documents::ActiveModel::from(document))
            .exec(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), StoreError> {
        payments::Entity::insert(payments::ActiveModel::from(payment))
            .exec_without_returning(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_payment(&mut self, id: PaymentId) -> Result<Option<Payment>, StoreError> {
        payments::Entity::find_by_id(id.into_inner())
            .one(&self.txn)
            .await
            .map_err(db_err)?
            .map(payments::Model::into_domain)
            .transpose()
    }

    async fn update_payment(&mut self, payment: &Payment) -> Result<(), StoreError> {
        payments::Entity::update(payments::ActiveModel::from(payment))
            .exec(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn payments_of(&mut self, document_id: DocumentId) -> Result<Vec<Payment>, StoreError> {
        payments::Entity::find()
            .filter(payments::Column::DocumentId.eq(document_id.into_inner()))
            .order_by_asc(payments::Column::Seq)
            .all(&self.txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(payments::Model::into_domain)
            .collect()
    }
}

#[async_trait]
impl ActivityLog for SeaTx {
    async fn append_activity(&mut self, entry: &ActivityLogEntry) -> Result<(), StoreError> {
        journal_activity_log::Entity::insert(journal_activity_log::ActiveModel::from(entry))
            .exec_without_returning(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn activity_for_entry(
        &mut self,
        entry_id: JournalEntryId,
    ) -> Result<Vec<ActivityLogEntry>, StoreError> {
        journal_activity_log::Entity::find()
            .filter(journal_activity_log::Column::JournalEntryId.eq(entry_id.into_inner()))
            .order_by_asc(journal_activity_log::Column::Seq)
            .all(&self.txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(journal_activity_log::Model::into_domain)
            .collect()
    }
}
