//! In-memory store adapter.
//!
//! Units of work are serialised: [`MemoryStore::begin`] takes the store
//! lock and works on a private copy of the state, which `commit` publishes.
//! Uniqueness and referential constraints mirror the relational schema.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tally_shared::types::{
    AccountId, ChartId, CompanyId, DocumentId, EntityId, JournalEntryId, LedgerId, PaymentId,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{Store, StoreError, UnitOfWork};
use crate::accounts::{Account, AccountDirectory, ChartOfAccounts};
use crate::audit::{ActivityLog, ActivityLogEntry};
use crate::company::{Company, CompanyStore};
use crate::document::{Document, DocumentStore, Payment};
use crate::ledger::{JournalEntry, Ledger, LedgerStore, TransactionLine};
use crate::tax::{TaxRule, TaxRuleStore};

#[derive(Debug, Default, Clone)]
struct State {
    companies: HashMap<CompanyId, Company>,
    charts: HashMap<ChartId, ChartOfAccounts>,
    accounts: HashMap<AccountId, Account>,
    ledgers: HashMap<LedgerId, Ledger>,
    entries: HashMap<JournalEntryId, JournalEntry>,
    lines: Vec<TransactionLine>,
    tax_rules: Vec<TaxRule>,
    documents: HashMap<DocumentId, Document>,
    payments: Vec<Payment>,
    activity: Vec<ActivityLogEntry>,
}

/// Store keeping every table in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let work = guard.clone();
        Ok(MemoryTx { guard, work })
    }
}

/// Unit of work over a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryTx {
    guard: OwnedMutexGuard<State>,
    work: State,
}

#[async_trait]
impl UnitOfWork for MemoryTx {
    async fn commit(mut self) -> Result<(), StoreError> {
        *self.guard = self.work;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl CompanyStore for MemoryTx {
    async fn insert_company(&mut self, company: &Company) -> Result<(), StoreError> {
        if self.work.companies.contains_key(&company.id) {
            return Err(StoreError::UniqueViolation("companies_pkey".into()));
        }
        self.work.companies.insert(company.id, company.clone());
        Ok(())
    }

    async fn find_company(&mut self, id: CompanyId) -> Result<Option<Company>, StoreError> {
        Ok(self.work.companies.get(&id).cloned())
    }
}

#[async_trait]
impl AccountDirectory for MemoryTx {
    async fn find_chart_by_entity(
        &mut self,
        entity_id: EntityId,
    ) -> Result<Option<ChartOfAccounts>, StoreError> {
        Ok(self.work.charts.values().find(|c| c.entity_id == entity_id).cloned())
    }

    async fn insert_chart(&mut self, chart: &ChartOfAccounts) -> Result<bool, StoreError> {
        if self.work.charts.values().any(|c| c.entity_id == chart.entity_id) {
            return Ok(false);
        }
        self.work.charts.insert(chart.id, chart.clone());
        Ok(true)
    }

    async fn find_account(&mut self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.work.accounts.get(&id).cloned())
    }

    async fn find_account_by_code(
        &mut self,
        chart_id: ChartId,
        code: &str,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .work
            .accounts
            .values()
            .find(|a| a.chart_id == chart_id && a.code == code)
            .cloned())
    }

    async fn insert_account(&mut self, account: &Account) -> Result<bool, StoreError> {
        if !self.work.charts.contains_key(&account.chart_id) {
            return Err(StoreError::ForeignKeyViolation("accounts_chart_id_fkey".into()));
        }
        if let Some(parent) = account.parent_id
            && !self.work.accounts.contains_key(&parent)
        {
            return Err(StoreError::ForeignKeyViolation("accounts_parent_id_fkey".into()));
        }
        let taken = self
            .work
            .accounts
            .values()
            .any(|a| a.chart_id == account.chart_id && a.code == account.code);
        if taken {
            return Ok(false);
        }
        self.work.accounts.insert(account.id, account.clone());
        Ok(true)
    }

    async fn delete_account(&mut self, id: AccountId) -> Result<(), StoreError> {
        if self.work.lines.iter().any(|l| l.account_id == id) {
            return Err(StoreError::ForeignKeyViolation("transaction_lines_account_id_fkey".into()));
        }
        if self.work.accounts.values().any(|a| a.parent_id == Some(id)) {
            return Err(StoreError::ForeignKeyViolation("accounts_parent_id_fkey".into()));
        }
        self.work.accounts.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryTx {
    async fn find_ledger_by_entity(
        &mut self,
        entity_id: EntityId,
    ) -> Result<Option<Ledger>, StoreError> {
        Ok(self.work.ledgers.values().find(|l| l.entity_id == entity_id).cloned())
    }

    async fn insert_ledger(&mut self, ledger: &Ledger) -> Result<(), StoreError> {
        if self.work.ledgers.values().any(|l| l.entity_id == ledger.entity_id) {
            return Err(StoreError::UniqueViolation("ledgers_entity_id_key".into()));
        }
        self.work.ledgers.insert(ledger.id, ledger.clone());
        Ok(())
    }

    async fn find_entry(&mut self, id: JournalEntryId) -> Result<Option<JournalEntry>, StoreError> {
        Ok(self.work.entries.get(&id).cloned())
    }

    async fn lock_entry(&mut self, id: JournalEntryId) -> Result<Option<JournalEntry>, StoreError> {
        // The whole unit of work already holds the store lock.
        self.find_entry(id).await
    }

    async fn insert_entry(&mut self, entry: &JournalEntry) -> Result<(), StoreError> {
        if !self.work.ledgers.contains_key(&entry.ledger_id) {
            return Err(StoreError::ForeignKeyViolation("journal_entries_ledger_id_fkey".into()));
        }
        if let Some(target) = entry.reversal_of
            && !self.work.entries.contains_key(&target)
        {
            return Err(StoreError::ForeignKeyViolation("journal_entries_reversal_of_fkey".into()));
        }
        self.work.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn update_entry(&mut self, entry: &JournalEntry) -> Result<(), StoreError> {
        match self.work.entries.get_mut(&entry.id) {
            Some(stored) => {
                stored.posted = entry.posted;
                stored.locked = entry.locked;
                stored.timestamp = entry.timestamp;
                Ok(())
            }
            None => Err(StoreError::Database(format!("journal entry {} does not exist", entry.id))),
        }
    }

    async fn insert_line(&mut self, line: &TransactionLine) -> Result<(), StoreError> {
        if !self.work.entries.contains_key(&line.journal_entry_id) {
            return Err(StoreError::ForeignKeyViolation(
                "transaction_lines_journal_entry_id_fkey".into(),
            ));
        }
        if !self.work.accounts.contains_key(&line.account_id) {
            return Err(StoreError::ForeignKeyViolation("transaction_lines_account_id_fkey".into()));
        }
        self.work.lines.push(line.clone());
        Ok(())
    }

    async fn find_reversals(
        &mut self,
        entry_id: JournalEntryId,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        let mut reversals: Vec<_> = self
            .work
            .entries
            .values()
            .filter(|e| e.reversal_of == Some(entry_id))
            .cloned()
            .collect();
        reversals.sort_by_key(|e| (e.timestamp, e.id));
        Ok(reversals)
    }

    async fn lines_of(
        &mut self,
        entry_id: JournalEntryId,
    ) -> Result<Vec<TransactionLine>, StoreError> {
        let mut lines: Vec<_> = self
            .work
            .lines
            .iter()
            .filter(|l| l.journal_entry_id == entry_id)
            .cloned()
            .collect();
        lines.sort_by_key(|l| l.position);
        Ok(lines)
    }
}

#[async_trait]
impl TaxRuleStore for MemoryTx {
    async fn active_tax_rules(
        &mut self,
        company_id: CompanyId,
    ) -> Result<Vec<TaxRule>, StoreError> {
        Ok(self
            .work
            .tax_rules
            .iter()
            .filter(|r| r.company_id == company_id && r.is_active)
            .cloned()
            .collect())
    }

    async fn insert_tax_rule(&mut self, rule: &TaxRule) -> Result<(), StoreError> {
        if !self.work.companies.contains_key(&rule.company_id) {
            return Err(StoreError::ForeignKeyViolation("tax_rules_company_id_fkey".into()));
        }
        self.work.tax_rules.push(rule.clone());
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryTx {
    async fn insert_document(&mut self, document: &Document) -> Result<(), StoreError> {
        if !self.work.companies.contains_key(&document.company_id) {
            return Err(StoreError::ForeignKeyViolation("documents_company_id_fkey".into()));
        }
        self.work.documents.insert(document.id, document.clone());
        Ok(())
    }

    async fn find_document(&mut self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        Ok(self.work.documents.get(&id).cloned())
    }

    async fn lock_document(&mut self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        self.find_document(id).await
    }

    async fn update_document(&mut self, document: &Document) -> Result<(), StoreError> {
        match self.work.documents.get_mut(&document.id) {
            Some(stored) => {
                stored.status = document.status;
                stored.journal_entry_id = document.journal_entry_id;
                Ok(())
            }
            None => Err(StoreError::Database(format!("document {} does not exist", document.id))),
        }
    }

    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), StoreError> {
        if !self.work.documents.contains_key(&payment.document_id) {
            return Err(StoreError::ForeignKeyViolation("payments_document_id_fkey".into()));
        }
        self.work.payments.push(payment.clone());
        Ok(())
    }

    async fn find_payment(&mut self, id: PaymentId) -> Result<Option<Payment>, StoreError> {
        Ok(self.work.payments.iter().find(|p| p.id == id).cloned())
    }

    async fn update_payment(&mut self, payment: &Payment) -> Result<(), StoreError> {
        match self.work.payments.iter_mut().find(|p| p.id == payment.id) {
            Some(stored) => {
                stored.status = payment.status;
                stored.journal_entry_id = payment.journal_entry_id;
                Ok(())
            }
            None => Err(StoreError::Database(format!("payment {} does not exist", payment.id))),
        }
    }

    async fn payments_of(&mut self, document_id: DocumentId) -> Result<Vec<Payment>, StoreError> {
        Ok(self
            .work
            .payments
            .iter()
            .filter(|p| p.document_id == document_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ActivityLog for MemoryTx {
    async fn append_activity(&mut self, entry: &ActivityLogEntry) -> Result<(), StoreError> {
        if !self.work.entries.contains_key(&entry.journal_entry_id) {
            return Err(StoreError::ForeignKeyViolation(
                "journal_activity_log_journal_entry_id_fkey".into(),
            ));
        }
        self.work.activity.push(entry.clone());
        Ok(())
    }

    async fn activity_for_entry(
        &mut self,
        entry_id: JournalEntryId,
    ) -> Result<Vec<ActivityLogEntry>, StoreError> {
        Ok(self
            .work
            .activity
            .iter()
            .filter(|a| a.journal_entry_id == entry_id)
            .cloned()
            .collect())
    }
}
