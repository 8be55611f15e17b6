//! Chart of accounts bootstrap and company provisioning.

use tally_shared::types::{AccountId, EntityId, UserId};
use tracing::info;

use super::directory::AccountDirectory;
use super::types::{Account, ChartOfAccounts, StandardAccount};
use crate::company::{Company, CompanyStore};
use crate::ledger::{Ledger, LedgerError, LedgerStore};
use crate::store::{Store, UnitOfWork};

/// Ensures the entity has a chart carrying every [`StandardAccount`].
///
/// Idempotent: inserts are conflict-tolerant and every row is re-read, so
/// repeated or concurrent calls return the same chart identity.
pub async fn ensure_account_structure<T>(
    tx: &mut T,
    entity_id: EntityId,
) -> Result<ChartOfAccounts, LedgerError>
where
    T: AccountDirectory,
{
    let candidate = ChartOfAccounts::new(entity_id, "Chart of Accounts");
    let created = tx.insert_chart(&candidate).await?;
    let chart = tx.chart_for(entity_id).await?;

    for standard in StandardAccount::ALL {
        if tx.find_account_by_code(chart.id, standard.code()).await?.is_some() {
            continue;
        }

        let parent_id = match standard.parent() {
            Some(parent) => Some(tx.resolve_standard(chart.id, parent).await?.id),
            None => None,
        };
        let account = Account {
            id: AccountId::new(),
            chart_id: chart.id,
            code: standard.code().to_string(),
            name: standard.name().to_string(),
            role: standard.role(),
            parent_id,
        };
        tx.insert_account(&account).await?;
    }

    if created {
        info!(entity_id = %entity_id, chart_id = %chart.id, "Chart of accounts created");
    }
    Ok(chart)
}

/// A company together with its chart and ledger.
#[derive(Debug, Clone)]
pub struct ProvisionedCompany {
    /// The company.
    pub company: Company,
    /// Its chart of accounts.
    pub chart: ChartOfAccounts,
    /// Its single ledger.
    pub ledger: Ledger,
}

/// Service for provisioning companies and their charts.
#[derive(Debug, Clone)]
pub struct ChartService<S> {
    store: S,
}

impl<S: Store> ChartService<S> {
    /// Creates a new chart service.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a company with its chart of accounts and ledger in one unit of work.
    pub async fn register_company(
        &self,
        name: &str,
        owner: Option<UserId>,
    ) -> Result<ProvisionedCompany, LedgerError> {
        let mut tx = self.store.begin().await?;

        let company = Company::new(name, owner);
        tx.insert_company(&company).await?;
        let chart = ensure_account_structure(&mut tx, company.entity_id).await?;
        let ledger = tx.open_ledger(company.entity_id, &format!("{name} General Ledger")).await?;

        tx.commit().await?;

        info!(company_id = %company.id, ledger_id = %ledger.id, "Company registered");
        Ok(ProvisionedCompany { company, chart, ledger })
    }

    /// Ensures the standard chart exists for an entity.
    pub async fn ensure_account_structure(
        &self,
        entity_id: EntityId,
    ) -> Result<ChartOfAccounts, LedgerError> {
        let mut tx = self.store.begin().await?;
        let chart = ensure_account_structure(&mut tx, entity_id).await?;
        tx.commit().await?;
        Ok(chart)
    }
}
