//! Tax rule types and persistence port.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{CompanyId, TaxRuleId};

use crate::store::StoreError;

/// A percentage tax applied to document amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRule {
    /// Unique identifier.
    pub id: TaxRuleId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Display name, also used as the tax line description.
    pub name: String,
    /// Region the rule applies to.
    pub region: Option<String>,
    /// Rate in percent (e.g. `7.5` for 7.5%).
    pub rate: Decimal,
    /// Inactive rules are ignored.
    pub is_active: bool,
}

impl TaxRule {
    /// Creates an active rule.
    #[must_use]
    pub fn new(company_id: CompanyId, name: impl Into<String>, rate: Decimal) -> Self {
        Self {
            id: TaxRuleId::new(),
            company_id,
            name: name.into(),
            region: None,
            rate,
            is_active: true,
        }
    }
}

/// Tax rule persistence port.
#[async_trait]
pub trait TaxRuleStore: Send {
    /// Returns the active rules of a company in creation order.
    async fn active_tax_rules(&mut self, company_id: CompanyId) -> Result<Vec<TaxRule>, StoreError>;

    /// Inserts a rule.
    async fn insert_tax_rule(&mut self, rule: &TaxRule) -> Result<(), StoreError>;
}
