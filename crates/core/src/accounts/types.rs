//! Chart of accounts types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, ChartId, EntityId};

/// Account role (type) in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Asset account (debit normal balance).
    Asset,
    /// Liability account (credit normal balance).
    Liability,
    /// Equity account (credit normal balance).
    Equity,
    /// Revenue account (credit normal balance).
    Revenue,
    /// Expense account (debit normal balance).
    Expense,
}

impl AccountRole {
    /// Returns the persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown account role: {s}")),
        }
    }
}

/// The chart of accounts of one accounting entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOfAccounts {
    /// Unique identifier.
    pub id: ChartId,
    /// The owning entity; at most one chart per entity.
    pub entity_id: EntityId,
    /// Display name.
    pub name: String,
}

impl ChartOfAccounts {
    /// Creates a new chart for an entity.
    #[must_use]
    pub fn new(entity_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id: ChartId::new(),
            entity_id,
            name: name.into(),
        }
    }
}

/// An account; `(chart_id, code)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// The chart this account belongs to.
    pub chart_id: ChartId,
    /// Account code, unique within the chart.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account role.
    pub role: AccountRole,
    /// Parent account in the tree.
    pub parent_id: Option<AccountId>,
}

/// Well-known accounts every chart carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardAccount {
    /// 1000 Assets.
    Assets,
    /// 1100 Cash.
    Cash,
    /// 1200 Accounts Receivable.
    AccountsReceivable,
    /// 1300 Inventory.
    Inventory,
    /// 2000 Liabilities.
    Liabilities,
    /// 2100 Accounts Payable.
    AccountsPayable,
    /// 2101 Tax Payable.
    TaxPayable,
    /// 3000 Equity.
    Equity,
    /// 4000 Revenue.
    Revenue,
    /// 5000 Expenses.
    Expenses,
}

impl StandardAccount {
    /// Every standard account, parents before children.
    pub const ALL: [Self; 10] = [
        Self::Assets,
        Self::Cash,
        Self::AccountsReceivable,
        Self::Inventory,
        Self::Liabilities,
        Self::AccountsPayable,
        Self::TaxPayable,
        Self::Equity,
        Self::Revenue,
        Self::Expenses,
    ];

    /// Returns the account code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Assets => "1000",
            Self::Cash => "1100",
            Self::AccountsReceivable => "1200",
            Self::Inventory => "1300",
            Self::Liabilities => "2000",
            Self::AccountsPayable => "2100",
            Self::TaxPayable => "2101",
            Self::Equity => "3000",
            Self::Revenue => "4000",
            Self::Expenses => "5000",
        }
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Assets => "Assets",
            Self::Cash => "Cash",
            Self::AccountsReceivable => "Accounts Receivable",
            Self::Inventory => "Inventory",
            Self::Liabilities => "Liabilities",
            Self::AccountsPayable => "Accounts Payable",
            Self::TaxPayable => "Tax Payable",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::Expenses => "Expenses",
        }
    }

    /// Returns the account role.
    #[must_use]
    pub const fn role(self) -> AccountRole {
        match self {
            Self::Assets | Self::Cash | Self::AccountsReceivable | Self::Inventory => {
                AccountRole::Asset
            }
            Self::Liabilities | Self::AccountsPayable | Self::TaxPayable => AccountRole::Liability,
            Self::Equity => AccountRole::Equity,
            Self::Revenue => AccountRole::Revenue,
            Self::Expenses => AccountRole::Expense,
        }
    }

    /// Returns the parent account, if any.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Cash | Self::AccountsReceivable | Self::Inventory => Some(Self::Assets),
            Self::AccountsPayable | Self::TaxPayable => Some(Self::Liabilities),
            _ => None,
        }
    }
}
