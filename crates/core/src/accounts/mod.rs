//! Account directory: charts of accounts and lookup by well-known code.

pub mod chart;
pub mod directory;
pub mod types;


pub use chart::{ChartService, ProvisionedCompany, ensure_account_structure};
pub use directory::AccountDirectory;
pub use types::{Account, AccountRole, ChartOfAccounts, StandardAccount};
