//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger posting behaviour.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// What to do when a company's chart has no tax payable account (code 2101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxAccountFallback {
    /// Post the tax line against the revenue/expense account that was taxed.
    #[default]
    ReferenceAccount,
    /// Refuse to build the entry until the tax payable account exists.
    Reject,
}

/// Ledger posting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Age in days after which a posted entry can only be unposted with force.
    #[serde(default = "default_unpost_window_days")]
    pub unpost_window_days: i64,
    /// Tax payable account resolution policy.
    #[serde(default)]
    pub tax_account_fallback: TaxAccountFallback,
    /// Description prefix of void reversals.
    #[serde(default = "default_void_prefix")]
    pub void_prefix: String,
    /// Description prefix of refund reversals.
    #[serde(default = "default_refund_prefix")]
    pub refund_prefix: String,
}

fn default_unpost_window_days() -> i64 {
    30
}

fn default_void_prefix() -> String {
    "REVERSAL of ".to_string()
}

fn default_refund_prefix() -> String {
    "REFUND REVERSAL of ".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            unpost_window_days: default_unpost_window_days(),
            tax_account_fallback: TaxAccountFallback::default(),
            void_prefix: default_void_prefix(),
            refund_prefix: default_refund_prefix(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
