//! Tax rule engine.
//!
//! Computes one extra transaction line per active tax rule of a company and
//! appends it to an entry that has not been posted yet.

pub mod engine;
pub mod types;

pub use engine::TaxEngine;
pub use types::{TaxRule, TaxRuleStore};
