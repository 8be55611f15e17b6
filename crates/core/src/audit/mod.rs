//! Audit trail of journal entry actions.

pub mod log;
pub mod types;

pub use log::ActivityLog;
pub use types::{ActivityAction, ActivityLogEntry, JournalSnapshot, SnapshotLine};
