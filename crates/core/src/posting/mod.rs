//! Journal posting state machine.

pub mod machine;
pub mod rules;
pub mod service;


pub use machine::{PostingMachine, capture_snapshot};
pub use rules::check_unpost_window;
pub use service::JournalService;
