//! Document lifecycle controller for invoices, bills, and payments.
//!
//! This module provides:
//! - Document, payment, and status types
//! - Pure status derivation and transition rules
//! - The document persistence port
//! - [`DocumentService`], which posts and reverses journal entries as
//!   documents move through their lifecycle

pub mod error;
pub mod lifecycle;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod service_tests;

pub use error::DocumentError;
pub use lifecycle::derive_status;
pub use service::DocumentService;
pub use store::DocumentStore;
pub use types::{
    Document, DocumentBalance, DocumentKind, DocumentStatus, NewDocument, NewPayment, Payment,
    PaymentMethod, PaymentStatus,
};
