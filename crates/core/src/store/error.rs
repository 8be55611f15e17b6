//! Persistence port error types.

use thiserror::Error;

/// Errors reported by a store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referential constraint rejected the write or delete.
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// A persisted row could not be mapped back to a domain value.
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UniqueViolation(_) => "UNIQUE_VIOLATION",
            Self::ForeignKeyViolation(_) => "FOREIGN_KEY_VIOLATION",
            Self::Corrupt(_) => "CORRUPT_ROW",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if retrying the whole unit of work may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }
}
