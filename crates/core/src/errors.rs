//! Core error types for fundmatch.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use thiserror::Error;

use crate::funding::FundingError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the funding application.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Funding operation failed: {0}")]
    Funding(#[from] FundingError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Whether the operation may succeed if the caller runs it again.
    ///
    /// Only store availability and lock contention qualify. Invariant and
    /// validation failures are deterministic and will fail again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Database(
                DatabaseError::ConnectionFailed(_)
                    | DatabaseError::PoolCreationFailed(_)
                    | DatabaseError::Busy(_)
                    | DatabaseError::TransactionFailed(_)
            )
        )
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A CHECK constraint was violated.
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// The database was locked by another writer.
    #[error("Database is busy: {0}")]
    Busy(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funding::FundingKind;

    #[test]
    fn test_store_contention_is_retryable() {
        let err = Error::Database(DatabaseError::Busy("database is locked".to_string()));
        assert!(err.is_retryable());

        let err = Error::Database(DatabaseError::ConnectionFailed("gone".to_string()));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_invariant_violation_is_not_retryable() {
        let err = Error::Funding(FundingError::NonPositiveFullAmount {
            kind: FundingKind::Target,
            id: None,
            full_amount: 0,
        });
        assert!(!err.is_retryable());

        let err = Error::Database(DatabaseError::CheckViolation("full_amount".to_string()));
        assert!(!err.is_retryable());
    }
}
