//! Storage-specific error types for SQLite operations.
//!
//! This module provides error types that wrap Diesel-specific errors and convert
//! them to the database-agnostic error types defined in `fundmatch_core`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use fundmatch_core::errors::{DatabaseError, Error};
use thiserror::Error;

/// Storage-specific errors that wrap Diesel and r2d2 types.
///
/// These errors are internal to the storage layer and are converted to
/// `fundmatch_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A core error raised inside a write job. Carried through the
    /// transaction wrapper untouched so callers still see the original.
    #[error(transparent)]
    Core(#[from] Error),
}

fn is_lock_contention(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("database is locked") || message.contains("database is busy")
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => {
                Error::Database(DatabaseError::PoolCreationFailed(e.to_string()))
            }
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            StorageError::QueryFailed(DieselError::DatabaseError(kind, info)) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => {
                        Error::Database(DatabaseError::UniqueViolation(message))
                    }
                    DatabaseErrorKind::CheckViolation => {
                        Error::Database(DatabaseError::CheckViolation(message))
                    }
                    DatabaseErrorKind::SerializationFailure => {
                        Error::Database(DatabaseError::Busy(message))
                    }
                    _ if is_lock_contention(&message) => {
                        Error::Database(DatabaseError::Busy(message))
                    }
                    _ => Error::Database(DatabaseError::QueryFailed(message)),
                }
            }
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::MigrationFailed(e) => Error::Database(DatabaseError::MigrationFailed(e)),
            StorageError::Core(e) => e,
        }
    }
}

/// Extension trait for easily converting Diesel Results to core Results.
///
/// This provides a `.into_core()` method on any `Result<T, diesel::result::Error>`
/// which handles the conversion through StorageError.
pub trait IntoCore<T> {
    fn into_core(self) -> fundmatch_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> fundmatch_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self) -> fundmatch_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundmatch_core::funding::{FundingError, FundingKind};

    #[test]
    fn test_core_error_survives_round_trip() {
        let original = Error::Funding(FundingError::NotFound {
            kind: FundingKind::Source,
            id: 7,
        });

        let converted: Error = StorageError::from(original).into();

        assert!(matches!(
            converted,
            Error::Funding(FundingError::NotFound { id: 7, .. })
        ));
    }

    #[test]
    fn test_not_found_maps_to_database_not_found() {
        let converted: Error = StorageError::from(DieselError::NotFound).into();
        assert!(matches!(
            converted,
            Error::Database(DatabaseError::NotFound(_))
        ));
    }

    #[test]
    fn test_lock_messages_are_detected() {
        assert!(is_lock_contention("database is locked"));
        assert!(is_lock_contention("Database Is Busy"));
        assert!(!is_lock_contention("no such table: targets"));
    }
}
