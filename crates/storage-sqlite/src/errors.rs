//! Storage-specific error types for SQLite operations.
//!
//! Diesel, r2d2 and JSON column failures are wrapped here and converted to the
//! database-agnostic errors of `goalie_core` at the repository boundary.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use goalie_core::errors::{DatabaseError, Error};
use thiserror::Error;

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

    /// A JSON column could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A core error raised inside a writer job; carried through the
    /// transaction untouched so callers still see the original variant.
    #[error(transparent)]
    Core(Error),
}

/// Lets writer jobs return core errors through `immediate_transaction`.
impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::Core(err)
    }
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
            StorageError::QueryFailed(DieselError::DatabaseError(kind, info)) => match kind {
                DatabaseErrorKind::UniqueViolation => {
                    Error::Database(DatabaseError::UniqueViolation(info.message().to_string()))
                }
                DatabaseErrorKind::ForeignKeyViolation => Error::Database(
                    DatabaseError::ForeignKeyViolation(info.message().to_string()),
                ),
                DatabaseErrorKind::CheckViolation => {
                    Error::ConstraintViolation(info.message().to_string())
                }
                _ => Error::Database(DatabaseError::QueryFailed(info.message().to_string())),
            },
            StorageError::QueryFailed(DieselError::RollbackTransaction) => Error::Database(
                DatabaseError::TransactionFailed("transaction rolled back".to_string()),
            ),
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::MigrationFailed(e) => Error::Database(DatabaseError::MigrationFailed(e)),
            StorageError::SerializationError(e) => {
                Error::Database(DatabaseError::Internal(e.to_string()))
            }
            StorageError::Core(e) => e,
        }
    }
}

/// Extension trait for converting Diesel and pool results to core results.
///
/// Provides `.into_core()` on `Result<T, diesel::result::Error>` and
/// `Result<T, r2d2::Error>`, routing the error through `StorageError`.
pub trait IntoCore<T> {
    fn into_core(self) -> goalie_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> goalie_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self) -> goalie_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}
