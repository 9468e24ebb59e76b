//! Error classification shared by the Diesel adapters.
//!
//! Each adapter owns its port error type; this module only sorts Diesel and
//! pool failures into the buckets those types distinguish.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Adapter-neutral view of a failed database call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped or could not be obtained.
    Connection(String),
    /// A unique constraint rejected an insert.
    UniqueViolation(String),
    /// Anything else.
    Query(String),
}

impl From<PoolError> for DieselFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

/// Classify `error`, logging the raw database message at debug level.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
            match kind {
                DatabaseErrorKind::ClosedConnection => {
                    DieselFailure::Connection("database connection closed".to_owned())
                }
                DatabaseErrorKind::UniqueViolation => {
                    DieselFailure::UniqueViolation(info.message().to_owned())
                }
                _ => DieselFailure::Query(format!("{operation}: database error")),
            }
        }
        DieselError::BrokenTransactionManager => {
            DieselFailure::Connection("broken transaction manager".to_owned())
        }
        other => {
            debug!(error = %other, operation, "diesel operation failed");
            DieselFailure::Query(format!("{operation}: {other}"))
        }
    }
}
