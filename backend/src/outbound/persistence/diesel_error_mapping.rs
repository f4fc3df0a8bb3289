//! Shared Diesel error classification for the demo repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse failure class a repository maps onto its own port error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection was lost or could not be obtained.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation(String),
    /// Any other query failure.
    Query(String),
}

/// Message carried by a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, logging the raw cause at debug level.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => debug!(
            ?kind,
            message = info.message(),
            constraint = ?info.constraint_name(),
            operation,
            "diesel operation failed"
        ),
        other => debug!(error = %other, operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation(match info.constraint_name() {
                Some(constraint) => format!("{operation}: unique constraint {constraint} violated"),
                None => format!("{operation}: unique constraint violated"),
            })
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection(format!("{operation}: database connection closed"))
        }
        DieselError::NotFound => DieselFailure::Query(format!("{operation}: record not found")),
        DieselError::QueryBuilderError(_) => {
            DieselFailure::Query(format!("{operation}: invalid query"))
        }
        _ => DieselFailure::Query(format!("{operation}: database error")),
    }
}

/// Convert a row count reported by Diesel.
pub(crate) fn row_count(affected: usize) -> u64 {
    u64::try_from(affected).unwrap_or(u64::MAX)
}
