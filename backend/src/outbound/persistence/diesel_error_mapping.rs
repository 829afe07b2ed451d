//! Classification of Diesel failures shared by the repositories.
//!
//! Each adapter turns a [`DieselFailure`] into its own port error so that
//! constraint violations keep their meaning (duplicate e-mail, missing ad)
//! while everything else collapses into connection or query errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// What a Diesel error means to a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DieselFailure {
    UniqueViolation,
    ForeignKeyViolation,
    Connection(&'static str),
    Query(&'static str),
}

pub(super) fn classify(error: &DieselError, operation: &str) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        other => debug!(error = %other, %operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DieselFailure::ForeignKeyViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        _ => DieselFailure::Query("database error"),
    }
}

/// Collapse a failure for ports without constraint-specific variants.
pub(super) fn map_basic<E>(
    error: &DieselError,
    operation: &str,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match classify(error, operation) {
        DieselFailure::Connection(message) => connection(message),
        DieselFailure::Query(message) => query(message),
        DieselFailure::UniqueViolation => query("unique constraint violated"),
        DieselFailure::ForeignKeyViolation => query("foreign key constraint violated"),
    }
}
