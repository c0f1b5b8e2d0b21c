//! Error mapping from Diesel and pool failures into repository errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;
use crate::domain::ports::RandomUserRepositoryError;

/// Map pool errors to repository connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> RandomUserRepositoryError {
    RandomUserRepositoryError::connection(error.into_message())
}

/// Map a failure while ensuring the table exists.
pub(crate) fn map_schema_error(error: DieselError) -> RandomUserRepositoryError {
    debug!(%error, "random_users table creation failed");
    match error {
        DieselError::DatabaseError(_, info) => {
            RandomUserRepositoryError::schema(info.message().to_owned())
        }
        other => RandomUserRepositoryError::schema(other.to_string()),
    }
}

/// Map a failure inside the load transaction.
///
/// Unique violations name the offending constraint, so a duplicate `email`
/// under a fresh `uuid` is distinguishable from other failures.
pub(crate) fn map_diesel_error(error: DieselError) -> RandomUserRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or("unknown constraint");
            RandomUserRepositoryError::query(format!(
                "unique constraint `{constraint}` violated: {}",
                info.message()
            ))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            RandomUserRepositoryError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => {
            RandomUserRepositoryError::query(info.message().to_owned())
        }
        other => RandomUserRepositoryError::query(other.to_string()),
    }
}
