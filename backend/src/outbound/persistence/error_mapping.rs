//! Shared Diesel error mapping and column conversions for the repositories.

use tracing::debug;

use super::pool::PoolError;

/// Message carried by a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Closed connections become connection errors; every other failure is a
/// query error with a redacted message.
pub(crate) fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    operation: &str,
    query: Q,
    connection: C,
) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        _ => debug!(%error, operation, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Generate `map_pool_error` and `map_diesel_error` for a port error type
/// built with snake_case `connection`/`query` constructors.
macro_rules! port_error_mapping {
    ($error:ty, $operation:literal) => {
        fn map_pool_error(error: $crate::outbound::persistence::PoolError) -> $error {
            <$error>::connection($crate::outbound::persistence::error_mapping::pool_error_message(
                error,
            ))
        }

        fn map_diesel_error(error: diesel::result::Error) -> $error {
            $crate::outbound::persistence::error_mapping::map_basic_diesel_error(
                error,
                $operation,
                <$error>::query,
                <$error>::connection,
            )
        }
    };
}

pub(crate) use port_error_mapping;

/// Counters are stored as signed integers and never negative.
pub(crate) fn column_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

pub(crate) fn column_u32(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Saturate counters that exceed the signed column range.
pub(crate) fn db_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub(crate) fn db_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
