//! Shared error mapping for Diesel adapters.
//!
//! Every adapter fails the same three ways, so the pool and Diesel error
//! translations live here once. Unique violations become
//! [`StoreError::Duplicate`], which services treat as a lost
//! check-then-act race.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::StoreError;

use super::pool::PoolError;

/// Map pool errors to store errors.
pub(crate) fn map_pool_error(error: PoolError) -> StoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StoreError::connection(message)
        }
    }
}

/// Map Diesel errors to store errors.
pub(crate) fn map_diesel_error(error: DieselError) -> StoreError {
    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    } else {
        debug!(%error, "diesel operation failed");
    }

    match error {
        DieselError::NotFound => StoreError::query("record not found"),
        DieselError::DatabaseError(kind, _) => match kind {
            DatabaseErrorKind::UniqueViolation => {
                StoreError::duplicate("unique constraint violated")
            }
            DatabaseErrorKind::ClosedConnection => {
                StoreError::connection("database connection closed")
            }
            _ => StoreError::query("database error"),
        },
        _ => StoreError::query("database error"),
    }
}

/// Map a row count conversion into the u64 the ports speak.
pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unique_violation_maps_to_duplicate() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_owned()),
        );
        assert!(matches!(map_diesel_error(error), StoreError::Duplicate { .. }));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        assert!(matches!(
            map_diesel_error(DieselError::NotFound),
            StoreError::Query { .. }
        ));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(error, StoreError::Connection { .. }));
        assert!(error.to_string().contains("timed out"));
    }
}
