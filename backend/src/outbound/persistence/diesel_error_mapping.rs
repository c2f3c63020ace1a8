//! Diesel and pool error mapping for the deck repository.

use tracing::{debug, warn};

use crate::domain::DeckId;
use crate::domain::ports::DeckRepositoryError;

use super::pool::PoolError;

const CARDS_DECK_FK: &str = "cards_deck_id_fkey";

/// Map pool errors to repository connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> DeckRepositoryError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    DeckRepositoryError::connection(message)
}

fn references_deck(message: &str, constraint_name: Option<&str>) -> bool {
    constraint_name == Some(CARDS_DECK_FK) || message.contains(CARDS_DECK_FK)
}

/// Map Diesel errors to repository errors.
///
/// A foreign-key violation on `cards.deck_id` means the deck vanished between
/// the ownership check and the card insert; it surfaces as
/// [`DeckRepositoryError::DeckNotFound`] for `deck_id`.
pub(crate) fn map_diesel_error(
    error: diesel::result::Error,
    deck_id: Option<DeckId>,
) -> DeckRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

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
        DieselError::NotFound => DeckRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => DeckRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DeckRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            match deck_id {
                Some(id) if references_deck(info.message(), info.constraint_name()) => {
                    DeckRepositoryError::deck_not_found(id.get())
                }
                _ => {
                    warn!(
                        message = info.message(),
                        constraint_name = ?info.constraint_name(),
                        "unrecognised foreign key violation"
                    );
                    DeckRepositoryError::query("foreign key violation")
                }
            }
        }
        _ => DeckRepositoryError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    struct FakeInfo {
        message: &'static str,
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for FakeInfo {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(
        kind: DatabaseErrorKind,
        message: &'static str,
        constraint: Option<&'static str>,
    ) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(FakeInfo { message, constraint }))
    }

    #[rstest]
    #[case(Some(CARDS_DECK_FK), "insert or update on table \"cards\" violates foreign key")]
    #[case(None, "violates foreign key constraint \"cards_deck_id_fkey\"")]
    fn card_fk_violation_means_the_deck_is_gone(
        #[case] constraint: Option<&'static str>,
        #[case] message: &'static str,
    ) {
        let error = database_error(DatabaseErrorKind::ForeignKeyViolation, message, constraint);
        assert_eq!(
            map_diesel_error(error, Some(DeckId::new(7))),
            DeckRepositoryError::deck_not_found(7_i64)
        );
    }

    #[test]
    fn fk_violation_without_deck_context_is_a_query_error() {
        let error = database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            "violates foreign key constraint",
            Some(CARDS_DECK_FK),
        );
        assert!(matches!(
            map_diesel_error(error, None),
            DeckRepositoryError::Query { .. }
        ));
    }

    #[test]
    fn closed_connections_map_to_connection_errors() {
        let error = database_error(DatabaseErrorKind::ClosedConnection, "gone", None);
        assert!(matches!(
            map_diesel_error(error, None),
            DeckRepositoryError::Connection { .. }
        ));
    }

    #[test]
    fn pool_errors_keep_their_message() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, DeckRepositoryError::connection("timed out"));
    }
}
