//! Deck and card domain services.
//!
//! [`DeckService`] implements the manual mutation pipeline ([`DeckCommand`])
//! and the owner-scoped reads ([`DeckQuery`]).
//!
//! [`DeckCommand`]: crate::domain::ports::DeckCommand
//! [`DeckQuery`]: crate::domain::ports::DeckQuery

mod query;
mod service;

pub use service::DeckService;

use serde_json::json;
use tracing::warn;

use crate::domain::ports::{DeckRepositoryError, ViewCache};
use crate::domain::{DeckId, Error, ViewPath};

pub(crate) const NOT_FOUND_MESSAGE: &str = "deck not found or unauthorized";
pub(crate) const CARD_NOT_FOUND_MESSAGE: &str = "card not found or unauthorized";

pub(crate) fn deck_not_found(deck_id: DeckId) -> Error {
    Error::not_found(NOT_FOUND_MESSAGE).with_details(json!({ "deckId": deck_id }))
}

pub(crate) fn map_repository_error(error: DeckRepositoryError) -> Error {
    match error {
        DeckRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("deck repository unavailable: {message}"))
        }
        DeckRepositoryError::Query { message } => {
            Error::internal(format!("deck repository error: {message}"))
        }
        DeckRepositoryError::DeckNotFound { deck_id } => deck_not_found(DeckId::new(deck_id)),
    }
}

/// Invalidate `paths` after a committed write.
///
/// Failures surface to the caller; the write itself stays committed.
pub(crate) async fn invalidate_views(
    cache: &dyn ViewCache,
    paths: &[ViewPath],
) -> Result<(), Error> {
    cache.invalidate(paths).await.map_err(|error| {
        let views: Vec<String> = paths.iter().map(ToString::to_string).collect();
        warn!(%error, ?views, "view invalidation failed after commit");
        Error::service_unavailable("changes were saved but views could not be refreshed")
            .with_details(json!({ "committed": true, "views": views }))
    })
}
