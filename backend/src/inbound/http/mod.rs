//! HTTP inbound adapter exposing REST endpoints.

pub mod cards;
pub mod decks;
pub mod dto;
pub mod entitlements;
pub mod error;
pub mod generation;
pub mod health;
pub mod identity;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

/// JSON body extractor configuration shared by every API scope.
///
/// Malformed bodies surface as `invalid_request` in the standard error
/// envelope instead of actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed JSON body: {err}")).into()
    })
}

/// Register every `/api/v1` handler on `cfg`.
///
/// Fixed paths are registered ahead of `{deck_id}` patterns.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(entitlements::get_entitlements)
        .service(decks::list_decks)
        .service(decks::create_deck)
        .service(generation::generate_deck)
        .service(generation::create_deck_with_ai)
        .service(decks::get_deck)
        .service(decks::update_deck)
        .service(decks::delete_deck)
        .service(generation::generate_cards)
        .service(cards::create_card)
        .service(cards::update_card)
        .service(cards::delete_card);
}
