//! Card HTTP handlers.
//!
//! ```text
//! POST /api/v1/decks/{deck_id}/cards
//! PUT /api/v1/decks/{deck_id}/cards/{card_id}
//! DELETE /api/v1/decks/{deck_id}/cards/{card_id}
//! ```

use actix_web::{HttpResponse, delete, post, put, web};
use serde::Deserialize;

use crate::domain::{CardContent, CardId, DeckId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CardRequest, CardResponse, DeletedCardResponse, MutationResponse};
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{BACK, CARD_ID, DECK_ID, FRONT, Violations};

#[derive(Debug, Deserialize)]
struct DeckCardsPath {
    deck_id: String,
}

#[derive(Debug, Deserialize)]
struct CardPath {
    deck_id: String,
    card_id: String,
}

fn card_path_fields(violations: &mut Violations, path: &CardPath) -> Option<(DeckId, CardId)> {
    let deck_id = violations.deck_id(DECK_ID, &path.deck_id);
    let card_id = violations.card_id(CARD_ID, &path.card_id);
    deck_id.zip(card_id)
}

fn parse_card_path(path: &CardPath) -> Result<(DeckId, CardId), Error> {
    let mut violations = Violations::new();
    let ids = card_path_fields(&mut violations, path);
    violations.finish(ids)
}

fn content_fields(violations: &mut Violations, payload: &CardRequest) -> Option<CardContent> {
    let front = violations.required_text(FRONT, payload.front.as_deref());
    let back = violations.required_text(BACK, payload.back.as_deref());
    front
        .zip(back)
        .map(|(front, back)| CardContent::new(front, back))
}

/// Add a card to an owned deck.
#[utoipa::path(
    post,
    path = "/api/v1/decks/{deck_id}/cards",
    params(("deck_id" = i64, Path, description = "Deck identifier")),
    request_body = CardRequest,
    responses(
        (status = 201, description = "Card created", body = MutationResponse<CardResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Deck not found or not owned", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "createCard"
)]
#[post("/decks/{deck_id}/cards")]
pub async fn create_card(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<DeckCardsPath>,
    payload: web::Json<CardRequest>,
) -> ApiResult<HttpResponse> {
    let mut violations = Violations::new();
    let deck_id = violations.deck_id(DECK_ID, &path.deck_id);
    let content = content_fields(&mut violations, &payload);
    let (deck_id, content) = violations.finish(deck_id.zip(content))?;
    let outcome = state.decks.create_card(&caller.0, deck_id, content).await?;
    Ok(HttpResponse::Created().json(MutationResponse::from_outcome(outcome, CardResponse::from)))
}

/// Replace both faces of an owned card.
#[utoipa::path(
    put,
    path = "/api/v1/decks/{deck_id}/cards/{card_id}",
    params(
        ("deck_id" = i64, Path, description = "Deck identifier"),
        ("card_id" = i64, Path, description = "Card identifier")
    ),
    request_body = CardRequest,
    responses(
        (status = 200, description = "Card updated", body = MutationResponse<CardResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "updateCard"
)]
#[put("/decks/{deck_id}/cards/{card_id}")]
pub async fn update_card(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<CardPath>,
    payload: web::Json<CardRequest>,
) -> ApiResult<web::Json<MutationResponse<CardResponse>>> {
    let mut violations = Violations::new();
    let ids = card_path_fields(&mut violations, &path);
    let content = content_fields(&mut violations, &payload);
    let ((deck_id, card_id), content) = violations.finish(ids.zip(content))?;
    let outcome = state
        .decks
        .update_card(&caller.0, deck_id, card_id, content)
        .await?;
    Ok(web::Json(MutationResponse::from_outcome(
        outcome,
        CardResponse::from,
    )))
}

/// Delete an owned card.
#[utoipa::path(
    delete,
    path = "/api/v1/decks/{deck_id}/cards/{card_id}",
    params(
        ("deck_id" = i64, Path, description = "Deck identifier"),
        ("card_id" = i64, Path, description = "Card identifier")
    ),
    responses(
        (status = 200, description = "Card deleted", body = MutationResponse<DeletedCardResponse>),
        (status = 400, description = "Invalid identifiers", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "deleteCard"
)]
#[delete("/decks/{deck_id}/cards/{card_id}")]
pub async fn delete_card(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<CardPath>,
) -> ApiResult<web::Json<MutationResponse<DeletedCardResponse>>> {
    let (deck_id, card_id) = parse_card_path(&path)?;
    let outcome = state.decks.delete_card(&caller.0, deck_id, card_id).await?;
    Ok(web::Json(MutationResponse::from_outcome(outcome, |card_id| {
        DeletedCardResponse::new(deck_id, card_id)
    })))
}

#[cfg(test)]
#[path = "cards_tests.rs"]
mod tests;
