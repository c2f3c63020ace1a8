//! Deck HTTP handlers.
//!
//! ```text
//! GET /api/v1/decks
//! POST /api/v1/decks
//! GET /api/v1/decks/{deck_id}
//! PUT /api/v1/decks/{deck_id}
//! DELETE /api/v1/decks/{deck_id}
//! ```

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;

use crate::domain::{DeckChanges, DeckDraft, DeckId, DescriptionUpdate, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    DeckDetailResponse, DeckRequest, DeckResponse, DeletedDeckResponse, MutationResponse,
};
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{DECK_ID, TITLE, Violations, parse_deck_id};

#[derive(Debug, Deserialize)]
pub(crate) struct DeckPath {
    deck_id: String,
}

impl DeckPath {
    pub(crate) fn parse(&self) -> Result<DeckId, Error> {
        parse_deck_id(&self.deck_id)
    }
}

pub(crate) fn deck_location(deck_id: DeckId) -> String {
    format!("/api/v1/decks/{deck_id}")
}

pub(crate) fn parse_draft(payload: &DeckRequest) -> Result<DeckDraft, Error> {
    let mut violations = Violations::new();
    let title = violations.required_text(TITLE, payload.title.as_deref());
    let title = violations.finish(title)?;
    Ok(DeckDraft::new(title, payload.description.as_deref()))
}

fn change_fields(violations: &mut Violations, payload: &DeckRequest) -> Option<DeckChanges> {
    let title = violations.required_text(TITLE, payload.title.as_deref())?;
    Some(DeckChanges {
        title,
        description: DescriptionUpdate::from_field(payload.description.as_deref()),
    })
}

/// List the caller's decks, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/v1/decks",
    responses(
        (status = 200, description = "Owned decks", body = [DeckResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "listDecks"
)]
#[get("/decks")]
pub async fn list_decks(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<DeckResponse>>> {
    let decks = state.deck_queries.list_decks(&caller.0).await?;
    Ok(web::Json(decks.into_iter().map(DeckResponse::from).collect()))
}

/// Fetch one owned deck with its cards.
#[utoipa::path(
    get,
    path = "/api/v1/decks/{deck_id}",
    params(("deck_id" = i64, Path, description = "Deck identifier")),
    responses(
        (status = 200, description = "Deck detail", body = DeckDetailResponse),
        (status = 400, description = "Invalid deck id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "getDeck"
)]
#[get("/decks/{deck_id}")]
pub async fn get_deck(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<DeckPath>,
) -> ApiResult<web::Json<DeckDetailResponse>> {
    let deck_id = path.parse()?;
    let detail = state.deck_queries.deck_detail(&caller.0, deck_id).await?;
    Ok(web::Json(detail.into()))
}

/// Create a deck, subject to the free-tier cap.
#[utoipa::path(
    post,
    path = "/api/v1/decks",
    request_body = DeckRequest,
    responses(
        (status = 201, description = "Deck created", body = MutationResponse<DeckResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 402, description = "Deck quota reached", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "createDeck"
)]
#[post("/decks")]
pub async fn create_deck(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<DeckRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_draft(&payload)?;
    let outcome = state.decks.create_deck(&caller.0, draft).await?;
    let location = deck_location(outcome.value.id);
    Ok(HttpResponse::Created()
        .insert_header((LOCATION, location))
        .json(MutationResponse::from_outcome(outcome, DeckResponse::from)))
}

/// Replace an owned deck's title and description.
#[utoipa::path(
    put,
    path = "/api/v1/decks/{deck_id}",
    params(("deck_id" = i64, Path, description = "Deck identifier")),
    request_body = DeckRequest,
    responses(
        (status = 200, description = "Deck updated", body = MutationResponse<DeckResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "updateDeck"
)]
#[put("/decks/{deck_id}")]
pub async fn update_deck(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<DeckPath>,
    payload: web::Json<DeckRequest>,
) -> ApiResult<web::Json<MutationResponse<DeckResponse>>> {
    let mut violations = Violations::new();
    let deck_id = violations.deck_id(DECK_ID, &path.deck_id);
    let changes = change_fields(&mut violations, &payload);
    let (deck_id, changes) = violations.finish(deck_id.zip(changes))?;
    let outcome = state.decks.update_deck(&caller.0, deck_id, changes).await?;
    Ok(web::Json(MutationResponse::from_outcome(
        outcome,
        DeckResponse::from,
    )))
}

/// Delete an owned deck and all of its cards.
#[utoipa::path(
    delete,
    path = "/api/v1/decks/{deck_id}",
    params(("deck_id" = i64, Path, description = "Deck identifier")),
    responses(
        (status = 200, description = "Deck deleted", body = MutationResponse<DeletedDeckResponse>),
        (status = 400, description = "Invalid deck id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "deleteDeck"
)]
#[delete("/decks/{deck_id}")]
pub async fn delete_deck(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<DeckPath>,
) -> ApiResult<web::Json<MutationResponse<DeletedDeckResponse>>> {
    let deck_id = path.parse()?;
    let outcome = state.decks.delete_deck(&caller.0, deck_id).await?;
    Ok(web::Json(MutationResponse::from_outcome(
        outcome,
        DeletedDeckResponse::from,
    )))
}

#[cfg(test)]
#[path = "decks_tests.rs"]
mod tests;
