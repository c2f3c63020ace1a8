//! AI generation HTTP handlers.
//!
//! ```text
//! POST /api/v1/decks/{deck_id}/generate
//! POST /api/v1/decks/generate
//! POST /api/v1/decks/generate-from-outline
//! ```

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, post, web};

use crate::domain::{DeckDetail, Error, MutationOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::decks::{DeckPath, deck_location, parse_draft};
use crate::inbound::http::dto::{
    DeckDetailResponse, DeckRequest, GenerateRequest, GeneratedCardsResponse, MutationResponse,
};
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{PROMPT, Violations};

fn created_deck(outcome: MutationOutcome<DeckDetail>) -> HttpResponse {
    let location = deck_location(outcome.value.deck.id);
    HttpResponse::Created()
        .insert_header((LOCATION, location))
        .json(MutationResponse::from_outcome(
            outcome,
            DeckDetailResponse::from,
        ))
}

/// Decode the optional generate-cards body. An empty body means no prompt.
fn parse_generate_body(body: &[u8]) -> Result<GenerateRequest, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| Error::invalid_request(format!("malformed JSON body: {err}")))
}

/// Generate cards into an owned deck.
///
/// The body is optional; without a prompt the deck's title and description
/// drive generation.
#[utoipa::path(
    post,
    path = "/api/v1/decks/{deck_id}/generate",
    params(("deck_id" = i64, Path, description = "Deck identifier")),
    request_body(content = GenerateRequest, description = "Optional instructions"),
    responses(
        (status = 200, description = "Cards generated", body = MutationResponse<GeneratedCardsResponse>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 402, description = "AI generation not included in plan", body = ErrorSchema),
        (status = 404, description = "Deck not found or not owned", body = ErrorSchema),
        (status = 502, description = "Generation failed", body = ErrorSchema)
    ),
    tags = ["generation"],
    operation_id = "generateCards"
)]
#[post("/decks/{deck_id}/generate")]
pub async fn generate_cards(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<DeckPath>,
    body: web::Bytes,
) -> ApiResult<web::Json<MutationResponse<GeneratedCardsResponse>>> {
    let deck_id = path.parse()?;
    let prompt = parse_generate_body(&body)?.prompt;
    let outcome = state
        .generation
        .generate_cards(&caller.0, deck_id, prompt)
        .await?;
    Ok(web::Json(MutationResponse::from_outcome(
        outcome,
        GeneratedCardsResponse::from,
    )))
}

/// Generate a complete new deck from a topic prompt.
#[utoipa::path(
    post,
    path = "/api/v1/decks/generate",
    request_body = GenerateRequest,
    responses(
        (status = 201, description = "Deck generated", body = MutationResponse<DeckDetailResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 402, description = "Quota reached or AI generation not included", body = ErrorSchema),
        (status = 500, description = "Deck saved without its cards", body = ErrorSchema),
        (status = 502, description = "Generation failed", body = ErrorSchema)
    ),
    tags = ["generation"],
    operation_id = "generateDeck"
)]
#[post("/decks/generate")]
pub async fn generate_deck(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<GenerateRequest>,
) -> ApiResult<HttpResponse> {
    let mut violations = Violations::new();
    let prompt = violations.required_text(PROMPT, payload.prompt.as_deref());
    let prompt = violations.finish(prompt)?;
    let outcome = state.generation.generate_deck(&caller.0, prompt).await?;
    Ok(created_deck(outcome))
}

/// Create a deck from a title and description and fill it with generated cards.
#[utoipa::path(
    post,
    path = "/api/v1/decks/generate-from-outline",
    request_body = DeckRequest,
    responses(
        (status = 201, description = "Deck created", body = MutationResponse<DeckDetailResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 402, description = "Quota reached or AI generation not included", body = ErrorSchema),
        (status = 502, description = "Generation failed", body = ErrorSchema)
    ),
    tags = ["generation"],
    operation_id = "createDeckWithAi"
)]
#[post("/decks/generate-from-outline")]
pub async fn create_deck_with_ai(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<DeckRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_draft(&payload)?;
    let outcome = state
        .generation
        .create_deck_with_ai(&caller.0, draft)
        .await?;
    Ok(created_deck(outcome))
}

#[cfg(test)]
#[path = "generation_tests.rs"]
mod tests;
