//! Request and response payloads for the deck endpoints.
//!
//! Request fields are all optional at the serde layer so that missing and
//! blank values reach the validation collector instead of failing JSON
//! extraction with a single opaque error.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{EntitlementSummary, GeneratedCards};
use crate::domain::{Card, CardId, Deck, DeckDetail, DeckId, MutationOutcome};

/// Request payload for creating or updating a deck.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeckRequest {
    /// Required, non-blank.
    #[schema(example = "Cell biology")]
    pub title: Option<String>,
    /// Optional; blank clears it on update.
    pub description: Option<String>,
}

/// Request payload for creating or updating a card.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    /// Question side.
    pub front: Option<String>,
    /// Answer side.
    pub back: Option<String>,
}

/// Request payload for generation endpoints.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Free-text instructions. Optional when generating into an existing deck.
    #[schema(example = "The Krebs cycle")]
    pub prompt: Option<String>,
}

/// Deck as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeckResponse {
    pub id: i64,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Deck> for DeckResponse {
    fn from(deck: Deck) -> Self {
        Self {
            id: deck.id.get(),
            owner_id: deck.owner_id.to_string(),
            title: deck.title,
            description: deck.description,
            created_at: deck.created_at.to_rfc3339(),
            updated_at: deck.updated_at.to_rfc3339(),
        }
    }
}

/// Card as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: i64,
    pub deck_id: i64,
    pub front: String,
    pub back: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id.get(),
            deck_id: card.deck_id.get(),
            front: card.front,
            back: card.back,
            created_at: card.created_at.to_rfc3339(),
            updated_at: card.updated_at.to_rfc3339(),
        }
    }
}

fn card_responses(cards: Vec<Card>) -> Vec<CardResponse> {
    cards.into_iter().map(CardResponse::from).collect()
}

/// Deck with its cards, newest card first.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeckDetailResponse {
    pub deck: DeckResponse,
    pub cards: Vec<CardResponse>,
}

impl From<DeckDetail> for DeckDetailResponse {
    fn from(detail: DeckDetail) -> Self {
        Self {
            deck: detail.deck.into(),
            cards: card_responses(detail.cards),
        }
    }
}

/// Cards generated into an existing deck.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCardsResponse {
    pub deck_id: i64,
    pub cards: Vec<CardResponse>,
}

impl From<GeneratedCards> for GeneratedCardsResponse {
    fn from(generated: GeneratedCards) -> Self {
        Self {
            deck_id: generated.deck_id.get(),
            cards: card_responses(generated.cards),
        }
    }
}

/// Identifier of a deleted deck.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedDeckResponse {
    pub deck_id: i64,
}

impl From<DeckId> for DeletedDeckResponse {
    fn from(deck_id: DeckId) -> Self {
        Self {
            deck_id: deck_id.get(),
        }
    }
}

/// Identifiers of a deleted card.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCardResponse {
    pub deck_id: i64,
    pub card_id: i64,
}

/// Caller entitlements and quota headroom.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementSummaryResponse {
    pub unlimited_decks: bool,
    pub ai_generation: bool,
    pub deck_count: u64,
    pub deck_limit: Option<u32>,
    pub can_create_deck: bool,
}

impl From<EntitlementSummary> for EntitlementSummaryResponse {
    fn from(summary: EntitlementSummary) -> Self {
        Self {
            unlimited_decks: summary.unlimited_decks,
            ai_generation: summary.ai_generation,
            deck_count: summary.deck_count,
            deck_limit: summary.deck_limit,
            can_create_deck: summary.can_create_deck,
        }
    }
}

/// Mutation result plus the views it invalidated and where to go next.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse<T> {
    #[serde(flatten)]
    pub body: T,
    /// View paths to refresh, e.g. `/dashboard`.
    pub invalidate: Vec<String>,
    /// View path to navigate to, if any.
    pub redirect: Option<String>,
}

impl<T> MutationResponse<T> {
    /// Convert a domain outcome, mapping its value with `into_body`.
    pub fn from_outcome<V>(outcome: MutationOutcome<V>, into_body: impl FnOnce(V) -> T) -> Self {
        Self {
            body: into_body(outcome.value),
            invalidate: outcome
                .invalidated
                .iter()
                .map(ToString::to_string)
                .collect(),
            redirect: outcome.redirect.map(|view| view.to_string()),
        }
    }
}

impl DeletedCardResponse {
    pub(crate) fn new(deck_id: DeckId, card_id: CardId) -> Self {
        Self {
            deck_id: deck_id.get(),
            card_id: card_id.get(),
        }
    }
}
