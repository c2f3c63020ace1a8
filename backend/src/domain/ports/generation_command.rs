//! Driving port for AI-backed deck population.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    CallerContext, Card, DeckDetail, DeckDraft, DeckId, Error, MutationOutcome, RequiredText,
};

/// Cards generated into an existing deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCards {
    /// Target deck.
    pub deck_id: DeckId,
    /// Inserted cards; empty when the generator returned none.
    pub cards: Vec<Card>,
}

/// Driving port for generation workflows.
///
/// All operations require the AI generation entitlement. Generated output is
/// validated in full before any row is written.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationCommand: Send + Sync {
    /// Generate cards into an owned deck.
    ///
    /// A missing or blank `prompt` falls back to a template built from the
    /// deck's title and description.
    async fn generate_cards(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
        prompt: Option<String>,
    ) -> Result<MutationOutcome<GeneratedCards>, Error>;

    /// Generate a complete deck (title, description, 5 to 20 cards) from a prompt.
    async fn generate_deck(
        &self,
        caller: &CallerContext,
        prompt: RequiredText,
    ) -> Result<MutationOutcome<DeckDetail>, Error>;

    /// Create a deck from a caller-supplied outline and fill it with cards.
    async fn create_deck_with_ai(
        &self,
        caller: &CallerContext,
        draft: DeckDraft,
    ) -> Result<MutationOutcome<DeckDetail>, Error>;
}
