//! Driving port for manual deck and card mutations.
//!
//! Inbound adapters resolve the caller and validate input shape before
//! calling in; implementations enforce quota, ownership, and invalidation.

use async_trait::async_trait;

use crate::domain::{
    CallerContext, Card, CardContent, CardId, Deck, DeckChanges, DeckDraft, DeckId, Error,
    MutationOutcome,
};

/// Driving port for deck and card mutations.
///
/// Every operation addressing an existing deck or card re-checks ownership
/// inside the same write, failing with `not_found` when the predicate matches
/// nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeckCommand: Send + Sync {
    /// Create a deck, subject to the free-tier quota.
    ///
    /// Invalidates the deck list and redirects to the new deck.
    async fn create_deck(
        &self,
        caller: &CallerContext,
        draft: DeckDraft,
    ) -> Result<MutationOutcome<Deck>, Error>;

    /// Replace an owned deck's title and optionally its description.
    async fn update_deck(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
        changes: DeckChanges,
    ) -> Result<MutationOutcome<Deck>, Error>;

    /// Delete an owned deck and all its cards, redirecting to the deck list.
    async fn delete_deck(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
    ) -> Result<MutationOutcome<DeckId>, Error>;

    /// Add a card to an owned deck.
    async fn create_card(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
        content: CardContent,
    ) -> Result<MutationOutcome<Card>, Error>;

    /// Replace both faces of a card in an owned deck.
    async fn update_card(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
        card_id: CardId,
        content: CardContent,
    ) -> Result<MutationOutcome<Card>, Error>;

    /// Remove a card from an owned deck.
    async fn delete_card(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
        card_id: CardId,
    ) -> Result<MutationOutcome<CardId>, Error>;
}
