//! Driving port for owner-scoped reads.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{CallerContext, Deck, DeckDetail, DeckId, Error};

/// What the caller may do right now, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementSummary {
    /// Deck creation is uncapped.
    pub unlimited_decks: bool,
    /// AI generation is available.
    pub ai_generation: bool,
    /// Decks currently owned.
    pub deck_count: u64,
    /// Free-tier cap; absent when uncapped.
    pub deck_limit: Option<u32>,
    /// A create-deck call would pass the quota check at this moment.
    pub can_create_deck: bool,
}

/// Driving port for deck reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeckQuery: Send + Sync {
    /// Decks owned by the caller, most recently updated first.
    async fn list_decks(&self, caller: &CallerContext) -> Result<Vec<Deck>, Error>;

    /// One owned deck with its cards, newest card first.
    async fn deck_detail(&self, caller: &CallerContext, deck_id: DeckId)
    -> Result<DeckDetail, Error>;

    /// Entitlements and quota headroom for the caller.
    async fn entitlement_summary(&self, caller: &CallerContext)
    -> Result<EntitlementSummary, Error>;
}
