//! Query implementation for the deck service.

use async_trait::async_trait;

use crate::domain::ports::{DeckQuery, DeckRepository, EntitlementSummary};
use crate::domain::{
    CallerContext, Deck, DeckDetail, DeckId, Entitlement, Error, ResourceClass,
};

use super::service::DeckService;
use super::{deck_not_found, map_repository_error};

#[async_trait]
impl<R> DeckQuery for DeckService<R>
where
    R: DeckRepository,
{
    async fn list_decks(&self, caller: &CallerContext) -> Result<Vec<Deck>, Error> {
        self.repo
            .list_decks(caller.owner_id())
            .await
            .map_err(map_repository_error)
    }

    async fn deck_detail(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
    ) -> Result<DeckDetail, Error> {
        let deck = self
            .repo
            .find_deck(caller.owner_id(), deck_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| deck_not_found(deck_id))?;
        let cards = self
            .repo
            .list_cards(caller.owner_id(), deck_id)
            .await
            .map_err(map_repository_error)?;
        Ok(DeckDetail { deck, cards })
    }

    async fn entitlement_summary(
        &self,
        caller: &CallerContext,
    ) -> Result<EntitlementSummary, Error> {
        let unlimited_decks = caller.holds(Entitlement::UnlimitedDecks).await?;
        let ai_generation = caller.holds(Entitlement::AiGeneration).await?;
        let deck_count = self
            .repo
            .count_decks(caller.owner_id())
            .await
            .map_err(map_repository_error)?;

        let (deck_limit, can_create_deck) = if unlimited_decks {
            (None, true)
        } else {
            let limit = self.quota.limit(ResourceClass::Decks);
            (Some(limit), deck_count < u64::from(limit))
        };

        Ok(EntitlementSummary {
            unlimited_decks,
            ai_generation,
            deck_count,
            deck_limit,
            can_create_deck,
        })
    }
}
