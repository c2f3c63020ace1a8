//! Manual deck and card mutations.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use super::{
    CARD_NOT_FOUND_MESSAGE, deck_not_found, invalidate_views, map_repository_error,
};
use crate::domain::ports::{
    CardUpdate, DeckCommand, DeckRepository, DeckUpdate, NewCard, NewDeck, ViewCache,
};
use crate::domain::{
    CallerContext, Card, CardContent, CardId, Deck, DeckChanges, DeckDraft, DeckId,
    DescriptionUpdate, Error, MutationOutcome, QuotaEnforcer, ResourceClass, ViewPath,
    quota_exceeded,
};

/// Deck service implementing the mutation and read driving ports.
#[derive(Clone)]
pub struct DeckService<R> {
    pub(super) repo: Arc<R>,
    pub(super) quota: Arc<dyn QuotaEnforcer>,
    views: Arc<dyn ViewCache>,
    clock: Arc<dyn Clock>,
}

impl<R> DeckService<R> {
    /// Create a new service over the given collaborators.
    pub fn new(
        repo: Arc<R>,
        quota: Arc<dyn QuotaEnforcer>,
        views: Arc<dyn ViewCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            quota,
            views,
            clock,
        }
    }
}

fn card_not_found(deck_id: DeckId, card_id: CardId) -> Error {
    Error::not_found(CARD_NOT_FOUND_MESSAGE).with_details(json!({
        "deckId": deck_id,
        "cardId": card_id,
    }))
}

fn description_for_update(update: DescriptionUpdate) -> Option<Option<String>> {
    match update {
        DescriptionUpdate::Unchanged => None,
        DescriptionUpdate::Clear => Some(None),
        DescriptionUpdate::Set(text) => Some(Some(text.into_inner())),
    }
}

impl<R> DeckService<R>
where
    R: DeckRepository,
{
    async fn ensure_owned(&self, caller: &CallerContext, deck_id: DeckId) -> Result<Deck, Error> {
        self.repo
            .find_deck(caller.owner_id(), deck_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| deck_not_found(deck_id))
    }

    async fn invalidate(&self, paths: &[ViewPath]) -> Result<(), Error> {
        invalidate_views(self.views.as_ref(), paths).await
    }
}

#[async_trait]
impl<R> DeckCommand for DeckService<R>
where
    R: DeckRepository,
{
    async fn create_deck(
        &self,
        caller: &CallerContext,
        draft: DeckDraft,
    ) -> Result<MutationOutcome<Deck>, Error> {
        if !self.quota.can_create(caller, ResourceClass::Decks).await? {
            info!(owner_id = %caller.owner_id(), "deck creation denied by quota");
            return Err(quota_exceeded(
                ResourceClass::Decks,
                self.quota.limit(ResourceClass::Decks),
            ));
        }

        let new_deck = NewDeck {
            owner_id: caller.owner_id().clone(),
            description: draft.description_str().map(str::to_owned),
            title: draft.title.into_inner(),
            created_at: self.clock.utc(),
        };
        let deck = self
            .repo
            .insert_deck(&new_deck)
            .await
            .map_err(map_repository_error)?;
        debug!(owner_id = %deck.owner_id, deck_id = %deck.id, "deck created");

        self.invalidate(&[ViewPath::DeckList]).await?;
        let detail = ViewPath::DeckDetail(deck.id);
        Ok(MutationOutcome::new(deck, vec![ViewPath::DeckList]).redirect_to(detail))
    }

    async fn update_deck(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
        changes: DeckChanges,
    ) -> Result<MutationOutcome<Deck>, Error> {
        let update = DeckUpdate {
            title: changes.title.into_inner(),
            description: description_for_update(changes.description),
            updated_at: self.clock.utc(),
        };
        let deck = self
            .repo
            .update_deck(caller.owner_id(), deck_id, &update)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| deck_not_found(deck_id))?;

        let views = vec![ViewPath::DeckList, ViewPath::DeckDetail(deck_id)];
        self.invalidate(&views).await?;
        Ok(MutationOutcome::new(deck, views))
    }

    async fn delete_deck(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
    ) -> Result<MutationOutcome<DeckId>, Error> {
        let deleted = self
            .repo
            .delete_deck(caller.owner_id(), deck_id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(deck_not_found(deck_id));
        }
        info!(owner_id = %caller.owner_id(), %deck_id, "deck deleted with its cards");

        let views = vec![ViewPath::DeckList, ViewPath::DeckDetail(deck_id)];
        self.invalidate(&views).await?;
        Ok(MutationOutcome::new(deck_id, views).redirect_to(ViewPath::DeckList))
    }

    async fn create_card(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
        content: CardContent,
    ) -> Result<MutationOutcome<Card>, Error> {
        self.ensure_owned(caller, deck_id).await?;

        let new_card = NewCard {
            front: content.front.into_inner(),
            back: content.back.into_inner(),
            created_at: self.clock.utc(),
        };
        let card = self
            .repo
            .insert_cards(deck_id, std::slice::from_ref(&new_card))
            .await
            .map_err(map_repository_error)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::internal("card insert returned no row"))?;

        let views = vec![ViewPath::DeckDetail(deck_id)];
        self.invalidate(&views).await?;
        Ok(MutationOutcome::new(card, views))
    }

    async fn update_card(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
        card_id: CardId,
        content: CardContent,
    ) -> Result<MutationOutcome<Card>, Error> {
        let update = CardUpdate {
            front: content.front.into_inner(),
            back: content.back.into_inner(),
            updated_at: self.clock.utc(),
        };
        let card = self
            .repo
            .update_card(caller.owner_id(), deck_id, card_id, &update)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| card_not_found(deck_id, card_id))?;

        let views = vec![ViewPath::DeckDetail(deck_id)];
        self.invalidate(&views).await?;
        Ok(MutationOutcome::new(card, views))
    }

    async fn delete_card(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
        card_id: CardId,
    ) -> Result<MutationOutcome<CardId>, Error> {
        let deleted = self
            .repo
            .delete_card(caller.owner_id(), deck_id, card_id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(card_not_found(deck_id, card_id));
        }

        let views = vec![ViewPath::DeckDetail(deck_id)];
        self.invalidate(&views).await?;
        Ok(MutationOutcome::new(card_id, views))
    }
}
