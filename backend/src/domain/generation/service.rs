//! AI-backed deck population.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::prompt::{cards_prompt, deck_context_prompt, new_deck_prompt};
use super::schema::{GeneratedContent, GeneratedDeck, OutputSchema};
use crate::domain::decks::{deck_not_found, invalidate_views, map_repository_error};
use crate::domain::ports::{
    CardGenerator, CardGeneratorError, DeckRepository, GeneratedCards, GenerationCommand,
    GenerationRequest, NewCard, NewDeck, ViewCache,
};
use crate::domain::quota::UPGRADE_PATH;
use crate::domain::{
    CallerContext, CardContent, Deck, DeckDetail, DeckDraft, DeckId, Entitlement, Error,
    MutationOutcome, QuotaEnforcer, RequiredText, ResourceClass, ViewPath, quota_exceeded,
};

/// How a generated deck and its cards reach the repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationPersistence {
    /// Insert the deck, then the cards. A failed card insert leaves the deck
    /// committed and is reported as `partial_persistence`.
    #[default]
    Sequential,
    /// Insert deck and cards in one transaction.
    Transactional,
}

impl GenerationPersistence {
    /// Configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Transactional => "transactional",
        }
    }
}

impl fmt::Display for GenerationPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown persistence mode in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown generation persistence mode `{0}`; expected `sequential` or `transactional`")]
pub struct ParseGenerationPersistenceError(String);

impl FromStr for GenerationPersistence {
    type Err = ParseGenerationPersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "transactional" => Ok(Self::Transactional),
            _ => Err(ParseGenerationPersistenceError(s.to_owned())),
        }
    }
}

/// Generation service implementing [`GenerationCommand`].
#[derive(Clone)]
pub struct GenerationService<R> {
    repo: Arc<R>,
    generator: Arc<dyn CardGenerator>,
    quota: Arc<dyn QuotaEnforcer>,
    views: Arc<dyn ViewCache>,
    clock: Arc<dyn Clock>,
    persistence: GenerationPersistence,
}

impl<R> GenerationService<R> {
    /// Create a service using sequential persistence.
    pub fn new(
        repo: Arc<R>,
        generator: Arc<dyn CardGenerator>,
        quota: Arc<dyn QuotaEnforcer>,
        views: Arc<dyn ViewCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            generator,
            quota,
            views,
            clock,
            persistence: GenerationPersistence::default(),
        }
    }

    /// Replace the persistence mode.
    #[must_use]
    pub fn with_persistence(mut self, persistence: GenerationPersistence) -> Self {
        self.persistence = persistence;
        self
    }
}

fn map_generator_error(error: CardGeneratorError) -> Error {
    warn!(%error, "generation call failed");
    let message = match error {
        CardGeneratorError::Disabled => "AI generation is not configured",
        CardGeneratorError::Timeout { .. } => "AI generation timed out",
        _ => "AI generation failed",
    };
    Error::generation_failed(message)
}

fn new_cards(cards: Vec<CardContent>, created_at: DateTime<Utc>) -> Vec<NewCard> {
    cards
        .into_iter()
        .map(|card| NewCard {
            front: card.front.into_inner(),
            back: card.back.into_inner(),
            created_at,
        })
        .collect()
}

fn new_deck(
    caller: &CallerContext,
    title: RequiredText,
    description: Option<RequiredText>,
    created_at: DateTime<Utc>,
) -> NewDeck {
    NewDeck {
        owner_id: caller.owner_id().clone(),
        title: title.into_inner(),
        description: description.map(RequiredText::into_inner),
        created_at,
    }
}

impl<R> GenerationService<R>
where
    R: DeckRepository,
{
    async fn require_generation(&self, caller: &CallerContext) -> Result<(), Error> {
        if caller.holds(Entitlement::AiGeneration).await? {
            return Ok(());
        }
        info!(owner_id = %caller.owner_id(), "generation denied without entitlement");
        Err(Error::entitlement_required("AI generation requires a Pro plan")
            .with_details(json!({
                "entitlement": Entitlement::AiGeneration.as_str(),
                "upgradePath": UPGRADE_PATH,
            })))
    }

    async fn require_deck_quota(&self, caller: &CallerContext) -> Result<(), Error> {
        if self.quota.can_create(caller, ResourceClass::Decks).await? {
            return Ok(());
        }
        Err(quota_exceeded(
            ResourceClass::Decks,
            self.quota.limit(ResourceClass::Decks),
        ))
    }

    async fn generate(
        &self,
        prompt: String,
        schema: OutputSchema,
    ) -> Result<GeneratedContent, Error> {
        let request = GenerationRequest { prompt, schema };
        let value = self
            .generator
            .generate(&request)
            .await
            .map_err(map_generator_error)?;
        schema.validate(&value).map_err(|violation| {
            warn!(schema = schema.name(), %violation, "generated payload rejected");
            Error::generation_failed("AI generation returned malformed content")
                .with_details(json!({
                    "schema": schema.name(),
                    "violation": violation.to_string(),
                }))
        })
    }

    async fn generate_flashcards(&self, prompt: String) -> Result<Vec<CardContent>, Error> {
        match self.generate(prompt, OutputSchema::Flashcards).await? {
            GeneratedContent::Flashcards(cards) => Ok(cards),
            GeneratedContent::Deck(_) => Err(Error::internal("flashcards schema produced a deck")),
        }
    }

    async fn generate_whole_deck(&self, prompt: String) -> Result<GeneratedDeck, Error> {
        match self.generate(prompt, OutputSchema::Deck).await? {
            GeneratedContent::Deck(deck) => Ok(deck),
            GeneratedContent::Flashcards(_) => {
                Err(Error::internal("deck schema produced bare flashcards"))
            }
        }
    }

    async fn persist_new_deck(
        &self,
        deck: NewDeck,
        cards: Vec<NewCard>,
    ) -> Result<DeckDetail, Error> {
        match self.persistence {
            GenerationPersistence::Transactional => {
                let (deck, cards) = self
                    .repo
                    .insert_deck_with_cards(&deck, &cards)
                    .await
                    .map_err(map_repository_error)?;
                Ok(DeckDetail { deck, cards })
            }
            GenerationPersistence::Sequential => {
                let deck = self
                    .repo
                    .insert_deck(&deck)
                    .await
                    .map_err(map_repository_error)?;
                if cards.is_empty() {
                    return Ok(DeckDetail {
                        deck,
                        cards: Vec::new(),
                    });
                }
                match self.repo.insert_cards(deck.id, &cards).await {
                    Ok(cards) => Ok(DeckDetail { deck, cards }),
                    Err(error) => Err(self.report_partial(&deck, &error.to_string()).await),
                }
            }
        }
    }

    async fn report_partial(&self, deck: &Deck, cause: &str) -> Error {
        warn!(
            owner_id = %deck.owner_id,
            deck_id = %deck.id,
            cause,
            "generated deck committed without its cards"
        );
        if let Err(error) = invalidate_views(self.views.as_ref(), &[ViewPath::DeckList]).await {
            debug!(%error, "list invalidation after partial persistence failed");
        }
        Error::partial_persistence("deck was created but its generated cards could not be saved")
            .with_details(json!({ "deckId": deck.id }))
    }

    fn created_deck(detail: DeckDetail) -> MutationOutcome<DeckDetail> {
        let redirect = ViewPath::DeckDetail(detail.deck.id);
        MutationOutcome::new(detail, vec![ViewPath::DeckList]).redirect_to(redirect)
    }
}

#[async_trait]
impl<R> GenerationCommand for GenerationService<R>
where
    R: DeckRepository,
{
    async fn generate_cards(
        &self,
        caller: &CallerContext,
        deck_id: DeckId,
        prompt: Option<String>,
    ) -> Result<MutationOutcome<GeneratedCards>, Error> {
        self.require_generation(caller).await?;
        let deck = self
            .repo
            .find_deck(caller.owner_id(), deck_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| deck_not_found(deck_id))?;

        let prompt = cards_prompt(
            prompt.as_deref(),
            &deck.title,
            deck.description.as_deref(),
        );
        let generated = self.generate_flashcards(prompt).await?;
        if generated.is_empty() {
            info!(%deck_id, "generation returned no cards; nothing to insert");
            let empty = GeneratedCards {
                deck_id,
                cards: Vec::new(),
            };
            return Ok(MutationOutcome::new(empty, Vec::new()));
        }

        let batch = new_cards(generated, self.clock.utc());
        let cards = self
            .repo
            .insert_cards(deck_id, &batch)
            .await
            .map_err(map_repository_error)?;
        info!(%deck_id, count = cards.len(), "generated cards inserted");

        let views = vec![ViewPath::DeckDetail(deck_id)];
        invalidate_views(self.views.as_ref(), &views).await?;
        Ok(MutationOutcome::new(GeneratedCards { deck_id, cards }, views))
    }

    async fn generate_deck(
        &self,
        caller: &CallerContext,
        prompt: RequiredText,
    ) -> Result<MutationOutcome<DeckDetail>, Error> {
        self.require_generation(caller).await?;
        self.require_deck_quota(caller).await?;

        let generated = self.generate_whole_deck(new_deck_prompt(prompt.as_str())).await?;
        let created_at = self.clock.utc();
        let deck = new_deck(caller, generated.title, generated.description, created_at);
        let detail = self
            .persist_new_deck(deck, new_cards(generated.cards, created_at))
            .await?;
        info!(
            owner_id = %caller.owner_id(),
            deck_id = %detail.deck.id,
            cards = detail.cards.len(),
            "generated deck created"
        );

        invalidate_views(self.views.as_ref(), &[ViewPath::DeckList]).await?;
        Ok(Self::created_deck(detail))
    }

    async fn create_deck_with_ai(
        &self,
        caller: &CallerContext,
        draft: DeckDraft,
    ) -> Result<MutationOutcome<DeckDetail>, Error> {
        self.require_generation(caller).await?;
        self.require_deck_quota(caller).await?;

        let prompt = deck_context_prompt(draft.title.as_str(), draft.description_str());
        let generated = self.generate_flashcards(prompt).await?;
        let created_at = self.clock.utc();
        let deck = new_deck(caller, draft.title, draft.description, created_at);
        let detail = self
            .persist_new_deck(deck, new_cards(generated, created_at))
            .await?;
        info!(
            owner_id = %caller.owner_id(),
            deck_id = %detail.deck.id,
            cards = detail.cards.len(),
            "deck created from outline"
        );

        invalidate_views(self.views.as_ref(), &[ViewPath::DeckList]).await?;
        Ok(Self::created_deck(detail))
    }
}
