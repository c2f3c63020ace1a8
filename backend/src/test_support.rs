//! In-memory adapters for integration and behaviour tests.
//!
//! Compiled for unit tests and behind the `test-support` feature so suites in
//! `tests/` can drive the real services without PostgreSQL, Redis, or a
//! generation endpoint.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::ports::{
    CardGenerator, CardGeneratorError, CardUpdate, DeckRepository, DeckRepositoryError,
    DeckUpdate, EntitlementOracle, EntitlementOracleError, GenerationRequest, MetadataSubject,
    NewCard, NewDeck, ViewCache, ViewCacheError,
};
use crate::domain::{Capability, Card, CardId, Deck, DeckId, OwnerId, Principal, ViewPath};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct Store {
    decks: Vec<Deck>,
    cards: Vec<Card>,
    next_deck_id: i64,
    next_card_id: i64,
}

impl Store {
    fn owned(&self, owner: &OwnerId, deck_id: DeckId) -> bool {
        self.decks
            .iter()
            .any(|deck| deck.id == deck_id && &deck.owner_id == owner)
    }

    fn push_deck(&mut self, deck: &NewDeck) -> Deck {
        self.next_deck_id += 1;
        let stored = Deck {
            id: DeckId::new(self.next_deck_id),
            owner_id: deck.owner_id.clone(),
            title: deck.title.clone(),
            description: deck.description.clone(),
            created_at: deck.created_at,
            updated_at: deck.created_at,
        };
        self.decks.push(stored.clone());
        stored
    }

    fn push_cards(&mut self, deck_id: DeckId, cards: &[NewCard]) -> Vec<Card> {
        cards
            .iter()
            .map(|card| {
                self.next_card_id += 1;
                let stored = Card {
                    id: CardId::new(self.next_card_id),
                    deck_id,
                    front: card.front.clone(),
                    back: card.back.clone(),
                    created_at: card.created_at,
                    updated_at: card.created_at,
                };
                self.cards.push(stored.clone());
                stored
            })
            .collect()
    }
}

/// Deck repository backed by vectors, with switchable failures.
#[derive(Default)]
pub struct InMemoryDeckRepository {
    store: Mutex<Store>,
    fail_counts: AtomicBool,
    fail_card_inserts: AtomicBool,
}

impl InMemoryDeckRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `count_decks` fail with a connection error.
    pub fn fail_counts(&self, fail: bool) {
        self.fail_counts.store(fail, Ordering::SeqCst);
    }

    /// Make `insert_cards` and `insert_deck_with_cards` fail with a query error.
    pub fn fail_card_inserts(&self, fail: bool) {
        self.fail_card_inserts.store(fail, Ordering::SeqCst);
    }

    /// Every stored deck, regardless of owner.
    #[must_use]
    pub fn all_decks(&self) -> Vec<Deck> {
        lock(&self.store).decks.clone()
    }

    /// Every stored card in `deck_id`, regardless of owner.
    #[must_use]
    pub fn cards_in(&self, deck_id: DeckId) -> Vec<Card> {
        lock(&self.store)
            .cards
            .iter()
            .filter(|card| card.deck_id == deck_id)
            .cloned()
            .collect()
    }

    /// Total stored cards.
    #[must_use]
    pub fn card_total(&self) -> usize {
        lock(&self.store).cards.len()
    }

    fn card_insert_failure(&self) -> Option<DeckRepositoryError> {
        self.fail_card_inserts
            .load(Ordering::SeqCst)
            .then(|| DeckRepositoryError::query("injected card insert failure"))
    }
}

#[async_trait]
impl DeckRepository for InMemoryDeckRepository {
    async fn count_decks(&self, owner: &OwnerId) -> Result<u64, DeckRepositoryError> {
        if self.fail_counts.load(Ordering::SeqCst) {
            return Err(DeckRepositoryError::connection("injected count failure"));
        }
        let store = lock(&self.store);
        let count = store
            .decks
            .iter()
            .filter(|deck| &deck.owner_id == owner)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn list_decks(&self, owner: &OwnerId) -> Result<Vec<Deck>, DeckRepositoryError> {
        let mut decks: Vec<Deck> = lock(&self.store)
            .decks
            .iter()
            .filter(|deck| &deck.owner_id == owner)
            .cloned()
            .collect();
        decks.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
        Ok(decks)
    }

    async fn find_deck(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
    ) -> Result<Option<Deck>, DeckRepositoryError> {
        Ok(lock(&self.store)
            .decks
            .iter()
            .find(|deck| deck.id == deck_id && &deck.owner_id == owner)
            .cloned())
    }

    async fn insert_deck(&self, deck: &NewDeck) -> Result<Deck, DeckRepositoryError> {
        Ok(lock(&self.store).push_deck(deck))
    }

    async fn update_deck(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
        update: &DeckUpdate,
    ) -> Result<Option<Deck>, DeckRepositoryError> {
        let mut store = lock(&self.store);
        let Some(deck) = store
            .decks
            .iter_mut()
            .find(|deck| deck.id == deck_id && &deck.owner_id == owner)
        else {
            return Ok(None);
        };
        deck.title.clone_from(&update.title);
        if let Some(description) = &update.description {
            deck.description.clone_from(description);
        }
        deck.updated_at = update.updated_at;
        Ok(Some(deck.clone()))
    }

    async fn delete_deck(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
    ) -> Result<bool, DeckRepositoryError> {
        let mut store = lock(&self.store);
        if !store.owned(owner, deck_id) {
            return Ok(false);
        }
        store.decks.retain(|deck| deck.id != deck_id);
        store.cards.retain(|card| card.deck_id != deck_id);
        Ok(true)
    }

    async fn list_cards(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
    ) -> Result<Vec<Card>, DeckRepositoryError> {
        let store = lock(&self.store);
        if !store.owned(owner, deck_id) {
            return Ok(Vec::new());
        }
        let mut cards: Vec<Card> = store
            .cards
            .iter()
            .filter(|card| card.deck_id == deck_id)
            .cloned()
            .collect();
        cards.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(cards)
    }

    async fn insert_cards(
        &self,
        deck_id: DeckId,
        cards: &[NewCard],
    ) -> Result<Vec<Card>, DeckRepositoryError> {
        if let Some(err) = self.card_insert_failure() {
            return Err(err);
        }
        let mut store = lock(&self.store);
        if !store.decks.iter().any(|deck| deck.id == deck_id) {
            return Err(DeckRepositoryError::deck_not_found(deck_id.get()));
        }
        Ok(store.push_cards(deck_id, cards))
    }

    async fn update_card(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
        card_id: CardId,
        update: &CardUpdate,
    ) -> Result<Option<Card>, DeckRepositoryError> {
        let mut store = lock(&self.store);
        if !store.owned(owner, deck_id) {
            return Ok(None);
        }
        let Some(card) = store
            .cards
            .iter_mut()
            .find(|card| card.id == card_id && card.deck_id == deck_id)
        else {
            return Ok(None);
        };
        card.front.clone_from(&update.front);
        card.back.clone_from(&update.back);
        card.updated_at = update.updated_at;
        Ok(Some(card.clone()))
    }

    async fn delete_card(
        &self,
        owner: &OwnerId,
        deck_id: DeckId,
        card_id: CardId,
    ) -> Result<bool, DeckRepositoryError> {
        let mut store = lock(&self.store);
        if !store.owned(owner, deck_id) {
            return Ok(false);
        }
        let before = store.cards.len();
        store
            .cards
            .retain(|card| !(card.id == card_id && card.deck_id == deck_id));
        Ok(store.cards.len() < before)
    }

    async fn insert_deck_with_cards(
        &self,
        deck: &NewDeck,
        cards: &[NewCard],
    ) -> Result<(Deck, Vec<Card>), DeckRepositoryError> {
        if let Some(err) = self.card_insert_failure() {
            return Err(err);
        }
        let mut store = lock(&self.store);
        let stored = store.push_deck(deck);
        let stored_cards = store.push_cards(stored.id, cards);
        Ok((stored, stored_cards))
    }
}

/// Oracle answering from a fixed capability set and plan label.
#[derive(Debug, Default)]
pub struct StaticEntitlementOracle {
    granted: HashSet<Capability>,
    plan: Option<String>,
    unavailable: bool,
}

impl StaticEntitlementOracle {
    /// Oracle granting exactly `capabilities`.
    pub fn granting(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            granted: capabilities.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Report `plan` from metadata lookups.
    #[must_use]
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    /// Fail every capability check with a transport error.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl EntitlementOracle for StaticEntitlementOracle {
    async fn has_capability(
        &self,
        _principal: &Principal,
        capability: &Capability,
    ) -> Result<bool, EntitlementOracleError> {
        if self.unavailable {
            return Err(EntitlementOracleError::transport("injected oracle outage"));
        }
        Ok(self.granted.contains(capability))
    }

    async fn plan_metadata(
        &self,
        _subject: &MetadataSubject,
    ) -> Result<Option<String>, EntitlementOracleError> {
        if self.unavailable {
            return Err(EntitlementOracleError::transport("injected oracle outage"));
        }
        Ok(self.plan.clone())
    }
}

/// Generator replaying queued responses and recording prompts.
#[derive(Default)]
pub struct ScriptedCardGenerator {
    responses: Mutex<VecDeque<Result<Value, CardGeneratorError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedCardGenerator {
    /// Generator with nothing queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next response.
    pub fn push(&self, response: Result<Value, CardGeneratorError>) {
        lock(&self.responses).push_back(response);
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl CardGenerator for ScriptedCardGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, CardGeneratorError> {
        lock(&self.requests).push(request.clone());
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(CardGeneratorError::upstream("no scripted response")))
    }
}

/// View cache recording every invalidation batch.
#[derive(Default)]
pub struct RecordingViewCache {
    batches: Mutex<Vec<Vec<ViewPath>>>,
}

impl RecordingViewCache {
    /// Cache with no recorded batches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidation batches in call order.
    #[must_use]
    pub fn batches(&self) -> Vec<Vec<ViewPath>> {
        lock(&self.batches).clone()
    }
}

#[async_trait]
impl ViewCache for RecordingViewCache {
    async fn invalidate(&self, views: &[ViewPath]) -> Result<(), ViewCacheError> {
        lock(&self.batches).push(views.to_vec());
        Ok(())
    }
}

/// `{flashcards: [...]}` payload with `count` numbered cards.
#[must_use]
pub fn flashcards_payload(count: usize) -> Value {
    json!({ "flashcards": numbered_cards(count) })
}

/// `{title, description, cards: [...]}` payload with `count` numbered cards.
#[must_use]
pub fn deck_payload(title: &str, count: usize) -> Value {
    json!({
        "title": title,
        "description": format!("{title} essentials"),
        "cards": numbered_cards(count),
    })
}

fn numbered_cards(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|n| json!({ "front": format!("Question {n}"), "back": format!("Answer {n}") }))
        .collect()
}
