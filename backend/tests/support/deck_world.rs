//! Shared world for deck behaviour suites.
//!
//! Steps are synchronous, so the world owns a Tokio runtime and blocks on
//! each service call. Services are rebuilt per call over the same in-memory
//! adapters, which keeps persistence-mode changes visible to later steps.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use flashdeck::domain::ports::{DeckCommand, GeneratedCards, GenerationCommand};
use flashdeck::domain::{
    CallerContext, Capability, CardContent, DeckDetail, DeckDraft, DeckId, DeckService, Error,
    ErrorCode, FreeTierQuota, GenerationPersistence, GenerationService, IdentityResolver, OwnerId,
    Principal, RequiredText,
};
use flashdeck::test_support::{
    InMemoryDeckRepository, RecordingViewCache, ScriptedCardGenerator, StaticEntitlementOracle,
};
use mockable::DefaultClock;
use tokio::runtime::Runtime;

pub(crate) struct DeckWorld {
    runtime: Runtime,
    pub(crate) repo: Arc<InMemoryDeckRepository>,
    pub(crate) generator: Arc<ScriptedCardGenerator>,
    pub(crate) views: Arc<RecordingViewCache>,
    persistence: Cell<GenerationPersistence>,
    callers: RefCell<HashMap<String, CallerContext>>,
    decks: RefCell<HashMap<String, DeckId>>,
    pub(crate) last_error: RefCell<Option<Error>>,
    pub(crate) last_detail: RefCell<Option<DeckDetail>>,
    pub(crate) last_generated: RefCell<Option<GeneratedCards>>,
}

impl DeckWorld {
    pub(crate) fn new() -> Self {
        Self {
            runtime: Runtime::new().expect("create runtime"),
            repo: Arc::new(InMemoryDeckRepository::new()),
            generator: Arc::new(ScriptedCardGenerator::new()),
            views: Arc::new(RecordingViewCache::new()),
            persistence: Cell::new(GenerationPersistence::Sequential),
            callers: RefCell::new(HashMap::new()),
            decks: RefCell::new(HashMap::new()),
            last_error: RefCell::new(None),
            last_detail: RefCell::new(None),
            last_generated: RefCell::new(None),
        }
    }

    pub(crate) fn add_caller(&self, name: &str, oracle: StaticEntitlementOracle) {
        let principal = Principal::user(OwnerId::new(name).expect("owner id"));
        let caller = IdentityResolver::new(Arc::new(oracle))
            .resolve(Some(principal))
            .expect("caller");
        self.callers.borrow_mut().insert(name.to_owned(), caller);
    }

    pub(crate) fn add_free_caller(&self, name: &str) {
        self.add_caller(name, StaticEntitlementOracle::default());
    }

    pub(crate) fn add_pro_caller(&self, name: &str) {
        self.add_caller(name, StaticEntitlementOracle::granting([Capability::Plan("pro")]));
    }

    pub(crate) fn caller(&self, name: &str) -> CallerContext {
        self.callers
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("unknown caller {name}"))
    }

    pub(crate) fn set_persistence(&self, persistence: GenerationPersistence) {
        self.persistence.set(persistence);
    }

    pub(crate) fn deck_service(&self) -> DeckService<InMemoryDeckRepository> {
        DeckService::new(
            self.repo.clone(),
            Arc::new(FreeTierQuota::new(self.repo.clone())),
            self.views.clone(),
            Arc::new(DefaultClock),
        )
    }

    pub(crate) fn generation_service(&self) -> GenerationService<InMemoryDeckRepository> {
        GenerationService::new(
            self.repo.clone(),
            self.generator.clone(),
            Arc::new(FreeTierQuota::new(self.repo.clone())),
            self.views.clone(),
            Arc::new(DefaultClock),
        )
        .with_persistence(self.persistence.get())
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Keep the error of a failed call; clear it on success.
    pub(crate) fn record<T>(&self, result: Result<T, Error>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error.replace(None);
                Some(value)
            }
            Err(error) => {
                self.last_error.replace(Some(error));
                None
            }
        }
    }

    pub(crate) fn name_deck(&self, name: &str, deck_id: DeckId) {
        self.decks.borrow_mut().insert(name.to_owned(), deck_id);
    }

    pub(crate) fn deck_id(&self, name: &str) -> DeckId {
        self.decks
            .borrow()
            .get(name)
            .copied()
            .unwrap_or_else(|| panic!("unknown deck {name}"))
    }

    pub(crate) fn create_deck(&self, owner: &str, title: &str) -> Option<DeckId> {
        let caller = self.caller(owner);
        let draft = DeckDraft::new(RequiredText::new(title).expect("title"), None);
        let service = self.deck_service();
        let outcome = self.block_on(service.create_deck(&caller, draft));
        self.record(outcome).map(|outcome| outcome.value.id)
    }

    pub(crate) fn seed_deck(&self, owner: &str, name: &str, cards: usize) {
        let deck_id = self.create_deck(owner, name).expect("seed deck");
        self.name_deck(name, deck_id);
        let caller = self.caller(owner);
        let service = self.deck_service();
        for n in 1..=cards {
            let content = CardContent::new(
                RequiredText::new(format!("{name} question {n}")).expect("front"),
                RequiredText::new(format!("{name} answer {n}")).expect("back"),
            );
            self.block_on(service.create_card(&caller, deck_id, content))
                .expect("seed card");
        }
    }

    pub(crate) fn generate_deck(&self, owner: &str, prompt: &str) {
        let caller = self.caller(owner);
        let service = self.generation_service();
        let prompt = RequiredText::new(prompt).expect("prompt");
        let outcome = self.block_on(service.generate_deck(&caller, prompt));
        let detail = self.record(outcome).map(|outcome| outcome.value);
        self.last_detail.replace(detail);
    }

    pub(crate) fn generate_cards(&self, owner: &str, deck: &str) {
        let caller = self.caller(owner);
        let deck_id = self.deck_id(deck);
        let service = self.generation_service();
        let outcome = self.block_on(service.generate_cards(&caller, deck_id, None));
        let generated = self.record(outcome).map(|outcome| outcome.value);
        self.last_generated.replace(generated);
    }

    pub(crate) fn owned_deck_count(&self, owner: &str) -> usize {
        let owner_id = OwnerId::new(owner).expect("owner id");
        self.repo
            .all_decks()
            .iter()
            .filter(|deck| deck.owner_id == owner_id)
            .count()
    }

    pub(crate) fn assert_failed_with(&self, code: &str) {
        let expected: ErrorCode =
            serde_json::from_value(serde_json::Value::String(code.to_owned()))
                .expect("known error code");
        let error = self.last_error.borrow().clone().expect("last request failed");
        assert_eq!(error.code(), expected, "unexpected error: {error:?}");
    }
}
