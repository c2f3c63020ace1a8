//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::IdentityResolver;
use crate::domain::ports::{
    DeckCommand, DeckQuery, EntitlementOracle, GenerationCommand, IdentityProvider,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Manual deck and card mutations.
    pub decks: Arc<dyn DeckCommand>,
    /// Owner-scoped reads.
    pub deck_queries: Arc<dyn DeckQuery>,
    /// AI generation workflows.
    pub generation: Arc<dyn GenerationCommand>,
    /// Session verification.
    pub identity: Arc<dyn IdentityProvider>,
    /// Capability checks for resolved callers.
    pub entitlements: Arc<dyn EntitlementOracle>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub decks: Arc<dyn DeckCommand>,
    pub deck_queries: Arc<dyn DeckQuery>,
    pub generation: Arc<dyn GenerationCommand>,
    pub identity: Arc<dyn IdentityProvider>,
    pub resolver: IdentityResolver,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use flashdeck::domain::ports::{
    ///     FixtureDeckRepository, FixtureEntitlementOracle, FixtureIdentityProvider,
    ///     FixtureCardGenerator, NoOpViewCache,
    /// };
    /// use flashdeck::domain::{DeckService, FreeTierQuota, GenerationService};
    /// use flashdeck::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let repo = Arc::new(FixtureDeckRepository);
    /// let quota = Arc::new(FreeTierQuota::new(repo.clone()));
    /// let clock = Arc::new(mockable::DefaultClock);
    /// let decks = Arc::new(DeckService::new(
    ///     repo.clone(),
    ///     quota.clone(),
    ///     Arc::new(NoOpViewCache),
    ///     clock.clone(),
    /// ));
    /// let generation = Arc::new(GenerationService::new(
    ///     repo,
    ///     Arc::new(FixtureCardGenerator),
    ///     quota,
    ///     Arc::new(NoOpViewCache),
    ///     clock,
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     decks: decks.clone(),
    ///     deck_queries: decks,
    ///     generation,
    ///     identity: Arc::new(FixtureIdentityProvider),
    ///     entitlements: Arc::new(FixtureEntitlementOracle),
    /// });
    /// let _queries = state.deck_queries.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            decks,
            deck_queries,
            generation,
            identity,
            entitlements,
        } = ports;
        Self {
            decks,
            deck_queries,
            generation,
            identity,
            resolver: IdentityResolver::new(entitlements),
        }
    }
}
