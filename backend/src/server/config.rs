//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use flashdeck::domain::GenerationPersistence;
use flashdeck::domain::ports::{CardGenerator, EntitlementOracle, IdentityProvider, ViewCache};
use flashdeck::outbound::persistence::DbPool;

/// Identity adapter pair; one client usually implements both ports.
#[derive(Clone)]
pub struct IdentityPorts {
    pub(crate) sessions: Arc<dyn IdentityProvider>,
    pub(crate) entitlements: Arc<dyn EntitlementOracle>,
}

impl IdentityPorts {
    /// Use `client` for both session verification and entitlement checks.
    pub fn shared<C>(client: Arc<C>) -> Self
    where
        C: IdentityProvider + EntitlementOracle + 'static,
    {
        Self {
            sessions: client.clone(),
            entitlements: client,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) view_cache: Option<Arc<dyn ViewCache>>,
    pub(crate) identity: Option<IdentityPorts>,
    pub(crate) generator: Option<Arc<dyn CardGenerator>>,
    pub(crate) free_tier_deck_limit: u32,
    pub(crate) generation_persistence: GenerationPersistence,
}

impl ServerConfig {
    /// Construct a configuration with no outbound adapters attached.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, free_tier_deck_limit: u32) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            view_cache: None,
            identity: None,
            generator: None,
            free_tier_deck_limit,
            generation_persistence: GenerationPersistence::default(),
        }
    }

    /// Attach a database connection pool for the deck repository.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach a view cache used for post-mutation invalidation.
    #[must_use]
    pub fn with_view_cache(mut self, cache: Arc<dyn ViewCache>) -> Self {
        self.view_cache = Some(cache);
        self
    }

    /// Attach the identity provider adapters.
    #[must_use]
    pub fn with_identity(mut self, identity: IdentityPorts) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Attach a card generator.
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn CardGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Select how generated decks are persisted.
    #[must_use]
    pub fn with_generation_persistence(mut self, persistence: GenerationPersistence) -> Self {
        self.generation_persistence = persistence;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
