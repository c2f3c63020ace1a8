//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI arguments, `FLASHDECK_*` environment variables, and
//! configuration files. Release builds require the database and the identity
//! provider; any other absent integration selects the matching fixture or
//! disabled adapter.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use flashdeck::domain::{
    DEFAULT_FREE_TIER_DECK_LIMIT, GenerationPersistence, ParseGenerationPersistenceError,
};

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// A setting that release builds cannot run without is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} must be configured in release builds")]
pub struct MissingSettingError(pub &'static str);

/// Settings controlling the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FLASHDECK")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub database_max_connections: Option<u32>,
    /// Apply embedded migrations at startup.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Redis connection string for view invalidation.
    pub redis_url: Option<String>,
    /// Identity provider API base URL.
    pub identity_base_url: Option<String>,
    /// Identity provider backend secret key.
    pub identity_secret_key: Option<String>,
    /// Structured-output generation endpoint.
    pub generation_endpoint: Option<String>,
    /// Model requested from the generation endpoint.
    pub generation_model: Option<String>,
    /// Bearer key for the generation endpoint.
    pub generation_api_key: Option<String>,
    /// Client timeout for generation calls, in seconds.
    pub generation_timeout_secs: Option<u64>,
    /// Deck cap for callers without unlimited decks.
    pub free_tier_deck_limit: Option<u32>,
    /// `sequential` or `transactional`.
    pub generation_persistence: Option<String>,
}

impl AppSettings {
    /// Bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Database URL. Only debug builds may run without one, on the fixture
    /// repository.
    ///
    /// # Errors
    /// Returns [`MissingSettingError`] when `release` is set and no URL is
    /// configured.
    pub fn configured_database_url(
        &self,
        release: bool,
    ) -> Result<Option<&str>, MissingSettingError> {
        match self.database_url.as_deref() {
            None if release => Err(MissingSettingError("database_url")),
            url => Ok(url),
        }
    }

    /// Pool size, defaulting to 10.
    pub fn database_max_connections(&self) -> u32 {
        self.database_max_connections
            .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS)
    }

    /// Free tier deck cap, defaulting to 3.
    pub fn free_tier_deck_limit(&self) -> u32 {
        self.free_tier_deck_limit
            .unwrap_or(DEFAULT_FREE_TIER_DECK_LIMIT)
    }

    /// Generation client timeout; `None` leaves requests unbounded.
    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_secs.map(Duration::from_secs)
    }

    /// Parsed persistence mode, defaulting to sequential.
    ///
    /// # Errors
    /// Returns [`ParseGenerationPersistenceError`] for an unknown spelling.
    pub fn generation_persistence(
        &self,
    ) -> Result<GenerationPersistence, ParseGenerationPersistenceError> {
        self.generation_persistence
            .as_deref()
            .map_or(Ok(GenerationPersistence::default()), str::parse)
    }
}
