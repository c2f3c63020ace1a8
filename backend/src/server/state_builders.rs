//! Builders for HTTP state ports.
//!
//! Real adapters are used when configured; otherwise each port falls back to
//! its fixture, no-op, or disabled implementation so the server still starts
//! in development.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::warn;

use flashdeck::domain::ports::{
    CardGenerator, DeckRepository, DisabledCardGenerator, FixtureDeckRepository,
    FixtureEntitlementOracle, FixtureIdentityProvider, NoOpViewCache, ViewCache,
};
use flashdeck::domain::{DeckService, FreeTierQuota, GenerationService, QuotaEnforcer};
use flashdeck::inbound::http::state::{HttpState, HttpStatePorts};
use flashdeck::outbound::persistence::DieselDeckRepository;

use super::ServerConfig;
use super::config::IdentityPorts;

fn fixture_identity() -> IdentityPorts {
    warn!("identity provider not configured; treating bearer tokens as user ids (dev only)");
    IdentityPorts {
        sessions: Arc::new(FixtureIdentityProvider),
        entitlements: Arc::new(FixtureEntitlementOracle),
    }
}

/// Wire services over `repo` using the adapters attached to `config`.
fn build_ports<R>(repo: Arc<R>, config: &ServerConfig) -> HttpStatePorts
where
    R: DeckRepository + 'static,
{
    let quota: Arc<dyn QuotaEnforcer> = Arc::new(FreeTierQuota::with_limit(
        repo.clone(),
        config.free_tier_deck_limit,
    ));
    let views: Arc<dyn ViewCache> = config
        .view_cache
        .clone()
        .unwrap_or_else(|| Arc::new(NoOpViewCache));
    let generator: Arc<dyn CardGenerator> = config.generator.clone().unwrap_or_else(|| {
        warn!("generation endpoint not configured; generation requests will fail");
        Arc::new(DisabledCardGenerator)
    });
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let identity = config.identity.clone().unwrap_or_else(fixture_identity);

    let decks = Arc::new(DeckService::new(
        repo.clone(),
        quota.clone(),
        views.clone(),
        clock.clone(),
    ));
    let generation = Arc::new(
        GenerationService::new(repo, generator, quota, views, clock)
            .with_persistence(config.generation_persistence),
    );

    HttpStatePorts {
        decks: decks.clone(),
        deck_queries: decks,
        generation,
        identity: identity.sessions,
        entitlements: identity.entitlements,
    }
}

/// Build shared HTTP state, selecting the Diesel repository when a pool is
/// configured.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => build_ports(Arc::new(DieselDeckRepository::new(pool.clone())), config),
        None => {
            warn!("database not configured; using fixture deck repository");
            build_ports(Arc::new(FixtureDeckRepository), config)
        }
    };
    web::Data::new(HttpState::new(ports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flashdeck::domain::ports::{
        EntitlementOracle, EntitlementOracleError, IdentityProvider, MetadataSubject,
        SessionToken,
    };
    use flashdeck::domain::{Capability, ErrorCode, OwnerId, Principal, RequiredText};
    use rstest::rstest;

    /// Oracle granting every capability.
    struct GrantAll;

    #[async_trait]
    impl EntitlementOracle for GrantAll {
        async fn has_capability(
            &self,
            _principal: &Principal,
            _capability: &Capability,
        ) -> Result<bool, EntitlementOracleError> {
            Ok(true)
        }

        async fn plan_metadata(
            &self,
            _subject: &MetadataSubject,
        ) -> Result<Option<String>, EntitlementOracleError> {
            Ok(None)
        }
    }

    fn owner() -> Principal {
        Principal::user(OwnerId::new("user_owner").expect("owner"))
    }

    fn config() -> ServerConfig {
        ServerConfig::new("127.0.0.1:0".parse().expect("addr"), 3)
    }

    #[rstest]
    #[tokio::test]
    async fn unconfigured_adapters_fall_back_to_fixtures() {
        let state = build_http_state(&config());

        let token = SessionToken::new("user_owner").expect("token");
        let principal = state
            .identity
            .verify_session(&token)
            .await
            .expect("fixture identity")
            .expect("principal");
        let caller = state.resolver.resolve(Some(principal)).expect("caller");

        let decks = state
            .deck_queries
            .list_decks(&caller)
            .await
            .expect("fixture list");
        assert!(decks.is_empty());

        let summary = state
            .deck_queries
            .entitlement_summary(&caller)
            .await
            .expect("summary");
        assert!(!summary.ai_generation);
        assert_eq!(summary.deck_limit, Some(3));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_generator_fails_generation_for_entitled_callers() {
        let grant_all = Arc::new(GrantAll);
        let config = config().with_identity(IdentityPorts {
            sessions: Arc::new(FixtureIdentityProvider),
            entitlements: grant_all,
        });
        let state = build_http_state(&config);
        let caller = state.resolver.resolve(Some(owner())).expect("caller");

        let err = state
            .generation
            .generate_deck(&caller, RequiredText::new("photosynthesis").expect("prompt"))
            .await
            .expect_err("generation is disabled");
        assert_eq!(err.code(), ErrorCode::GenerationFailed);
    }
}
