//! Backend entry-point: loads settings, builds adapters, and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use ortho_config::OrthoConfig;
use zeroize::Zeroizing;

use flashdeck::inbound::http::health::HealthState;
use flashdeck::outbound::cache::RedisViewCache;
use flashdeck::outbound::generation::{HttpCardGenerator, HttpGeneratorConfig};
use flashdeck::outbound::identity::{HttpIdentityClient, IdentityClientConfig};
use flashdeck::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{AppSettings, IdentityPorts, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("load settings")?;
    let config = build_server_config(&settings).await?;
    let bind_addr = config.bind_addr();

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("start HTTP server")?;
    info!(%bind_addr, "listening");
    server.await.wrap_err("HTTP server failed")
}

async fn build_server_config(settings: &AppSettings) -> Result<ServerConfig> {
    let persistence = settings
        .generation_persistence()
        .wrap_err("invalid generation persistence mode")?;
    let mut config = ServerConfig::new(settings.bind_addr(), settings.free_tier_deck_limit())
        .with_generation_persistence(persistence);

    let configured_database = settings
        .configured_database_url(!cfg!(debug_assertions))
        .wrap_err("database settings")?;
    if let Some(database_url) = configured_database {
        if settings.run_migrations {
            run_pending_migrations(database_url.to_owned())
                .await
                .wrap_err("apply database migrations")?;
        }
        let pool = DbPool::new(
            PoolConfig::new(database_url)
                .with_max_size(settings.database_max_connections()),
        )
        .await
        .wrap_err("build database pool")?;
        config = config.with_db_pool(pool);
    }

    if let Some(redis_url) = &settings.redis_url {
        let cache = RedisViewCache::connect(redis_url)
            .await
            .wrap_err("connect view cache")?;
        config = config.with_view_cache(Arc::new(cache));
    }

    match (&settings.identity_base_url, &settings.identity_secret_key) {
        (Some(base_url), Some(secret_key)) => {
            let client = HttpIdentityClient::new(IdentityClientConfig {
                base_url: Url::parse(base_url).wrap_err("parse identity base URL")?,
                secret_key: Zeroizing::new(secret_key.clone()),
            })
            .wrap_err("build identity client")?;
            config = config.with_identity(IdentityPorts::shared(Arc::new(client)));
        }
        (None, None) if cfg!(debug_assertions) => {}
        (None, None) => return Err(eyre!("identity provider must be configured in release builds")),
        _ => {
            return Err(eyre!(
                "identity_base_url and identity_secret_key must be set together"
            ));
        }
    }

    if let (Some(endpoint), Some(model), Some(api_key)) = (
        &settings.generation_endpoint,
        &settings.generation_model,
        &settings.generation_api_key,
    ) {
        let generator = HttpCardGenerator::new(HttpGeneratorConfig {
            endpoint: Url::parse(endpoint).wrap_err("parse generation endpoint")?,
            model: model.clone(),
            api_key: Zeroizing::new(api_key.clone()),
            timeout: settings.generation_timeout(),
        })
        .wrap_err("build generation client")?;
        config = config.with_generator(Arc::new(generator));
    }

    Ok(config)
}
