//! Backend entry-point: loads configuration, prepares storage and runs the
//! HTTP server.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use scratch_backend::inbound::http::health::HealthState;
use scratch_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use scratch_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, MailerConfig, ServerConfig, create_server};

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

    let settings = AppSettings::load().map_err(|err| eyre!("load configuration: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())
        .wrap_err("invalid session configuration")?;
    info!(fingerprint = %session.fingerprint(), "session key loaded");

    let bind_addr = settings
        .bind_addr()
        .wrap_err("invalid SCRATCH_BIND_ADDR")?;
    let mut config = ServerConfig::new(session, bind_addr, MailerConfig::from_settings(&settings))
        .with_cors_origins(settings.cors_origins())
        .with_auto_provision(settings.auto_provision())
        .with_session_redis(settings.session_redis_url.clone());

    if let Some(database_url) = settings.database_url.as_deref() {
        run_pending_migrations(database_url)
            .await
            .wrap_err("apply database migrations")?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .wrap_err("create database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    server.await.wrap_err("server terminated")?;
    Ok(())
}
