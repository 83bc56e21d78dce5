mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;

use crate::app::App;
use crate::cli::{Cli, StoreBackendArg};
use crate::state::AppState;
use anyhow::Context;
use clap::Parser;
use portal_core::{Namespace, Retention};
use portal_generator::UuidGenerator;
use portal_quota::QuotaPolicy;
use portal_shortener::ShortenerSettings;
use portal_storage::{InMemoryStore, RedisSettings, RedisStore};
use portal_telemetry::TelemetryConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = Cli::parse();

    let _telemetry = portal_telemetry::init(
        TelemetryConfig::builder()
            .log_format(config.log_format.into())
            .otlp_endpoint(config.otlp_endpoint.clone())
            .service_name("portal-gateway")
            .build(),
    )
    .context("failed to initialize telemetry")?;

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => debug!("no environment file found"),
        Err(e) => warn!(error = %e, "failed to load environment file"),
    }

    info!(
        listen_addr = %config.listen_addr,
        store = %config.store,
        domain = %config.domain,
        api_quota = config.api_quota,
        retention_hours = config.retention_hours,
        "starting portal gateway"
    );

    let policy = QuotaPolicy::builder().limit(config.api_quota).build();
    let settings = ShortenerSettings::builder()
        .domain(config.domain.clone())
        .default_retention(Retention::from_hours(config.retention_hours))
        .build();

    let state = match config.store {
        StoreBackendArg::Redis => {
            let redis = RedisSettings {
                addr: config.db_addr.clone(),
                password: config.db_pass.clone(),
            };
            // Connections are dialled on first use.
            let links = RedisStore::open(&redis, Namespace::Links)
                .context("invalid link store configuration")?;
            let quota = RedisStore::open(&redis, Namespace::Quota)
                .context("invalid quota store configuration")?;
            AppState::from_stores(links, quota, UuidGenerator::new(), policy, settings)
        }
        StoreBackendArg::Memory => AppState::from_stores(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
            UuidGenerator::new(),
            policy,
            settings,
        ),
    };

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(
        listener,
        App::router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("portal gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
