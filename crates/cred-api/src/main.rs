//! # cred-api: Binary Entry Point
//!
//! Parses configuration, initializes tracing, metrics and storage, and
//! serves the router.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

use cred_api::state::{AppConfig, AppState, LogFormat};
use cred_store::{KeyValueStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    init_tracing(config.log_format);
    tracing::info!(?config, "starting cred-api");

    let store: Arc<dyn KeyValueStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = cred_store::postgres::init_pool(url)
                .await
                .context("database initialization failed")?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, credentials are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let metrics_enabled = config.metrics_enabled;
    let port = config.port;
    let mut state = AppState::with_store(config, store);
    if metrics_enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("failed to install Prometheus recorder")?;
        state = state.with_metrics(handle);
    }

    let app = cred_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("cred-api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
