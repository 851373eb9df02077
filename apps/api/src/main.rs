mod blob_store;
mod config;
mod document;
mod errors;
mod http_time;
mod models;
mod resume;
mod routes;
mod state;
mod sync;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::blob_store::VercelBlobClient;
use crate::config::Config;
use crate::document::ExportFetcher;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing blob token is reported per request
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));
    if config.blob_token.is_none() {
        warn!("BLOB_READ_WRITE_TOKEN is not set; resume endpoints will report a configuration error");
    }

    // One HTTP client for the document export and blob storage
    let http = build_http_client(&config)?;
    info!(
        "HTTP client initialized (timeout: {}s)",
        config.http_timeout_secs
    );

    let state = AppState {
        store: Arc::new(VercelBlobClient::new(http.clone(), config.blob_api_url.clone())),
        source: Arc::new(ExportFetcher::new(http)),
        config: Arc::new(config),
    };

    if sync::scheduler::spawn(state.clone()).is_none() {
        info!("No SYNC_INTERVAL_SECS set; scheduled syncs rely on GET /api/update-resume");
    }

    let addr: SocketAddr = format!("0.0.0.0:{}", state.config.port).parse()?;

    // Build router
    let app = build_router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the shared outbound client. Every upstream call inherits its timeouts.
fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.http_timeout())
        .connect_timeout(Duration::from_secs(10).min(config.http_timeout()))
        .build()
        .context("Failed to build HTTP client")
}
