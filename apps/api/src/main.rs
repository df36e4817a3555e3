mod config;
mod curriculum;
mod docs_client;
mod errors;
mod export;
mod layout;
mod routes;
mod state;

use anyhow::Result;
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::docs_client::auth::TokenProvider;
use crate::docs_client::{build_http_client, GoogleConnector};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Printables API v{}", env!("CARGO_PKG_VERSION"));

    // One HTTP client shared by the token provider and every document service
    let http = build_http_client(Duration::from_secs(config.http_timeout_secs))?;

    let seed = config.seeded_token(Utc::now());
    let refresh = config.refresh_credentials();
    if seed.is_none() && refresh.is_none() {
        warn!("No Google credentials configured; exports will be rejected as unauthorized");
    }
    let tokens = TokenProvider::new(http.clone(), config.oauth_token_url.clone(), seed, refresh);

    let endpoints = config.endpoints();
    info!(
        "Docs API: {} | Drive API: {}",
        endpoints.docs_api_base, endpoints.drive_api_base
    );
    let docs = Arc::new(GoogleConnector::new(http, endpoints, tokens));

    let state = AppState::new(config.clone(), docs);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
