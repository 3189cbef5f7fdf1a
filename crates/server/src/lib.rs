//! HTTP server for the cinema booking API.
//!
//! This crate turns requests into store queries and shapes the results:
//! - **routes**: the axum router, one resource per entity
//! - **handlers**: resource controllers and request payload validation
//! - **projections**: the response shape chosen for each action
//! - **pagination**: page parameters and the paginated envelope
//! - **extract**: JSON body, query string and caller identity extractors
//! - **fields**: lenient write-body fields with per-field errors
//! - **error**: mapping of failures to HTTP responses
//! - **config**: command-line/environment configuration

pub mod config;
pub mod error;
pub mod extract;
pub mod fields;
pub mod handlers;
pub mod pagination;
pub mod projections;
pub mod routes;
pub mod state;

pub use config::{DatabaseConfig, ServerConfig};
pub use error::ApiError;
pub use routes::create_app;
pub use state::AppState;

use anyhow::{Context, Result};
use store::Database;
use tokio::net::TcpListener;
use tracing::info;

/// Serve the API on `config.bind` until Ctrl-C.
pub async fn serve(db: Database, config: &ServerConfig) -> Result<()> {
    let app = create_app(AppState::new(db));

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Cinema API listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown requested");
}
