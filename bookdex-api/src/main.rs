//! bookdex-api - book catalog backend
//!
//! Stores book records, enriches them via an external metadata lookup,
//! and serves CRUD, reporting, and chart endpoints over HTTP.

use anyhow::{Context, Result};
use bookdex_common::Config;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookdex_api::services::google_books::GoogleBooksClient;
use bookdex_api::{build_router, db, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookdex_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    info!(
        "Starting bookdex-api v{} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.host,
        config.port
    );
    info!("Database: {}", config.database.display());

    let pool = db::connect(&config.database)
        .await
        .context("Failed to open database")?;
    info!("Database connection established");

    let lookup = GoogleBooksClient::new(
        &config.lookup_base_url,
        Duration::from_secs(config.lookup_timeout_secs),
    )
    .context("Failed to build lookup client")?;

    let state = AppState::new(pool, Arc::new(lookup));
    let app = build_router(state, &config.allowed_origins);

    let addr = config.bind_addr().context("Invalid bind configuration")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Listening on http://{}", addr);
    info!("Dashboard: http://{}/", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
