//! # TaskDesk API Server
//!
//! This is the main API server for TaskDesk, a small task/comment tracker
//! with JWT-based authentication and role-based authorization.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - Session endpoints (register, login, refresh with rotation, logout)
//! - CRUD endpoints for users, tasks and comments
//! - Role and ownership gates on mutations
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskdesk-api
//! ```

use anyhow::Context as _;
use taskdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskdesk_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so RUST_LOG from .env is visible to tracing
    let config = Config::from_env().context("Failed to load configuration")?;

    init_tracing();

    tracing::info!(
        "TaskDesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Connect to the database; an unreachable store is fatal at startup
    let db_config = pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    };
    let db = pool::create_pool(db_config)
        .await
        .context("Failed to connect to database")?;

    migrations::run_migrations(&db)
        .await
        .context("Failed to run database migrations")?;

    // Build the application
    let addr = config.bind_address();
    let state = AppState::new(db, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutdown complete");

    Ok(())
}

/// Initializes tracing with an env filter and optional JSON output
///
/// `RUST_LOG` controls the filter; `LOG_FORMAT=json` switches to
/// newline-delimited JSON events.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskdesk_api=info,taskdesk_shared=info,tower_http=info".into());

    let json_output = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Resolves when the process receives a shutdown signal
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
