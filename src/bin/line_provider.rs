//! line-provider server entry point.
//!
//! Starts the Axum HTTP server exposing the event management surface.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use betline::api;
use betline::app_state::LineState;
use betline::config::LineProviderConfig;
use betline::domain::RandomOutcomes;
use betline::persistence::PgEventStore;
use betline::service::EventService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = LineProviderConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting line-provider");

    // Connect to the events database and apply migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("migrations/line").run(&pool).await?;

    // Build persistence and service layers
    let store = Arc::new(PgEventStore::new(pool, Arc::new(RandomOutcomes)));
    let events = Arc::new(EventService::new(store));

    // Build application state and router
    let state = LineState { events };
    let app = api::line_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
