//! bet-maker server entry point.
//!
//! Starts the Axum HTTP server exposing the bet surface, backed by the
//! line provider's event feed.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use betline::api;
use betline::app_state::BetState;
use betline::config::BetMakerConfig;
use betline::feed::HttpLineFeed;
use betline::persistence::PgBetStore;
use betline::service::BetService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = BetMakerConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, upstream = %config.line_provider_url, "starting bet-maker");

    // Connect to the bets database and apply migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("migrations/bet").run(&pool).await?;

    // Build persistence, feed, and service layers
    let store = Arc::new(PgBetStore::new(pool));
    let feed = Arc::new(HttpLineFeed::new(
        config.line_provider_url.clone(),
        Duration::from_secs(config.upstream_timeout_secs),
    )?);
    let bets = Arc::new(BetService::new(store, feed));

    // Build application state and router
    let state = BetState { bets };
    let app = api::bet_router()
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
