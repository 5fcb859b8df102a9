//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All resource endpoints are mounted under `/api/v1`; `/health` sits at
//! the root of each service.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::{BetState, LineState};

/// Builds the line provider's router with all event endpoints.
pub fn line_router() -> Router<LineState> {
    Router::new()
        .nest("/api/v1", handlers::events::routes())
        .merge(handlers::system::routes("line-provider"))
}

/// Builds the bet maker's router with all bet endpoints.
pub fn bet_router() -> Router<BetState> {
    Router::new()
        .nest("/api/v1", handlers::bets::routes())
        .merge(handlers::system::routes("bet-maker"))
}
