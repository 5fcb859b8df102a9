//! Shared application state injected into the Axum handlers.

use std::sync::Arc;

use crate::service::{BetService, EventService};

/// Line provider state available to its handlers via Axum's `State`
/// extractor.
#[derive(Debug, Clone)]
pub struct LineState {
    /// Event service for all event business logic.
    pub events: Arc<EventService>,
}

/// Bet maker state available to its handlers via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct BetState {
    /// Bet service for placement and history.
    pub bets: Arc<BetService>,
}
