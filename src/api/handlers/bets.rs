//! Bet handlers for the bet maker.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{BetDto, CreateBetRequest};
use crate::app_state::BetState;
use crate::domain::BetDraft;
use crate::error::{BetlineError, ErrorResponse};
use crate::feed::FeedEvent;

/// `GET /events` — List active events as seen through the line provider.
///
/// # Errors
///
/// Returns [`BetlineError::UpstreamUnavailable`] when the line provider
/// cannot be reached.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Bets",
    summary = "List active events",
    description = "Proxies the line provider's active-event feed so clients can discover events to bet on.",
    responses(
        (status = 200, description = "Active events", body = Vec<FeedEvent>),
        (status = 502, description = "Line provider unavailable", body = ErrorResponse),
    )
)]
pub async fn list_active_events(
    State(state): State<BetState>,
) -> Result<impl IntoResponse, BetlineError> {
    let events = state.bets.active_events().await?;
    Ok(Json(events))
}

/// `GET /bets` — Bet history with settlement.
///
/// # Errors
///
/// Returns [`BetlineError::UpstreamUnavailable`] when the resolved-event
/// feed cannot be fetched.
#[utoipa::path(
    get,
    path = "/api/v1/bets",
    tag = "Bets",
    summary = "List bet history",
    description = "Settles pending bets against the line provider's resolved events, then returns every bet with its current status.",
    responses(
        (status = 200, description = "All bets, settled where possible", body = Vec<BetDto>),
        (status = 502, description = "Line provider unavailable", body = ErrorResponse),
    )
)]
pub async fn bet_history(
    State(state): State<BetState>,
) -> Result<impl IntoResponse, BetlineError> {
    let bets = state.bets.history().await?;
    let dtos: Vec<BetDto> = bets.into_iter().map(BetDto::from).collect();
    Ok(Json(dtos))
}

/// `POST /bets` — Place a new bet.
///
/// # Errors
///
/// Returns [`BetlineError`] when the amount is malformed, the event is not
/// active, the event already has a bet, or the feed is unreachable.
#[utoipa::path(
    post,
    path = "/api/v1/bets",
    tag = "Bets",
    summary = "Place a bet",
    description = "Creates a bet on a currently active event. At most one bet may reference any given event.",
    request_body = CreateBetRequest,
    responses(
        (status = 201, description = "Bet placed", body = BetDto),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 404, description = "Event not active", body = ErrorResponse),
        (status = 409, description = "Duplicate bet", body = ErrorResponse),
        (status = 502, description = "Line provider unavailable", body = ErrorResponse),
    )
)]
pub async fn create_bet(
    State(state): State<BetState>,
    Json(req): Json<CreateBetRequest>,
) -> Result<impl IntoResponse, BetlineError> {
    let draft = BetDraft {
        bet_id: req.bet_id,
        event_id: req.event_id,
        amount: req.amount,
    };
    let bet = state.bets.create_bet(draft).await?;
    Ok((StatusCode::CREATED, Json(BetDto::from(bet))))
}

/// Bet placement and history routes.
pub fn routes() -> Router<BetState> {
    Router::new()
        .route("/events", get(list_active_events))
        .route("/bets", get(bet_history).post(create_bet))
}
