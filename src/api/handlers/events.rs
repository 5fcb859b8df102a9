//! Event CRUD handlers for the line provider.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{CreateEventRequest, EventDto, UpdateEventRequest};
use crate::app_state::LineState;
use crate::domain::EventPatch;
use crate::error::{BetlineError, ErrorResponse};

/// `GET /events` — List all active events.
///
/// # Errors
///
/// Returns [`BetlineError`] on storage failures.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List active events",
    description = "Returns every event whose deadline has not yet passed.",
    responses(
        (status = 200, description = "Active events", body = Vec<EventDto>),
    )
)]
pub async fn list_active_events(
    State(state): State<LineState>,
) -> Result<impl IntoResponse, BetlineError> {
    let events = state.events.active(Utc::now()).await?;
    let dtos: Vec<EventDto> = events.into_iter().map(EventDto::from).collect();
    Ok(Json(dtos))
}

/// `GET /events/past` — List past events, resolving unresolved ones.
///
/// # Errors
///
/// Returns [`BetlineError`] on storage failures.
#[utoipa::path(
    get,
    path = "/api/v1/events/past",
    tag = "Events",
    summary = "List past events",
    description = "Resolves every unresolved past-deadline event, then returns all past events, most recent deadline first.",
    responses(
        (status = 200, description = "Past events with terminal states", body = Vec<EventDto>),
    )
)]
pub async fn list_past_events(
    State(state): State<LineState>,
) -> Result<impl IntoResponse, BetlineError> {
    let events = state.events.past(Utc::now()).await?;
    let dtos: Vec<EventDto> = events.into_iter().map(EventDto::from).collect();
    Ok(Json(dtos))
}

/// `GET /events/{event_id}` — Get a single event.
///
/// # Errors
///
/// Returns [`BetlineError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}",
    tag = "Events",
    summary = "Get event details",
    description = "Returns a single event by its business key.",
    params(
        ("event_id" = String, Path, description = "Event business key"),
    ),
    responses(
        (status = 200, description = "Event details", body = EventDto),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<LineState>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, BetlineError> {
    let event = state.events.get(&event_id).await?;
    Ok(Json(EventDto::from(event)))
}

/// `POST /events` — Create a new event.
///
/// # Errors
///
/// Returns [`BetlineError`] on invalid coefficients or duplicate keys.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create a new event",
    description = "Creates an event in state NEW. The deadline is supplied as an offset in seconds from now and stored as an absolute timestamp.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventDto),
        (status = 400, description = "Invalid coefficient", body = ErrorResponse),
        (status = 409, description = "Event already exists", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<LineState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, BetlineError> {
    let event = state
        .events
        .create(req.event_id, req.coefficient, req.deadline_secs, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(EventDto::from(event))))
}

/// `PUT /events/{event_id}` — Partially update an event.
///
/// # Errors
///
/// Returns [`BetlineError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/events/{event_id}",
    tag = "Events",
    summary = "Update an event",
    description = "Updates the supplied fields only. The state cannot be changed through this endpoint; resolution owns state transitions.",
    params(
        ("event_id" = String, Path, description = "Event business key"),
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event", body = EventDto),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<LineState>,
    Path(event_id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, BetlineError> {
    let patch = EventPatch {
        coefficient: req.coefficient,
        deadline: req.deadline,
    };
    let event = state.events.update(&event_id, patch).await?;
    Ok(Json(EventDto::from(event)))
}

/// `DELETE /events/{event_id}` — Remove an event.
///
/// # Errors
///
/// Returns [`BetlineError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{event_id}",
    tag = "Events",
    summary = "Delete an event",
    description = "Removes an event by its business key.",
    params(
        ("event_id" = String, Path, description = "Event business key"),
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<LineState>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, BetlineError> {
    state.events.delete(&event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Event management routes.
pub fn routes() -> Router<LineState> {
    Router::new()
        .route("/events", get(list_active_events).post(create_event))
        .route("/events/past", get(list_past_events))
        .route(
            "/events/{event_id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}
