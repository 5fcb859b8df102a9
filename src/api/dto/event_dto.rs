//! Event-related DTOs for the line provider surface.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Event, EventState};

/// Request body for `POST /events`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// External unique business key.
    pub event_id: String,
    /// Win coefficient; must be strictly positive.
    pub coefficient: Decimal,
    /// Deadline as an offset in seconds from the server's current time.
    pub deadline_secs: i64,
}

/// Request body for `PUT /events/{event_id}`. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    /// Replacement coefficient; must be strictly positive when supplied.
    #[serde(default)]
    pub coefficient: Option<Decimal>,
    /// Replacement absolute deadline.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

/// An event as served by the line provider.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDto {
    /// Surrogate key.
    pub id: i64,
    /// External unique business key.
    pub event_id: String,
    /// Win coefficient.
    pub coefficient: Decimal,
    /// Absolute deadline.
    pub deadline: DateTime<Utc>,
    /// Lifecycle state.
    pub state: EventState,
}

impl From<Event> for EventDto {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            event_id: event.event_id,
            coefficient: event.coefficient,
            deadline: event.deadline,
            state: event.state,
        }
    }
}
