//! Event model and resolution lifecycle.
//!
//! An [`Event`] is an external proposition clients can wager on. It carries
//! a win coefficient and an absolute deadline; once the deadline passes the
//! event resolves exactly once into one of two terminal states.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::BetlineError;

/// Lifecycle state of an event.
///
/// Transitions are one-way: `NEW` moves to exactly one of the terminal
/// states and never reverses. The only writer of the transition is the
/// store-side resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventState {
    /// Unresolved; the event accepts bets while its deadline has not passed.
    New,
    /// Resolved as won.
    FinishedWin,
    /// Resolved as lost.
    FinishedLose,
}

impl EventState {
    /// Returns `true` for the two finished states.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::FinishedWin | Self::FinishedLose)
    }

    /// Database/wire representation of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::FinishedWin => "FINISHED_WIN",
            Self::FinishedLose => "FINISHED_LOSE",
        }
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventState {
    type Err = BetlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "FINISHED_WIN" => Ok(Self::FinishedWin),
            "FINISHED_LOSE" => Ok(Self::FinishedLose),
            other => Err(BetlineError::PersistenceError(format!(
                "unknown event state: {other}"
            ))),
        }
    }
}

/// A stored event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Surrogate key owned by the store.
    pub id: i64,
    /// External unique business key, immutable once created.
    pub event_id: String,
    /// Win coefficient. Positive; informational for settlement.
    pub coefficient: Decimal,
    /// Absolute deadline. The event is active while `now < deadline` and the
    /// state is still [`EventState::New`].
    pub deadline: DateTime<Utc>,
    /// Current lifecycle state.
    pub state: EventState,
}

impl Event {
    /// Returns `true` if the event still accepts bets at `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.state == EventState::New && now < self.deadline
    }
}

/// Fields required to insert a new event. The deadline is already absolute;
/// the service computes it from the client-supplied relative offset.
#[derive(Debug, Clone)]
pub struct EventDraft {
    /// External unique business key.
    pub event_id: String,
    /// Win coefficient.
    pub coefficient: Decimal,
    /// Absolute deadline.
    pub deadline: DateTime<Utc>,
}

/// Partial update for an event. Only fields explicitly supplied are
/// modified. The state is deliberately absent: resolution is the only
/// writer of state transitions.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    /// Replacement coefficient, if supplied.
    pub coefficient: Option<Decimal>,
    /// Replacement absolute deadline, if supplied.
    pub deadline: Option<DateTime<Utc>>,
}

impl EventPatch {
    /// Returns `true` when the patch carries no changes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.coefficient.is_none() && self.deadline.is_none()
    }
}
