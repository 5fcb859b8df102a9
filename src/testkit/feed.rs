//! Scriptable event feed for bet-service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::domain::EventState;
use crate::error::BetlineError;
use crate::feed::{EventFeed, FeedEvent};

/// A feed whose snapshots are set by the test, with a switchable outage
/// mode that makes every fetch fail as upstream-unavailable.
#[derive(Debug, Default)]
pub struct ScriptedFeed {
    active: Mutex<Vec<FeedEvent>>,
    resolved: Mutex<HashMap<String, EventState>>,
    failing: AtomicBool,
}

impl ScriptedFeed {
    /// Creates an empty, healthy feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active-event snapshot.
    pub async fn set_active(&self, events: Vec<FeedEvent>) {
        *self.active.lock().await = events;
    }

    /// Replaces the resolved-event snapshot.
    pub async fn set_resolved(&self, resolved: HashMap<String, EventState>) {
        *self.resolved.lock().await = resolved;
    }

    /// Switches the outage mode on or off.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }
}

/// Builds an active feed entry with a default coefficient.
#[must_use]
pub fn active_event(event_id: &str, deadline: DateTime<Utc>) -> FeedEvent {
    FeedEvent {
        event_id: event_id.to_string(),
        coefficient: Decimal::new(15, 1),
        deadline,
        state: EventState::New,
    }
}

#[async_trait]
impl EventFeed for ScriptedFeed {
    async fn fetch_active(&self) -> Result<Vec<FeedEvent>, BetlineError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(BetlineError::UpstreamUnavailable(
                "scripted outage".to_string(),
            ));
        }
        Ok(self.active.lock().await.clone())
    }

    async fn fetch_resolved(&self) -> Result<HashMap<String, EventState>, BetlineError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(BetlineError::UpstreamUnavailable(
                "scripted outage".to_string(),
            ));
        }
        let resolved = self.resolved.lock().await;
        Ok(resolved
            .iter()
            .filter(|(_, state)| state.is_terminal())
            .map(|(id, state)| (id.clone(), *state))
            .collect())
    }
}
