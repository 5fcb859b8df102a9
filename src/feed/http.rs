//! HTTP client for the line provider's event feed.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use super::{EventFeed, FeedEvent};
use crate::domain::EventState;
use crate::error::BetlineError;

/// Reqwest-backed [`EventFeed`] talking to a line provider instance.
///
/// Every request carries the fixed timeout supplied at construction; a
/// timeout is reported as upstream-unavailable, never retried here.
#[derive(Debug, Clone)]
pub struct HttpLineFeed {
    client: Client,
    base_url: String,
}

impl HttpLineFeed {
    /// Creates a feed client for the given base URL (scheme + authority,
    /// no trailing slash) with a fixed per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::Internal`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, BetlineError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BetlineError::Internal(format!("failed to build http client: {e}")))?;
        Ok(Self { client, base_url })
    }

    async fn get_events(&self, path: &str) -> Result<Vec<FeedEvent>, BetlineError> {
        let url = format!("{}{path}", self.base_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(url = %url, error = %e, "line provider request failed");
            BetlineError::UpstreamUnavailable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(url = %url, status = %status, "line provider returned error status");
            return Err(BetlineError::UpstreamUnavailable(format!(
                "line provider returned status {status}"
            )));
        }

        let events: Vec<FeedEvent> = response.json().await.map_err(|e| {
            error!(url = %url, error = %e, "line provider returned malformed body");
            BetlineError::UpstreamUnavailable(e.to_string())
        })?;

        debug!(url = %url, count = events.len(), "fetched events from line provider");
        Ok(events)
    }
}

#[async_trait]
impl EventFeed for HttpLineFeed {
    async fn fetch_active(&self) -> Result<Vec<FeedEvent>, BetlineError> {
        self.get_events("/api/v1/events").await
    }

    async fn fetch_resolved(&self) -> Result<HashMap<String, EventState>, BetlineError> {
        let events = self.get_events("/api/v1/events/past").await?;
        Ok(events
            .into_iter()
            .filter(|e| e.state.is_terminal())
            .map(|e| (e.event_id, e.state))
            .collect())
    }
}
