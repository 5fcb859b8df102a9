//! Remote event feed consumed by the bet maker.
//!
//! The bet maker never reads the line provider's database; everything it
//! knows about events arrives through this feed. [`EventFeed`] is the seam:
//! production uses the HTTP client in [`http`], tests use a scripted feed.

pub mod http;

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use http::HttpLineFeed;

use crate::domain::EventState;
use crate::error::BetlineError;

/// An event as served by the line provider's feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeedEvent {
    /// Business key of the event.
    pub event_id: String,
    /// Win coefficient.
    pub coefficient: Decimal,
    /// Absolute deadline.
    pub deadline: DateTime<Utc>,
    /// Lifecycle state at snapshot time.
    pub state: EventState,
}

/// Snapshot access to the line provider's events.
///
/// Failures are never masked as empty results: an unreachable upstream or an
/// error status surfaces as [`BetlineError::UpstreamUnavailable`].
#[async_trait]
pub trait EventFeed: Send + Sync + fmt::Debug {
    /// Fetches the currently active events. Used for existence-checking at
    /// bet creation time.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::UpstreamUnavailable`] when the feed cannot be
    /// reached or answers with an error status.
    async fn fetch_active(&self) -> Result<Vec<FeedEvent>, BetlineError>;

    /// Fetches the resolved-event snapshot as a map from `event_id` to
    /// terminal state. Entries still in `NEW` are filtered out; only
    /// terminal states carry settlement information.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::UpstreamUnavailable`] when the feed cannot be
    /// reached or answers with an error status.
    async fn fetch_resolved(&self) -> Result<HashMap<String, EventState>, BetlineError>;
}
