//! Event service: business-level guards over the event store.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::{Event, EventDraft, EventPatch};
use crate::error::BetlineError;
use crate::persistence::EventRepository;

/// Orchestration layer for event management.
///
/// Thin by design: uniqueness and resolution live in the store; this layer
/// validates input, converts the relative deadline offset into an absolute
/// instant, and maps store absence to domain errors. Current time is always
/// an explicit argument so behavior is deterministic under test.
#[derive(Debug, Clone)]
pub struct EventService {
    store: Arc<dyn EventRepository>,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(store: Arc<dyn EventRepository>) -> Self {
        Self { store }
    }

    /// Returns all events still open for betting at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::PersistenceError`] on storage failure.
    pub async fn active(&self, now: DateTime<Utc>) -> Result<Vec<Event>, BetlineError> {
        self.store.active(now).await
    }

    /// Returns a single event by its business key.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::EventNotFound`] when absent.
    pub async fn get(&self, event_id: &str) -> Result<Event, BetlineError> {
        self.store
            .find(event_id)
            .await?
            .ok_or_else(|| BetlineError::EventNotFound(event_id.to_string()))
    }

    /// Returns all past events, resolving any unresolved ones first.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::PersistenceError`] on storage failure.
    pub async fn past(&self, now: DateTime<Utc>) -> Result<Vec<Event>, BetlineError> {
        self.store.past(now).await
    }

    /// Creates a new event with deadline `now + deadline_secs`.
    ///
    /// The duplicate pre-check is an early, cheaper rejection; the store's
    /// unique constraint remains the final arbiter under concurrency.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::InvalidRequest`] for a non-positive
    /// coefficient and [`BetlineError::DuplicateEvent`] when the `event_id`
    /// is taken.
    pub async fn create(
        &self,
        event_id: String,
        coefficient: Decimal,
        deadline_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<Event, BetlineError> {
        if coefficient <= Decimal::ZERO {
            return Err(BetlineError::InvalidRequest(
                "coefficient must be strictly positive".to_string(),
            ));
        }
        if self.store.find(&event_id).await?.is_some() {
            return Err(BetlineError::DuplicateEvent(event_id));
        }

        let draft = EventDraft {
            event_id,
            coefficient,
            deadline: now + Duration::seconds(deadline_secs),
        };
        let event = self.store.insert(draft).await?;

        tracing::info!(event_id = %event.event_id, deadline = %event.deadline, "event created");
        Ok(event)
    }

    /// Applies a partial update to an event.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::InvalidRequest`] for a non-positive
    /// coefficient and [`BetlineError::EventNotFound`] when absent.
    pub async fn update(
        &self,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<Event, BetlineError> {
        if let Some(coefficient) = patch.coefficient {
            if coefficient <= Decimal::ZERO {
                return Err(BetlineError::InvalidRequest(
                    "coefficient must be strictly positive".to_string(),
                ));
            }
        }
        if patch.is_empty() {
            return self.get(event_id).await;
        }
        self.store
            .update(event_id, patch)
            .await?
            .ok_or_else(|| BetlineError::EventNotFound(event_id.to_string()))
    }

    /// Deletes an event by its business key.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::EventNotFound`] when absent.
    pub async fn delete(&self, event_id: &str) -> Result<(), BetlineError> {
        self.store.delete(event_id).await?;
        tracing::info!(%event_id, "event deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::{EventState, Outcome};
    use crate::testkit::{FixedOutcomes, InMemoryEventStore, SequenceOutcomes};

    fn service_with(outcomes: Arc<dyn crate::domain::OutcomeSource>) -> EventService {
        EventService::new(Arc::new(InMemoryEventStore::new(outcomes)))
    }

    fn service() -> EventService {
        service_with(Arc::new(FixedOutcomes(Outcome::Win)))
    }

    #[tokio::test]
    async fn create_stores_absolute_deadline() {
        let svc = service();
        let now = Utc::now();
        let event = svc
            .create("ev-1".to_string(), dec!(1.85), 600, now)
            .await
            .unwrap();
        assert_eq!(event.deadline, now + Duration::seconds(600));
        assert_eq!(event.state, EventState::New);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_event_id() {
        let svc = service();
        let now = Utc::now();
        svc.create("ev-1".to_string(), dec!(1.5), 600, now)
            .await
            .unwrap();
        let err = svc
            .create("ev-1".to_string(), dec!(2.0), 600, now)
            .await
            .unwrap_err();
        assert!(matches!(err, BetlineError::DuplicateEvent(_)));
    }

    #[tokio::test]
    async fn create_rejects_non_positive_coefficient() {
        let svc = service();
        let err = svc
            .create("ev-1".to_string(), dec!(0), 600, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, BetlineError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn get_missing_event_is_not_found() {
        let svc = service();
        let err = svc.get("ghost").await.unwrap_err();
        assert!(matches!(err, BetlineError::EventNotFound(_)));
    }

    #[tokio::test]
    async fn active_excludes_past_deadline() {
        let svc = service();
        let now = Utc::now();
        svc.create("open".to_string(), dec!(1.5), 600, now)
            .await
            .unwrap();
        svc.create("closed".to_string(), dec!(1.5), 0, now)
            .await
            .unwrap();

        let active = svc.active(now).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active.first().map(|e| e.event_id.as_str()), Some("open"));
    }

    #[tokio::test]
    async fn past_read_resolves_expired_events() {
        let svc = service();
        let now = Utc::now();
        // Deadline offset 0: immediately past on the next read.
        svc.create("ev-1".to_string(), dec!(1.5), 0, now)
            .await
            .unwrap();

        let later = now + Duration::seconds(1);
        let past = svc.past(later).await.unwrap();
        assert_eq!(past.len(), 1);
        assert_eq!(
            past.first().map(|e| e.state),
            Some(EventState::FinishedWin)
        );
    }

    #[tokio::test]
    async fn resolution_happens_at_most_once() {
        // First draw wins; if resolution ran again it would draw a loss.
        let svc = service_with(Arc::new(SequenceOutcomes::new([
            Outcome::Win,
            Outcome::Lose,
        ])));
        let now = Utc::now();
        svc.create("ev-1".to_string(), dec!(1.5), 0, now)
            .await
            .unwrap();

        let later = now + Duration::seconds(1);
        let first = svc.past(later).await.unwrap();
        let second = svc.past(later + Duration::seconds(5)).await.unwrap();
        assert_eq!(
            first.first().map(|e| e.state),
            Some(EventState::FinishedWin)
        );
        assert_eq!(first.first().map(|e| e.state), second.first().map(|e| e.state));
    }

    #[tokio::test]
    async fn past_orders_by_deadline_descending() {
        let svc = service();
        let now = Utc::now();
        svc.create("older".to_string(), dec!(1.5), -120, now)
            .await
            .unwrap();
        svc.create("newer".to_string(), dec!(1.5), -60, now)
            .await
            .unwrap();

        let past = svc.past(now).await.unwrap();
        let ids: Vec<&str> = past.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let svc = service();
        let now = Utc::now();
        let created = svc
            .create("ev-1".to_string(), dec!(1.5), 600, now)
            .await
            .unwrap();

        let patch = EventPatch {
            coefficient: Some(dec!(2.25)),
            deadline: None,
        };
        let updated = svc.update("ev-1", patch).await.unwrap();
        assert_eq!(updated.coefficient, dec!(2.25));
        assert_eq!(updated.deadline, created.deadline);
        assert_eq!(updated.state, EventState::New);
    }

    #[tokio::test]
    async fn empty_patch_returns_event_unchanged() {
        let svc = service();
        let now = Utc::now();
        let created = svc
            .create("ev-1".to_string(), dec!(1.5), 600, now)
            .await
            .unwrap();

        let updated = svc.update("ev-1", EventPatch::default()).await.unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn update_missing_event_is_not_found() {
        let svc = service();
        let err = svc.update("ghost", EventPatch::default()).await.unwrap_err();
        assert!(matches!(err, BetlineError::EventNotFound(_)));
    }

    #[tokio::test]
    async fn delete_missing_event_is_not_found() {
        let svc = service();
        let err = svc.delete("ghost").await.unwrap_err();
        assert!(matches!(err, BetlineError::EventNotFound(_)));
    }
}
