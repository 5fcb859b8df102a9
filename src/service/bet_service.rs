//! Bet service: creation guards and eager settlement.

use std::sync::Arc;

use crate::domain::{Bet, BetDraft, bet::validate_amount};
use crate::error::BetlineError;
use crate::feed::{EventFeed, FeedEvent};
use crate::persistence::BetRepository;

/// Orchestration layer for bet placement and history.
///
/// Creation validates the wager against the remote active-event feed and
/// the local store; history settles pending bets against the remote
/// resolved-event snapshot before every read. There is no background
/// settlement job.
#[derive(Debug, Clone)]
pub struct BetService {
    store: Arc<dyn BetRepository>,
    feed: Arc<dyn EventFeed>,
}

impl BetService {
    /// Creates a new `BetService`.
    #[must_use]
    pub fn new(store: Arc<dyn BetRepository>, feed: Arc<dyn EventFeed>) -> Self {
        Self { store, feed }
    }

    /// Returns the currently active events as seen through the feed.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::UpstreamUnavailable`] when the line provider
    /// cannot be reached.
    pub async fn active_events(&self) -> Result<Vec<FeedEvent>, BetlineError> {
        self.feed.fetch_active().await
    }

    /// Places a new bet.
    ///
    /// The existence check against the feed and the local duplicate check
    /// are advisory; they are individually consistent but not jointly
    /// atomic with the insert. The store's unique constraints are the final
    /// arbiter, and their violation surfaces as [`BetlineError::DuplicateBet`].
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::InvalidRequest`] for a malformed amount,
    /// [`BetlineError::UpstreamUnavailable`] when the feed is unreachable,
    /// [`BetlineError::EventNotFound`] when the event is not active, and
    /// [`BetlineError::DuplicateBet`] when the event already has a bet.
    pub async fn create_bet(&self, draft: BetDraft) -> Result<Bet, BetlineError> {
        validate_amount(draft.amount)?;

        let active = self.feed.fetch_active().await?;
        if !active.iter().any(|e| e.event_id == draft.event_id) {
            return Err(BetlineError::EventNotFound(draft.event_id));
        }

        if self.store.find_by_event_id(&draft.event_id).await?.is_some() {
            return Err(BetlineError::DuplicateBet(format!(
                "event {} already has a bet",
                draft.event_id
            )));
        }

        let bet = self.store.insert(draft).await?;
        tracing::info!(bet_id = %bet.bet_id, event_id = %bet.event_id, amount = %bet.amount, "bet placed");
        Ok(bet)
    }

    /// Returns the full bet history, settling pending bets first.
    ///
    /// Settlement is synchronous and eager: the resolved-event snapshot is
    /// fetched and reconciled on every call. Safe to retry; reconciliation
    /// is idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::UpstreamUnavailable`] when the feed is
    /// unreachable (the history read aborts rather than serving stale
    /// statuses as settled).
    pub async fn history(&self) -> Result<Vec<Bet>, BetlineError> {
        let resolved = self.feed.fetch_resolved().await?;
        self.store.reconcile(&resolved).await?;
        self.store.list().await
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::{BetStatus, EventState};
    use crate::testkit::feed::active_event;
    use crate::testkit::{InMemoryBetStore, ScriptedFeed};

    fn draft(bet_id: &str, event_id: &str) -> BetDraft {
        BetDraft {
            bet_id: bet_id.to_string(),
            event_id: event_id.to_string(),
            amount: dec!(10.00),
        }
    }

    async fn service_with_active(events: &[&str]) -> (BetService, Arc<ScriptedFeed>) {
        let feed = Arc::new(ScriptedFeed::new());
        let deadline = Utc::now() + Duration::seconds(600);
        feed.set_active(events.iter().map(|id| active_event(id, deadline)).collect())
            .await;
        let service = BetService::new(
            Arc::new(InMemoryBetStore::new()),
            Arc::clone(&feed) as Arc<dyn EventFeed>,
        );
        (service, feed)
    }

    #[tokio::test]
    async fn creates_bet_on_active_event() {
        let (svc, _feed) = service_with_active(&["ev-1"]).await;
        let bet = svc.create_bet(draft("b-1", "ev-1")).await.unwrap();
        assert_eq!(bet.status, BetStatus::New);
        assert_eq!(bet.amount.to_string(), "10.00");
    }

    #[tokio::test]
    async fn rejects_bet_on_unknown_event() {
        let (svc, _feed) = service_with_active(&["ev-1"]).await;
        let err = svc.create_bet(draft("b-1", "ev-9")).await.unwrap_err();
        assert!(matches!(err, BetlineError::EventNotFound(_)));
        assert!(svc.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_second_bet_on_same_event() {
        let (svc, _feed) = service_with_active(&["ev-1"]).await;
        svc.create_bet(draft("b-1", "ev-1")).await.unwrap();
        let err = svc.create_bet(draft("b-2", "ev-1")).await.unwrap_err();
        assert!(matches!(err, BetlineError::DuplicateBet(_)));
        assert_eq!(svc.history().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_amount_with_three_fractional_digits() {
        let (svc, _feed) = service_with_active(&["ev-1"]).await;
        let mut bad = draft("b-1", "ev-1");
        bad.amount = dec!(10.005);
        let err = svc.create_bet(bad).await.unwrap_err();
        assert!(matches!(err, BetlineError::InvalidRequest(_)));
        assert!(svc.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn feed_outage_aborts_creation() {
        let (svc, feed) = service_with_active(&["ev-1"]).await;
        feed.set_failing(true);
        let err = svc.create_bet(draft("b-1", "ev-1")).await.unwrap_err();
        assert!(matches!(err, BetlineError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn feed_outage_aborts_history() {
        let (svc, feed) = service_with_active(&["ev-1"]).await;
        svc.create_bet(draft("b-1", "ev-1")).await.unwrap();
        feed.set_failing(true);
        let err = svc.history().await.unwrap_err();
        assert!(matches!(err, BetlineError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn history_settles_against_resolved_snapshot() {
        let (svc, feed) = service_with_active(&["ev-win", "ev-lose", "ev-open"]).await;
        svc.create_bet(draft("b-1", "ev-win")).await.unwrap();
        svc.create_bet(draft("b-2", "ev-lose")).await.unwrap();
        svc.create_bet(draft("b-3", "ev-open")).await.unwrap();

        feed.set_resolved(HashMap::from([
            ("ev-win".to_string(), EventState::FinishedWin),
            ("ev-lose".to_string(), EventState::FinishedLose),
        ]))
        .await;

        let history = svc.history().await.unwrap();
        let status_of = |bet_id: &str| {
            history
                .iter()
                .find(|b| b.bet_id == bet_id)
                .map(|b| b.status)
        };
        assert_eq!(status_of("b-1"), Some(BetStatus::FinishedWin));
        assert_eq!(status_of("b-2"), Some(BetStatus::FinishedLose));
        assert_eq!(status_of("b-3"), Some(BetStatus::New));
    }

    #[tokio::test]
    async fn settlement_is_idempotent() {
        let (svc, feed) = service_with_active(&["ev-1"]).await;
        svc.create_bet(draft("b-1", "ev-1")).await.unwrap();

        feed.set_resolved(HashMap::from([(
            "ev-1".to_string(),
            EventState::FinishedWin,
        )]))
        .await;
        let first = svc.history().await.unwrap();

        // A later snapshot flipping the state must not touch settled bets.
        feed.set_resolved(HashMap::from([(
            "ev-1".to_string(),
            EventState::FinishedLose,
        )]))
        .await;
        let second = svc.history().await.unwrap();

        assert_eq!(
            first.first().map(|b| b.status),
            Some(BetStatus::FinishedWin)
        );
        assert_eq!(first.first().map(|b| b.status), second.first().map(|b| b.status));
    }
}
