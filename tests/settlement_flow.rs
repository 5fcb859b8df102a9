//! End-to-end settlement flow across both services.
//!
//! Drives the event service and the bet service together through the
//! in-memory testkit: events are created and resolved on the line side,
//! their snapshots are fed to the bet side the same way the HTTP feed
//! would deliver them, and bets settle on history reads.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal_macros::dec;

use betline::domain::{BetDraft, BetStatus, Event, EventState, Outcome};
use betline::error::BetlineError;
use betline::feed::{EventFeed, FeedEvent};
use betline::service::{BetService, EventService};
use betline::testkit::{
    FixedOutcomes, InMemoryBetStore, InMemoryEventStore, ScriptedFeed, SequenceOutcomes,
};

fn line_service(outcomes: Arc<dyn betline::domain::OutcomeSource>) -> EventService {
    EventService::new(Arc::new(InMemoryEventStore::new(outcomes)))
}

fn bet_service() -> (BetService, Arc<ScriptedFeed>) {
    let feed = Arc::new(ScriptedFeed::new());
    let service = BetService::new(
        Arc::new(InMemoryBetStore::new()),
        Arc::clone(&feed) as Arc<dyn EventFeed>,
    );
    (service, feed)
}

fn as_feed_events(events: &[Event]) -> Vec<FeedEvent> {
    events
        .iter()
        .map(|e| FeedEvent {
            event_id: e.event_id.clone(),
            coefficient: e.coefficient,
            deadline: e.deadline,
            state: e.state,
        })
        .collect()
}

fn as_resolved_snapshot(events: &[Event]) -> HashMap<String, EventState> {
    events
        .iter()
        .filter(|e| e.state.is_terminal())
        .map(|e| (e.event_id.clone(), e.state))
        .collect()
}

async fn mirror_active(
    line: &EventService,
    feed: &ScriptedFeed,
    now: DateTime<Utc>,
) -> Vec<Event> {
    let active = line.active(now).await.unwrap();
    feed.set_active(as_feed_events(&active)).await;
    active
}

#[tokio::test]
async fn bets_settle_after_events_resolve() {
    let now = Utc::now();
    let line = line_service(Arc::new(FixedOutcomes(Outcome::Win)));
    let (bets, feed) = bet_service();

    // Two open events and one that expires immediately.
    line.create("ev-long".to_string(), dec!(1.80), 600, now)
        .await
        .unwrap();
    line.create("ev-short".to_string(), dec!(2.10), 60, now)
        .await
        .unwrap();
    mirror_active(&line, &feed, now).await;

    bets.create_bet(BetDraft {
        bet_id: "b-long".to_string(),
        event_id: "ev-long".to_string(),
        amount: dec!(25.00),
    })
    .await
    .unwrap();
    bets.create_bet(BetDraft {
        bet_id: "b-short".to_string(),
        event_id: "ev-short".to_string(),
        amount: dec!(5.50),
    })
    .await
    .unwrap();

    // Only ev-short has expired; the past-events read resolves it.
    let later = now + Duration::seconds(120);
    let past = line.past(later).await.unwrap();
    assert_eq!(past.len(), 1);
    feed.set_resolved(as_resolved_snapshot(&past)).await;

    let history = bets.history().await.unwrap();
    let status_of = |bet_id: &str| {
        history
            .iter()
            .find(|b| b.bet_id == bet_id)
            .map(|b| b.status)
    };
    assert_eq!(status_of("b-short"), Some(BetStatus::FinishedWin));
    assert_eq!(status_of("b-long"), Some(BetStatus::New));
}

#[tokio::test]
async fn immediate_deadline_resolves_once_and_stays_resolved() {
    let now = Utc::now();
    // First draw wins; a second resolution pass would draw a loss.
    let line = line_service(Arc::new(SequenceOutcomes::new([
        Outcome::Win,
        Outcome::Lose,
    ])));

    line.create("ev-now".to_string(), dec!(1.50), 0, now)
        .await
        .unwrap();

    let first = line.past(now + Duration::seconds(1)).await.unwrap();
    assert_eq!(
        first.first().map(|e| e.state),
        Some(EventState::FinishedWin)
    );

    let second = line.past(now + Duration::seconds(3600)).await.unwrap();
    assert_eq!(
        second.first().map(|e| e.state),
        Some(EventState::FinishedWin)
    );
}

#[tokio::test]
async fn duplicate_bet_rejected_across_full_flow() {
    let now = Utc::now();
    let line = line_service(Arc::new(FixedOutcomes(Outcome::Lose)));
    let (bets, feed) = bet_service();

    line.create("ev-1".to_string(), dec!(1.95), 600, now)
        .await
        .unwrap();
    mirror_active(&line, &feed, now).await;

    bets.create_bet(BetDraft {
        bet_id: "b-1".to_string(),
        event_id: "ev-1".to_string(),
        amount: dec!(10.00),
    })
    .await
    .unwrap();

    let err = bets
        .create_bet(BetDraft {
            bet_id: "b-2".to_string(),
            event_id: "ev-1".to_string(),
            amount: dec!(20.00),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, BetlineError::DuplicateBet(_)));

    let history = bets.history().await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn losing_resolution_settles_bet_as_lost() {
    let now = Utc::now();
    let line = line_service(Arc::new(FixedOutcomes(Outcome::Lose)));
    let (bets, feed) = bet_service();

    line.create("ev-1".to_string(), dec!(3.00), 30, now)
        .await
        .unwrap();
    mirror_active(&line, &feed, now).await;

    bets.create_bet(BetDraft {
        bet_id: "b-1".to_string(),
        event_id: "ev-1".to_string(),
        amount: dec!(0.01),
    })
    .await
    .unwrap();

    let past = line.past(now + Duration::seconds(60)).await.unwrap();
    feed.set_resolved(as_resolved_snapshot(&past)).await;

    let history = bets.history().await.unwrap();
    assert_eq!(
        history.first().map(|b| b.status),
        Some(BetStatus::FinishedLose)
    );

    // Re-running settlement with the same snapshot changes nothing.
    let again = bets.history().await.unwrap();
    assert_eq!(history, again);
}

#[tokio::test]
async fn expired_event_no_longer_accepts_bets() {
    let now = Utc::now();
    let line = line_service(Arc::new(FixedOutcomes(Outcome::Win)));
    let (bets, feed) = bet_service();

    line.create("ev-gone".to_string(), dec!(1.10), 0, now)
        .await
        .unwrap();

    // By the time the bet arrives the event has left the active feed.
    let later = now + Duration::seconds(5);
    mirror_active(&line, &feed, later).await;

    let err = bets
        .create_bet(BetDraft {
            bet_id: "b-1".to_string(),
            event_id: "ev-gone".to_string(),
            amount: dec!(1.00),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, BetlineError::EventNotFound(_)));
    assert!(bets.history().await.unwrap().is_empty());
}
