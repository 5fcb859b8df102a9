//! In-memory repositories mirroring the PostgreSQL stores' semantics.
//!
//! These back the service-layer tests: every behavior the SQL stores promise
//! (uniqueness conflicts, lazy resolution, idempotent reconciliation) is
//! reproduced here over a `Vec` behind a mutex.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{
    Bet, BetDraft, BetStatus, Event, EventDraft, EventPatch, EventState, OutcomeSource,
};
use crate::error::BetlineError;
use crate::persistence::{BetRepository, EventRepository};

/// In-memory [`EventRepository`] with the same lazy-resolution behavior as
/// the PostgreSQL store.
#[derive(Debug)]
pub struct InMemoryEventStore {
    events: Mutex<Vec<Event>>,
    next_id: AtomicI64,
    outcomes: Arc<dyn OutcomeSource>,
}

impl InMemoryEventStore {
    /// Creates an empty store drawing resolution outcomes from `outcomes`.
    #[must_use]
    pub fn new(outcomes: Arc<dyn OutcomeSource>) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            outcomes,
        }
    }
}

#[async_trait]
impl EventRepository for InMemoryEventStore {
    async fn active(&self, now: DateTime<Utc>) -> Result<Vec<Event>, BetlineError> {
        let events = self.events.lock().await;
        Ok(events.iter().filter(|e| e.deadline > now).cloned().collect())
    }

    async fn find(&self, event_id: &str) -> Result<Option<Event>, BetlineError> {
        let events = self.events.lock().await;
        Ok(events.iter().find(|e| e.event_id == event_id).cloned())
    }

    async fn past(&self, now: DateTime<Utc>) -> Result<Vec<Event>, BetlineError> {
        let mut events = self.events.lock().await;
        for event in events.iter_mut() {
            if event.state == EventState::New && event.deadline < now {
                event.state = EventState::from(self.outcomes.draw());
            }
        }
        let mut past: Vec<Event> = events
            .iter()
            .filter(|e| e.deadline < now)
            .cloned()
            .collect();
        past.sort_by(|a, b| b.deadline.cmp(&a.deadline));
        Ok(past)
    }

    async fn insert(&self, draft: EventDraft) -> Result<Event, BetlineError> {
        let mut events = self.events.lock().await;
        if events.iter().any(|e| e.event_id == draft.event_id) {
            return Err(BetlineError::DuplicateEvent(draft.event_id));
        }
        let event = Event {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            event_id: draft.event_id,
            coefficient: draft.coefficient,
            deadline: draft.deadline,
            state: EventState::New,
        };
        events.push(event.clone());
        Ok(event)
    }

    async fn update(
        &self,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<Option<Event>, BetlineError> {
        let mut events = self.events.lock().await;
        let Some(event) = events.iter_mut().find(|e| e.event_id == event_id) else {
            return Ok(None);
        };
        if let Some(coefficient) = patch.coefficient {
            event.coefficient = coefficient;
        }
        if let Some(deadline) = patch.deadline {
            event.deadline = deadline;
        }
        Ok(Some(event.clone()))
    }

    async fn delete(&self, event_id: &str) -> Result<(), BetlineError> {
        let mut events = self.events.lock().await;
        let before = events.len();
        events.retain(|e| e.event_id != event_id);
        if events.len() == before {
            return Err(BetlineError::EventNotFound(event_id.to_string()));
        }
        Ok(())
    }
}

/// In-memory [`BetRepository`] with the same uniqueness and reconciliation
/// behavior as the PostgreSQL store.
#[derive(Debug)]
pub struct InMemoryBetStore {
    bets: Mutex<Vec<Bet>>,
    next_id: AtomicI64,
}

impl InMemoryBetStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bets: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryBetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BetRepository for InMemoryBetStore {
    async fn list(&self) -> Result<Vec<Bet>, BetlineError> {
        let bets = self.bets.lock().await;
        Ok(bets.clone())
    }

    async fn find_by_event_id(&self, event_id: &str) -> Result<Option<Bet>, BetlineError> {
        let bets = self.bets.lock().await;
        Ok(bets.iter().find(|b| b.event_id == event_id).cloned())
    }

    async fn insert(&self, draft: BetDraft) -> Result<Bet, BetlineError> {
        let mut bets = self.bets.lock().await;
        if bets.iter().any(|b| b.bet_id == draft.bet_id) {
            return Err(BetlineError::DuplicateBet(format!(
                "bet_id {} already exists",
                draft.bet_id
            )));
        }
        if bets.iter().any(|b| b.event_id == draft.event_id) {
            return Err(BetlineError::DuplicateBet(format!(
                "event {} already has a bet",
                draft.event_id
            )));
        }
        let bet = Bet {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            bet_id: draft.bet_id,
            event_id: draft.event_id,
            amount: draft.amount,
            status: BetStatus::New,
        };
        bets.push(bet.clone());
        Ok(bet)
    }

    async fn reconcile(
        &self,
        resolved: &HashMap<String, EventState>,
    ) -> Result<u64, BetlineError> {
        let mut bets = self.bets.lock().await;
        let mut settled = 0;
        for bet in bets.iter_mut() {
            if bet.status != BetStatus::New {
                continue;
            }
            let Some(state) = resolved.get(&bet.event_id) else {
                continue;
            };
            if let Some(status) = BetStatus::settled_from(*state) {
                bet.status = status;
                settled += 1;
            }
        }
        Ok(settled)
    }
}
