//! Persistence layer: repository traits and their PostgreSQL stores.
//!
//! Each service owns exactly one record set — events for the line provider,
//! bets for the bet maker — keyed by a business identifier unique within the
//! set. There is no foreign key between them: referential integrity across
//! the network boundary is the service layer's responsibility.
//!
//! The traits exist so the service layer can run against in-memory
//! implementations in tests; production wiring always uses the `Pg*` stores.

pub mod bet_store;
pub mod event_store;

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use bet_store::PgBetStore;
pub use event_store::PgEventStore;

use crate::domain::{Bet, BetDraft, Event, EventDraft, EventPatch, EventState};
use crate::error::BetlineError;

/// Storage operations for events.
#[async_trait]
pub trait EventRepository: Send + Sync + fmt::Debug {
    /// Returns all events whose deadline lies after `now`. The state is
    /// irrelevant at query time; a just-expired-but-unresolved event drops
    /// out of this list the moment its deadline truly passes.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::PersistenceError`] on storage failure.
    async fn active(&self, now: DateTime<Utc>) -> Result<Vec<Event>, BetlineError>;

    /// Looks up an event by its business key.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::PersistenceError`] on storage failure.
    async fn find(&self, event_id: &str) -> Result<Option<Event>, BetlineError>;

    /// Resolves every unresolved past-deadline event, then returns all
    /// events whose deadline lies before `now`, most recent deadline first.
    ///
    /// Resolution and the subsequent select run in one atomic unit: a
    /// concurrent reader never observes a partially resolved batch, and an
    /// event resolved here no longer matches the unresolved predicate on the
    /// next call.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::PersistenceError`] on storage failure.
    async fn past(&self, now: DateTime<Utc>) -> Result<Vec<Event>, BetlineError>;

    /// Inserts a new event in state `NEW`.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::DuplicateEvent`] when the `event_id` is
    /// already present, [`BetlineError::PersistenceError`] on other storage
    /// failures.
    async fn insert(&self, draft: EventDraft) -> Result<Event, BetlineError>;

    /// Applies a partial update; only fields carried by the patch change.
    /// Returns `None` when no event with the key exists.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::PersistenceError`] on storage failure.
    async fn update(
        &self,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<Option<Event>, BetlineError>;

    /// Deletes an event by its business key.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::EventNotFound`] when absent,
    /// [`BetlineError::PersistenceError`] on storage failure.
    async fn delete(&self, event_id: &str) -> Result<(), BetlineError>;
}

/// Storage operations for bets.
#[async_trait]
pub trait BetRepository: Send + Sync + fmt::Debug {
    /// Returns every stored bet, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::PersistenceError`] on storage failure.
    async fn list(&self) -> Result<Vec<Bet>, BetlineError>;

    /// Looks up the bet referencing the given event, if any.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::PersistenceError`] on storage failure.
    async fn find_by_event_id(&self, event_id: &str) -> Result<Option<Bet>, BetlineError>;

    /// Inserts a new bet in status `NEW`.
    ///
    /// The unique constraints on `bet_id` and `event_id` are the final
    /// arbiter for duplicate creation; service-level pre-checks are an
    /// optimization only.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::DuplicateBet`] on a uniqueness violation,
    /// [`BetlineError::PersistenceError`] on other storage failures.
    async fn insert(&self, draft: BetDraft) -> Result<Bet, BetlineError>;

    /// Settles pending bets against a resolved-event snapshot.
    ///
    /// Every bet with status `NEW` whose `event_id` appears in the map moves
    /// to `FINISHED_WIN` when the mapped state is the winning terminal
    /// value, otherwise to `FINISHED_LOSE`. Bets whose event is absent stay
    /// pending. Atomic per invocation and idempotent: settled bets never
    /// match the pending predicate again. Returns the number of bets
    /// settled.
    ///
    /// # Errors
    ///
    /// Returns [`BetlineError::PersistenceError`] on storage failure.
    async fn reconcile(
        &self,
        resolved: &HashMap<String, EventState>,
    ) -> Result<u64, BetlineError>;
}
