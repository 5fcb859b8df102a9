//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`repos`] — In-memory [`EventRepository`](crate::persistence::EventRepository)
//!   and [`BetRepository`](crate::persistence::BetRepository) implementations
//!   mirroring the SQL stores' semantics.
//! - [`feed`] — A scriptable [`EventFeed`](crate::feed::EventFeed) with a
//!   switchable outage mode.
//! - [`outcomes`] — Deterministic [`OutcomeSource`](crate::domain::OutcomeSource)
//!   implementations.

pub mod feed;
pub mod outcomes;
pub mod repos;

pub use feed::ScriptedFeed;
pub use outcomes::{FixedOutcomes, SequenceOutcomes};
pub use repos::{InMemoryBetStore, InMemoryEventStore};
