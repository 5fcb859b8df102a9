//! Domain layer: events, bets, and outcome selection.
//!
//! This module contains the domain model shared by both services: events
//! with their resolution lifecycle, bets with their settlement status, and
//! the pluggable outcome source used by lazy event resolution.

pub mod bet;
pub mod event;
pub mod outcome;

pub use bet::{Bet, BetDraft, BetStatus};
pub use event::{Event, EventDraft, EventPatch, EventState};
pub use outcome::{Outcome, OutcomeSource, RandomOutcomes};
