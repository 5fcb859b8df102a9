//! Service layer: business logic orchestration.
//!
//! [`EventService`] enforces event invariants atop the event store;
//! [`BetService`] validates new bets against the remote feed and drives
//! settlement before every history read.

pub mod bet_service;
pub mod event_service;

pub use bet_service::BetService;
pub use event_service::EventService;
