//! # betline
//!
//! Event wagering split across two cooperating services: the **line
//! provider** owns events (creation, lifecycle, lazy randomized
//! resolution), the **bet maker** owns bets and reconciles them against
//! resolved events fetched over the network.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── line-provider                 ├── bet-maker
//!     │     REST Handlers (api/)       │     REST Handlers (api/)
//!     │     EventService (service/)    │     BetService (service/)
//!     │     PgEventStore (persistence/)│     PgBetStore (persistence/)
//!     │     PostgreSQL (events)        │     PostgreSQL (bets)
//!     │                                │     HttpLineFeed (feed/) ──► line-provider
//! ```
//!
//! Events resolve exactly once, lazily, on the first past-events read after
//! their deadline. Bets settle lazily on every history read by reconciling
//! pending bets against the line provider's resolved-event snapshot; there
//! is no background settlement job.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod persistence;
pub mod service;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
