//! Request and response DTOs for the REST surfaces.

pub mod bet_dto;
pub mod event_dto;

pub use bet_dto::{BetDto, CreateBetRequest};
pub use event_dto::{CreateEventRequest, EventDto, UpdateEventRequest};
