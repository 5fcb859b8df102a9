//! Pluggable outcome selection for event resolution.
//!
//! There is no real-world oracle behind events; resolution draws a uniform
//! random outcome. The draw sits behind [`OutcomeSource`] so stores take a
//! deterministic source in tests.

use std::fmt;

use rand::Rng;

use super::event::EventState;

/// Terminal outcome of a resolved event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The event finished as a win.
    Win,
    /// The event finished as a loss.
    Lose,
}

impl From<Outcome> for EventState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win => Self::FinishedWin,
            Outcome::Lose => Self::FinishedLose,
        }
    }
}

/// Source of resolution outcomes.
///
/// Each call draws one outcome, independently per event being resolved.
pub trait OutcomeSource: Send + Sync + fmt::Debug {
    /// Draws the outcome for a single event.
    fn draw(&self) -> Outcome;
}

/// Production outcome source: a fair coin flip per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOutcomes;

impl OutcomeSource for RandomOutcomes {
    fn draw(&self) -> Outcome {
        if rand::thread_rng().gen_bool(0.5) {
            Outcome::Win
        } else {
            Outcome::Lose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_draws_are_terminal() {
        let source = RandomOutcomes;
        for _ in 0..32 {
            let state = EventState::from(source.draw());
            assert!(state.is_terminal());
        }
    }

    #[test]
    fn outcome_maps_to_matching_state() {
        assert_eq!(EventState::from(Outcome::Win), EventState::FinishedWin);
        assert_eq!(EventState::from(Outcome::Lose), EventState::FinishedLose);
    }
}
