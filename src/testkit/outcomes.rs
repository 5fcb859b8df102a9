//! Deterministic outcome sources for resolution tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::{Outcome, OutcomeSource};

/// Always draws the same outcome.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcomes(pub Outcome);

impl OutcomeSource for FixedOutcomes {
    fn draw(&self) -> Outcome {
        self.0
    }
}

/// Draws a scripted sequence of outcomes, then keeps returning the last one
/// once the script is exhausted.
#[derive(Debug)]
pub struct SequenceOutcomes {
    script: Mutex<VecDeque<Outcome>>,
    last: Mutex<Outcome>,
}

impl SequenceOutcomes {
    /// Creates a source that replays `script` in order.
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Outcome>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(Outcome::Lose),
        }
    }
}

impl OutcomeSource for SequenceOutcomes {
    fn draw(&self) -> Outcome {
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match (next, self.last.lock()) {
            (Some(outcome), Ok(mut last)) => {
                *last = outcome;
                outcome
            }
            (Some(outcome), Err(_)) => outcome,
            (None, Ok(last)) => *last,
            (None, Err(_)) => Outcome::Lose,
        }
    }
}
