//! Bet model, settlement status, and amount validation.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::event::EventState;
use crate::error::BetlineError;

/// Settlement status of a bet.
///
/// Mirrors the resolved state of the referenced event once that state has
/// been observed through the remote feed. Moves away from `NEW` at most
/// once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BetStatus {
    /// Pending; the referenced event has not been observed finished yet.
    New,
    /// The referenced event finished as a win.
    FinishedWin,
    /// The referenced event finished as a loss.
    FinishedLose,
}

impl BetStatus {
    /// Maps an observed event state to the settled bet status.
    ///
    /// Returns `None` while the event is still unresolved. Any terminal
    /// state other than the winning one settles as a loss.
    #[must_use]
    pub const fn settled_from(state: EventState) -> Option<Self> {
        match state {
            EventState::New => None,
            EventState::FinishedWin => Some(Self::FinishedWin),
            EventState::FinishedLose => Some(Self::FinishedLose),
        }
    }

    /// Database/wire representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::FinishedWin => "FINISHED_WIN",
            Self::FinishedLose => "FINISHED_LOSE",
        }
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetStatus {
    type Err = BetlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "FINISHED_WIN" => Ok(Self::FinishedWin),
            "FINISHED_LOSE" => Ok(Self::FinishedLose),
            other => Err(BetlineError::PersistenceError(format!(
                "unknown bet status: {other}"
            ))),
        }
    }
}

/// A stored bet.
#[derive(Debug, Clone, PartialEq)]
pub struct Bet {
    /// Surrogate key owned by the store.
    pub id: i64,
    /// External unique identifier, immutable.
    pub bet_id: String,
    /// Business key of the referenced event. Validated against the remote
    /// feed at creation time; not a database relation.
    pub event_id: String,
    /// Wagered amount. Strictly positive, at most two fractional digits,
    /// stored with its scale preserved.
    pub amount: Decimal,
    /// Current settlement status.
    pub status: BetStatus,
}

/// Fields required to insert a new bet. New bets always start as
/// [`BetStatus::New`].
#[derive(Debug, Clone)]
pub struct BetDraft {
    /// External unique identifier.
    pub bet_id: String,
    /// Business key of the referenced event.
    pub event_id: String,
    /// Wagered amount.
    pub amount: Decimal,
}

/// Validates a wager amount: strictly positive with at most two fractional
/// digits. `10.00` passes and keeps its scale; `10.005` is rejected.
///
/// # Errors
///
/// Returns [`BetlineError::InvalidRequest`] when the amount is not positive
/// or carries more than two fractional digits.
pub fn validate_amount(amount: Decimal) -> Result<(), BetlineError> {
    if amount <= Decimal::ZERO {
        return Err(BetlineError::InvalidRequest(
            "amount must be strictly positive".to_string(),
        ));
    }
    let truncated = amount.round_dp_with_strategy(2, RoundingStrategy::ToZero);
    if truncated != amount {
        return Err(BetlineError::InvalidRequest(
            "amount must have at most two fractional digits".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn settles_win_and_lose() {
        assert_eq!(
            BetStatus::settled_from(EventState::FinishedWin),
            Some(BetStatus::FinishedWin)
        );
        assert_eq!(
            BetStatus::settled_from(EventState::FinishedLose),
            Some(BetStatus::FinishedLose)
        );
    }

    #[test]
    fn unresolved_event_does_not_settle() {
        assert_eq!(BetStatus::settled_from(EventState::New), None);
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            BetStatus::New,
            BetStatus::FinishedWin,
            BetStatus::FinishedLose,
        ] {
            let parsed: BetStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn two_fractional_digits_accepted() {
        assert!(validate_amount(dec!(10.00)).is_ok());
        assert!(validate_amount(dec!(0.01)).is_ok());
        assert!(validate_amount(dec!(100)).is_ok());
    }

    #[test]
    fn three_fractional_digits_rejected() {
        assert!(validate_amount(dec!(10.005)).is_err());
        assert!(validate_amount(dec!(0.001)).is_err());
    }

    #[test]
    fn non_positive_amounts_rejected() {
        assert!(validate_amount(Decimal::ZERO).is_err());
        assert!(validate_amount(dec!(-5.00)).is_err());
    }

    #[test]
    fn trailing_zeroes_keep_their_scale() {
        // 10.00 is valid and equal to itself at scale 2; the store keeps the
        // scale as supplied.
        let amount = dec!(10.00);
        assert!(validate_amount(amount).is_ok());
        assert_eq!(amount.to_string(), "10.00");
    }
}
