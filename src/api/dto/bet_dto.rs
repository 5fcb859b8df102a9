//! Bet-related DTOs for the bet maker surface.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Bet, BetStatus};

/// Request body for `POST /bets`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBetRequest {
    /// External unique identifier of the bet.
    pub bet_id: String,
    /// Business key of the event the bet references.
    pub event_id: String,
    /// Wagered amount; strictly positive, at most two fractional digits.
    pub amount: Decimal,
}

/// A bet as served by the bet maker.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BetDto {
    /// Surrogate key.
    pub id: i64,
    /// External unique identifier.
    pub bet_id: String,
    /// Business key of the referenced event.
    pub event_id: String,
    /// Wagered amount, scale preserved as supplied.
    pub amount: Decimal,
    /// Settlement status.
    pub status: BetStatus,
}

impl From<Bet> for BetDto {
    fn from(bet: Bet) -> Self {
        Self {
            id: bet.id,
            bet_id: bet.bet_id,
            event_id: bet.event_id,
            amount: bet.amount,
            status: bet.status,
        }
    }
}
