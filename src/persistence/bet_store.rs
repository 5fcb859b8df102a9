//! PostgreSQL implementation of the bet store.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::BetRepository;
use crate::domain::{Bet, BetDraft, BetStatus, EventState};
use crate::error::BetlineError;

/// Row shape shared by every bet query.
type BetRow = (i64, String, String, Decimal, String);

fn row_to_bet(row: BetRow) -> Result<Bet, BetlineError> {
    let (id, bet_id, event_id, amount, status) = row;
    Ok(Bet {
        id,
        bet_id,
        event_id,
        amount,
        status: BetStatus::from_str(&status)?,
    })
}

/// PostgreSQL-backed bet store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PgBetStore {
    pool: PgPool,
}

impl PgBetStore {
    /// Creates a new bet store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BetRepository for PgBetStore {
    async fn list(&self) -> Result<Vec<Bet>, BetlineError> {
        let rows = sqlx::query_as::<_, BetRow>(
            "SELECT id, bet_id, event_id, amount, status FROM bets ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;

        rows.into_iter().map(row_to_bet).collect()
    }

    async fn find_by_event_id(&self, event_id: &str) -> Result<Option<Bet>, BetlineError> {
        let row = sqlx::query_as::<_, BetRow>(
            "SELECT id, bet_id, event_id, amount, status FROM bets WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;

        row.map(row_to_bet).transpose()
    }

    async fn insert(&self, draft: BetDraft) -> Result<Bet, BetlineError> {
        let row = sqlx::query_as::<_, BetRow>(
            "INSERT INTO bets (bet_id, event_id, amount, status) \
             VALUES ($1, $2, $3, 'NEW') \
             RETURNING id, bet_id, event_id, amount, status",
        )
        .bind(&draft.bet_id)
        .bind(&draft.event_id)
        .bind(draft.amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let unique = e
                .as_database_error()
                .is_some_and(|d| d.is_unique_violation());
            if unique {
                let on_event = e
                    .as_database_error()
                    .and_then(|d| d.constraint())
                    .is_some_and(|c| c.contains("event_id"));
                if on_event {
                    BetlineError::DuplicateBet(format!(
                        "event {} already has a bet",
                        draft.event_id
                    ))
                } else {
                    BetlineError::DuplicateBet(format!("bet_id {} already exists", draft.bet_id))
                }
            } else {
                BetlineError::PersistenceError(e.to_string())
            }
        })?;

        row_to_bet(row)
    }

    async fn reconcile(
        &self,
        resolved: &HashMap<String, EventState>,
    ) -> Result<u64, BetlineError> {
        let mut winners: Vec<String> = Vec::new();
        let mut losers: Vec<String> = Vec::new();
        for (event_id, state) in resolved {
            match state {
                EventState::FinishedWin => winners.push(event_id.clone()),
                EventState::FinishedLose => losers.push(event_id.clone()),
                // A NEW entry carries no settlement information.
                EventState::New => {}
            }
        }

        if winners.is_empty() && losers.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;

        let mut settled = 0;
        if !winners.is_empty() {
            let result = sqlx::query(
                "UPDATE bets SET status = 'FINISHED_WIN' \
                 WHERE status = 'NEW' AND event_id = ANY($1)",
            )
            .bind(&winners)
            .execute(&mut *tx)
            .await
            .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;
            settled += result.rows_affected();
        }
        if !losers.is_empty() {
            let result = sqlx::query(
                "UPDATE bets SET status = 'FINISHED_LOSE' \
                 WHERE status = 'NEW' AND event_id = ANY($1)",
            )
            .bind(&losers)
            .execute(&mut *tx)
            .await
            .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;
            settled += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;

        if settled > 0 {
            tracing::info!(settled, "settled pending bets");
        }
        Ok(settled)
    }
}
