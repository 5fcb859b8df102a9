//! PostgreSQL implementation of the event store.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::EventRepository;
use crate::domain::{Event, EventDraft, EventPatch, EventState, OutcomeSource};
use crate::error::BetlineError;

/// Row shape shared by every event query.
type EventRow = (i64, String, Decimal, DateTime<Utc>, String);

fn row_to_event(row: EventRow) -> Result<Event, BetlineError> {
    let (id, event_id, coefficient, deadline, state) = row;
    Ok(Event {
        id,
        event_id,
        coefficient,
        deadline,
        state: EventState::from_str(&state)?,
    })
}

/// PostgreSQL-backed event store using `sqlx::PgPool`.
///
/// Holds the [`OutcomeSource`] used by lazy resolution; production wiring
/// injects [`RandomOutcomes`](crate::domain::RandomOutcomes), tests inject a
/// deterministic source.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
    outcomes: Arc<dyn OutcomeSource>,
}

impl PgEventStore {
    /// Creates a new event store with the given connection pool and outcome
    /// source.
    #[must_use]
    pub fn new(pool: PgPool, outcomes: Arc<dyn OutcomeSource>) -> Self {
        Self { pool, outcomes }
    }
}

#[async_trait]
impl EventRepository for PgEventStore {
    async fn active(&self, now: DateTime<Utc>) -> Result<Vec<Event>, BetlineError> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT id, event_id, coefficient, deadline, state FROM events WHERE deadline > $1",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;

        rows.into_iter().map(row_to_event).collect()
    }

    async fn find(&self, event_id: &str) -> Result<Option<Event>, BetlineError> {
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT id, event_id, coefficient, deadline, state FROM events WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;

        row.map(row_to_event).transpose()
    }

    async fn past(&self, now: DateTime<Utc>) -> Result<Vec<Event>, BetlineError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;

        // Lock the unresolved past-deadline rows so concurrent readers of
        // the same batch serialize behind this transaction.
        let pending = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM events WHERE state = 'NEW' AND deadline < $1 FOR UPDATE",
        )
        .bind(now)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;

        let resolved = pending.len();
        for (id,) in pending {
            let state = EventState::from(self.outcomes.draw());
            sqlx::query("UPDATE events SET state = $2 WHERE id = $1")
                .bind(id)
                .bind(state.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;
        }

        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT id, event_id, coefficient, deadline, state FROM events \
             WHERE deadline < $1 ORDER BY deadline DESC",
        )
        .bind(now)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;

        if resolved > 0 {
            tracing::info!(resolved, "resolved past-deadline events");
        }

        rows.into_iter().map(row_to_event).collect()
    }

    async fn insert(&self, draft: EventDraft) -> Result<Event, BetlineError> {
        let row = sqlx::query_as::<_, EventRow>(
            "INSERT INTO events (event_id, coefficient, deadline, state) \
             VALUES ($1, $2, $3, 'NEW') \
             RETURNING id, event_id, coefficient, deadline, state",
        )
        .bind(&draft.event_id)
        .bind(draft.coefficient)
        .bind(draft.deadline)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|d| d.is_unique_violation())
            {
                BetlineError::DuplicateEvent(draft.event_id.clone())
            } else {
                BetlineError::PersistenceError(e.to_string())
            }
        })?;

        row_to_event(row)
    }

    async fn update(
        &self,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<Option<Event>, BetlineError> {
        let row = sqlx::query_as::<_, EventRow>(
            "UPDATE events SET \
                 coefficient = COALESCE($2, coefficient), \
                 deadline = COALESCE($3, deadline) \
             WHERE event_id = $1 \
             RETURNING id, event_id, coefficient, deadline, state",
        )
        .bind(event_id)
        .bind(patch.coefficient)
        .bind(patch.deadline)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;

        row.map(row_to_event).transpose()
    }

    async fn delete(&self, event_id: &str) -> Result<(), BetlineError> {
        let result = sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(|e| BetlineError::PersistenceError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(BetlineError::EventNotFound(event_id.to_string()));
        }
        Ok(())
    }
}
