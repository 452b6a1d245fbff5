//! Audit ledger and dead-letter sink backed by PostgreSQL.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AuditEvent, DeadLetter, NewAuditEvent, NewDeadLetter};

/// Durable record of accepted and rejected messages.
///
/// `exists_message` + `insert_audit` together implement the idempotency
/// protocol: uniqueness of `message_id` on the store side is the only
/// concurrency control, no application-level locking.
#[async_trait]
pub trait EventLedger: Send + Sync {
    async fn exists_message(&self, message_id: Uuid) -> Result<bool>;

    /// Insert the raw accepted event. Returns `false` when a concurrent
    /// worker already recorded this `message_id` (unique-key race).
    async fn insert_audit(&self, event: NewAuditEvent) -> Result<bool>;

    async fn insert_dead_letter(&self, dead_letter: NewDeadLetter) -> Result<()>;

    async fn list_audit(&self, limit: i64, offset: i64) -> Result<Vec<AuditEvent>>;

    async fn list_dead_letters(&self, limit: i64, offset: i64) -> Result<Vec<DeadLetter>>;

    /// Truncate all pipeline tables. The only deletion path the ledger allows.
    async fn reset_all(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct PgEventLedger {
    pool: PgPool,
}

impl PgEventLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventLedger for PgEventLedger {
    async fn exists_message(&self, message_id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM kafka_events WHERE message_id = $1
            ) AS "exists"
            "#,
        )
        .bind(message_id)
        .fetch_one(&self.pool)
        .await?;

        let exists: bool = row.try_get("exists")?;
        if exists {
            debug!(message_id = %message_id, "message already recorded in audit ledger");
        }
        Ok(exists)
    }

    async fn insert_audit(&self, event: NewAuditEvent) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO kafka_events (message_id, topic, "partition", "offset", payload, received_at)
            VALUES ($1, $2, $3, $4, $5::jsonb, NOW())
            ON CONFLICT (message_id) DO NOTHING
            "#,
        )
        .bind(event.message_id)
        .bind(&event.topic)
        .bind(event.partition)
        .bind(event.offset)
        .bind(&event.payload)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_dead_letter(&self, dead_letter: NewDeadLetter) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kafka_dlq (topic, msg_key, payload, error, received_at)
            VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(&dead_letter.topic)
        .bind(&dead_letter.key)
        .bind(&dead_letter.payload)
        .bind(&dead_letter.error)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_audit(&self, limit: i64, offset: i64) -> Result<Vec<AuditEvent>> {
        let events = sqlx::query_as::<_, AuditEvent>(
            r#"
            SELECT id, message_id, topic, "partition", "offset", payload, received_at
            FROM kafka_events
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn list_dead_letters(&self, limit: i64, offset: i64) -> Result<Vec<DeadLetter>> {
        let dead_letters = sqlx::query_as::<_, DeadLetter>(
            r#"
            SELECT id, topic, msg_key, payload, error, received_at
            FROM kafka_dlq
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(dead_letters)
    }

    async fn reset_all(&self) -> Result<()> {
        sqlx::query(
            r#"
            TRUNCATE kafka_events, kafka_dlq, employment_history, employee_profile
            RESTART IDENTITY CASCADE
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
