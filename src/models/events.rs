use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw accepted event, one row per `message_id`. Existence of a row means
/// "already applied" — this table doubles as the idempotency ledger.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditEvent {
    pub id: i64,
    pub message_id: Uuid,
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAuditEvent {
    pub message_id: Uuid,
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Raw message body; guaranteed valid JSON by the time it is recorded.
    pub payload: String,
}

/// Rejected message with a human-readable reason. Append-only and not
/// deduplicated: a message rejected twice is recorded twice.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeadLetter {
    pub id: i64,
    pub topic: String,
    #[sqlx(rename = "msg_key")]
    pub key: String,
    pub payload: String,
    pub error: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDeadLetter {
    pub topic: String,
    pub key: String,
    pub payload: String,
    pub error: String,
}
