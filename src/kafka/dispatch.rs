//! Per-message dispatch contract between the consumer runner and the three
//! kind processors.
//!
//! A processor receives one delivered message and returns a single boolean:
//! may the offset be committed. The runner is the only place offsets are
//! actually marked, so every failure path reduces to that one decision.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Envelope, EventKind};

/// Borrowed view of one message as delivered by the broker.
#[derive(Debug, Clone, Copy)]
pub struct DeliveredMessage<'a> {
    pub topic: &'a str,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<&'a [u8]>,
    pub payload: &'a [u8],
}

impl DeliveredMessage<'_> {
    pub fn key_str(&self) -> String {
        String::from_utf8_lossy(self.key.unwrap_or_default()).into_owned()
    }

    pub fn payload_str(&self) -> String {
        String::from_utf8_lossy(self.payload).into_owned()
    }
}

/// One statically-typed processor per event kind.
///
/// Within a partition the runner calls `process` for one message at a time,
/// in offset order; implementations must not assume anything about ordering
/// across partitions or topics.
#[async_trait]
pub trait KindProcessor: Send + Sync {
    fn kind(&self) -> EventKind;

    /// Process one delivered message. Returns the commit decision.
    async fn process(&self, msg: &DeliveredMessage<'_>) -> bool;
}

/// Structural check shared by all processors: the envelope must carry a real
/// (non-nil) UUID message_id and a non-empty employee_id, and its kind must
/// match the topic the message was read from.
pub fn structural_check<T>(
    envelope: &Envelope<T>,
    expected_kind: EventKind,
) -> Result<Uuid, String> {
    if envelope.kind != expected_kind {
        return Err(format!(
            "event kind {} does not match expected kind {} for this topic",
            envelope.kind, expected_kind
        ));
    }

    let message_id = Uuid::parse_str(envelope.message_id.trim()).map_err(|_| {
        format!(
            "missing_required_field: message_id {:?} is not a valid UUID",
            envelope.message_id
        )
    })?;

    if message_id.is_nil() {
        return Err("missing_required_field: message_id is nil".to_string());
    }

    if envelope.employee_id.trim().is_empty() {
        return Err("missing_required_field: employee_id is empty".to_string());
    }

    Ok(message_id)
}
