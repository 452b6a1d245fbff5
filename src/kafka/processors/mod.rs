//! Kind processors: validate, deduplicate, persist the audit record and apply
//! the domain effect for one event kind each.
//!
//! All three share the same protocol shape (decode, structural check,
//! idempotency, dependency, validation, audit, effect); the shared steps live
//! in [`ProcessorCore`], the per-kind effect in each processor.

mod history;
mod personal;
mod position;

pub use history::HistoryProcessor;
pub use personal::PersonalProcessor;
pub use position::PositionProcessor;

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::EventLedger;
use crate::error::AppError;
use crate::kafka::dispatch::DeliveredMessage;
use crate::models::{NewAuditEvent, NewDeadLetter};

/// Outcome of the shared idempotency/audit steps.
pub(crate) enum Gate {
    /// Proceed with the domain effect.
    Fresh,
    /// Already applied; skip silently and commit.
    Duplicate,
    /// Store unavailable; hold the offset for redelivery.
    Transient,
}

/// Shared plumbing injected into every kind processor.
pub struct ProcessorCore {
    ledger: Arc<dyn EventLedger>,
    commit_on_dlq: bool,
}

impl ProcessorCore {
    pub fn new(ledger: Arc<dyn EventLedger>, commit_on_dlq: bool) -> Self {
        Self {
            ledger,
            commit_on_dlq,
        }
    }

    /// Record the message in the dead-letter sink and return the configured
    /// commit decision for permanent failures. The DLQ write itself is
    /// best-effort: losing a diagnostic row must not wedge the partition.
    pub(crate) async fn dead_letter(&self, msg: &DeliveredMessage<'_>, reason: &str) -> bool {
        if let Err(e) = self
            .ledger
            .insert_dead_letter(NewDeadLetter {
                topic: msg.topic.to_string(),
                key: msg.key_str(),
                payload: msg.payload_str(),
                error: reason.to_string(),
            })
            .await
        {
            error!(error = %e, topic = msg.topic, "failed to write dead-letter record");
        }

        warn!(
            topic = msg.topic,
            partition = msg.partition,
            offset = msg.offset,
            reason = reason,
            "message sent to dead-letter sink"
        );

        self.commit_on_dlq
    }

    /// Idempotency check against the audit ledger.
    pub(crate) async fn idempotency_gate(
        &self,
        msg: &DeliveredMessage<'_>,
        message_id: Uuid,
        employee_id: &str,
    ) -> Gate {
        match self.ledger.exists_message(message_id).await {
            Ok(true) => {
                info!(
                    message_id = %message_id,
                    employee_id = employee_id,
                    "duplicate message, skipping (idempotency)"
                );
                Gate::Duplicate
            }
            Ok(false) => Gate::Fresh,
            Err(e) => {
                self.log_transient(msg, "idempotency lookup failed", &e);
                Gate::Transient
            }
        }
    }

    /// Persist the raw event before the effect is applied, so a crash between
    /// the two causes at most a missed effect, never a duplicate one.
    pub(crate) async fn record_audit(
        &self,
        msg: &DeliveredMessage<'_>,
        message_id: Uuid,
        employee_id: &str,
    ) -> Gate {
        let event = NewAuditEvent {
            message_id,
            topic: msg.topic.to_string(),
            partition: msg.partition,
            offset: msg.offset,
            payload: msg.payload_str(),
        };

        match self.ledger.insert_audit(event).await {
            Ok(true) => Gate::Fresh,
            Ok(false) => {
                // Lost the unique-key race to a concurrent worker.
                info!(
                    message_id = %message_id,
                    employee_id = employee_id,
                    "duplicate message, skipping (audit insert race)"
                );
                Gate::Duplicate
            }
            Err(e) => {
                self.log_transient(msg, "audit insert failed", &e);
                Gate::Transient
            }
        }
    }

    /// Transient store failures are logged and never dead-lettered: the
    /// message is redeliverable, so the offset is held instead.
    pub(crate) fn log_transient(&self, msg: &DeliveredMessage<'_>, what: &str, err: &AppError) {
        error!(
            error = %err,
            topic = msg.topic,
            partition = msg.partition,
            offset = msg.offset,
            "{}, holding offset for redelivery",
            what
        );
    }
}
