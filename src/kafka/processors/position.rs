use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{EventLedger, ProfileStore};
use crate::kafka::codec;
use crate::kafka::dispatch::{structural_check, DeliveredMessage, KindProcessor};
use crate::kafka::processors::{Gate, ProcessorCore};
use crate::kafka::validation::ValidationRules;
use crate::models::{Envelope, EventKind, PositionFields, PositionPayload};

/// Applies position events to the profile aggregate.
///
/// Position events require the employee profile to already exist: a position
/// for an unknown employee is dead-lettered until the corresponding personal
/// event has been processed.
pub struct PositionProcessor {
    core: ProcessorCore,
    profiles: Arc<dyn ProfileStore>,
    rules: Arc<ValidationRules>,
}

impl PositionProcessor {
    pub fn new(
        ledger: Arc<dyn EventLedger>,
        profiles: Arc<dyn ProfileStore>,
        rules: Arc<ValidationRules>,
        commit_on_dlq: bool,
    ) -> Self {
        Self {
            core: ProcessorCore::new(ledger, commit_on_dlq),
            profiles,
            rules,
        }
    }
}

#[async_trait]
impl KindProcessor for PositionProcessor {
    fn kind(&self) -> EventKind {
        EventKind::Position
    }

    async fn process(&self, msg: &DeliveredMessage<'_>) -> bool {
        let envelope: Envelope<PositionPayload> = match codec::decode(msg.payload) {
            Ok(envelope) => envelope,
            Err(e) => return self.core.dead_letter(msg, &format!("invalid_json: {e}")).await,
        };

        let message_id = match structural_check(&envelope, EventKind::Position) {
            Ok(id) => id,
            Err(reason) => return self.core.dead_letter(msg, &reason).await,
        };

        match self
            .core
            .idempotency_gate(msg, message_id, &envelope.employee_id)
            .await
        {
            Gate::Fresh => {}
            Gate::Duplicate => return true,
            Gate::Transient => return false,
        }

        match self.profiles.get(&envelope.employee_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                let reason = format!(
                    "employee_id={} not found: create employee profile first",
                    envelope.employee_id
                );
                return self.core.dead_letter(msg, &reason).await;
            }
            Err(e) => {
                self.core.log_transient(msg, "profile dependency lookup failed", &e);
                return false;
            }
        }

        if let Err(reason) = self.rules.validate_position(&envelope.payload) {
            return self.core.dead_letter(msg, &reason).await;
        }

        match self
            .core
            .record_audit(msg, message_id, &envelope.employee_id)
            .await
        {
            Gate::Fresh => {}
            Gate::Duplicate => return true,
            Gate::Transient => return false,
        }

        let payload = envelope.payload;
        let fields = PositionFields {
            title: payload.title,
            department: payload.department,
            grade: payload.grade,
            effective_from: payload.effective_from,
        };

        if let Err(e) = self
            .profiles
            .upsert_position_fields(&envelope.employee_id, fields)
            .await
        {
            self.core.log_transient(msg, "position fields upsert failed", &e);
            return false;
        }

        true
    }
}
