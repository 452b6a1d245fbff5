use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{EventLedger, HistoryStore, ProfileStore};
use crate::kafka::codec;
use crate::kafka::dispatch::{structural_check, DeliveredMessage, KindProcessor};
use crate::kafka::processors::{Gate, ProcessorCore};
use crate::kafka::validation::ValidationRules;
use crate::models::{Envelope, EventKind, HistoryPayload, NewEmploymentRecord};

/// Appends employment-history events to the history aggregate.
///
/// Like positions, history records are gated on an existing employee profile.
pub struct HistoryProcessor {
    core: ProcessorCore,
    profiles: Arc<dyn ProfileStore>,
    history: Arc<dyn HistoryStore>,
    rules: Arc<ValidationRules>,
}

impl HistoryProcessor {
    pub fn new(
        ledger: Arc<dyn EventLedger>,
        profiles: Arc<dyn ProfileStore>,
        history: Arc<dyn HistoryStore>,
        rules: Arc<ValidationRules>,
        commit_on_dlq: bool,
    ) -> Self {
        Self {
            core: ProcessorCore::new(ledger, commit_on_dlq),
            profiles,
            history,
            rules,
        }
    }
}

#[async_trait]
impl KindProcessor for HistoryProcessor {
    fn kind(&self) -> EventKind {
        EventKind::History
    }

    async fn process(&self, msg: &DeliveredMessage<'_>) -> bool {
        let envelope: Envelope<HistoryPayload> = match codec::decode(msg.payload) {
            Ok(envelope) => envelope,
            Err(e) => return self.core.dead_letter(msg, &format!("invalid_json: {e}")).await,
        };

        let message_id = match structural_check(&envelope, EventKind::History) {
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

        if let Err(reason) = self.rules.validate_history(&envelope.payload) {
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
        let record = NewEmploymentRecord {
            employee_id: envelope.employee_id.clone(),
            company: payload.company,
            position: payload.position,
            period_from: payload.period.from,
            period_to: payload.period.to,
            stack: payload.stack,
        };

        if let Err(e) = self.history.append(record).await {
            self.core.log_transient(msg, "history append failed", &e);
            return false;
        }

        true
    }
}
