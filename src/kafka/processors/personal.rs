use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{EventLedger, ProfileStore};
use crate::kafka::codec;
use crate::kafka::dispatch::{structural_check, DeliveredMessage, KindProcessor};
use crate::kafka::processors::{Gate, ProcessorCore};
use crate::kafka::validation::ValidationRules;
use crate::models::{Envelope, EventKind, PersonalFields, PersonalPayload};

/// Applies personal-facts events to the profile aggregate.
pub struct PersonalProcessor {
    core: ProcessorCore,
    profiles: Arc<dyn ProfileStore>,
    rules: Arc<ValidationRules>,
}

impl PersonalProcessor {
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
impl KindProcessor for PersonalProcessor {
    fn kind(&self) -> EventKind {
        EventKind::Personal
    }

    async fn process(&self, msg: &DeliveredMessage<'_>) -> bool {
        let envelope: Envelope<PersonalPayload> = match codec::decode(msg.payload) {
            Ok(envelope) => envelope,
            Err(e) => return self.core.dead_letter(msg, &format!("invalid_json: {e}")).await,
        };

        let message_id = match structural_check(&envelope, EventKind::Personal) {
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

        if let Err(reason) = self.rules.validate_personal(&envelope.payload) {
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
        let fields = PersonalFields {
            first_name: payload.first_name,
            last_name: payload.last_name,
            birth_date: payload.birth_date,
            email: payload.contacts.email,
            phone: payload.contacts.phone,
        };

        if let Err(e) = self
            .profiles
            .upsert_personal_fields(&envelope.employee_id, fields)
            .await
        {
            self.core.log_transient(msg, "personal fields upsert failed", &e);
            return false;
        }

        true
    }
}
