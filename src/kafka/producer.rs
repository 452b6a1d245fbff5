//! Publisher for the three HR event topics.
//!
//! Records are keyed by `employee_id`, so all events for one employee land in
//! the same partition and are observed in publish order by the consumers.
//! This is what makes the dependency gating (position requires personal)
//! workable: per-message keys would only give per-message ordering.

use std::time::Duration;

use chrono::Utc;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use serde::Serialize;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::KafkaConfig;
use crate::error::{AppError, Result};
use crate::kafka::codec;
use crate::models::{Envelope, EventKind, HistoryPayload, PersonalPayload, PositionPayload};

pub struct HrEventPublisher {
    producer: FutureProducer,
    topic_personal: String,
    topic_position: String,
    topic_history: String,
    source: String,
    timeout: Duration,
}

impl HrEventPublisher {
    /// Create the publisher with broker-level duplicate suppression:
    /// `enable.idempotence` + `acks=all` with bounded retries and a fixed
    /// retry backoff. Transport-level dedup only covers producer retries;
    /// the consumer-side idempotency ledger is the real guarantee.
    pub fn new(cfg: &KafkaConfig) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &cfg.brokers)
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("max.in.flight.requests.per.connection", "5")
            .set("retries", "5")
            .set("retry.backoff.ms", "250")
            .set("message.timeout.ms", cfg.publish_timeout_ms.to_string())
            .set("queue.buffering.max.messages", "100000")
            .create()?;

        Ok(Self {
            producer,
            topic_personal: cfg.topics.personal.clone(),
            topic_position: cfg.topics.position.clone(),
            topic_history: cfg.topics.history.clone(),
            source: cfg.source.clone(),
            timeout: Duration::from_millis(cfg.publish_timeout_ms),
        })
    }

    pub async fn publish_personal(
        &self,
        message_id: Uuid,
        payload: PersonalPayload,
    ) -> Result<()> {
        let employee_id = payload.employee_id.clone();
        self.publish(EventKind::Personal, message_id, &employee_id, payload)
            .await
    }

    pub async fn publish_position(
        &self,
        message_id: Uuid,
        payload: PositionPayload,
    ) -> Result<()> {
        let employee_id = payload.employee_id.clone();
        self.publish(EventKind::Position, message_id, &employee_id, payload)
            .await
    }

    pub async fn publish_history(&self, message_id: Uuid, payload: HistoryPayload) -> Result<()> {
        let employee_id = payload.employee_id.clone();
        self.publish(EventKind::History, message_id, &employee_id, payload)
            .await
    }

    /// Build the envelope and append it to the kind's topic. Exactly one
    /// broker append per successful call.
    async fn publish<T: Serialize>(
        &self,
        kind: EventKind,
        message_id: Uuid,
        employee_id: &str,
        payload: T,
    ) -> Result<()> {
        let envelope = Envelope {
            kind,
            message_id: message_id.to_string(),
            employee_id: employee_id.to_string(),
            payload,
            timestamp: Utc::now(),
            source: self.source.clone(),
        };

        let (body, headers) = codec::encode(&envelope)?;
        let topic = self.topic_for(kind);

        let record = FutureRecord::to(topic)
            .key(employee_id)
            .payload(&body)
            .headers(headers);

        match timeout(self.timeout, self.producer.send(record, self.timeout)).await {
            Ok(Ok((partition, offset))) => {
                info!(
                    topic = topic,
                    key = employee_id,
                    message_id = %message_id,
                    partition = partition,
                    offset = offset,
                    bytes = body.len(),
                    "event published"
                );
                Ok(())
            }
            Ok(Err((e, _))) => Err(AppError::Kafka(e)),
            Err(_) => {
                warn!(topic = topic, key = employee_id, "kafka publish timed out");
                Err(AppError::Internal("kafka publish timeout".into()))
            }
        }
    }

    fn topic_for(&self, kind: EventKind) -> &str {
        match kind {
            EventKind::Personal => &self.topic_personal,
            EventKind::Position => &self.topic_position,
            EventKind::History => &self.topic_history,
        }
    }
}
