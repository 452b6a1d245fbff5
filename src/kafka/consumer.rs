//! Consumer-group runner: one per topic.
//!
//! The runner owns the group session and processes messages strictly one at a
//! time, in delivery order; offsets are committed only when the processor's
//! decision allows it, and this module is the only place offsets are marked.
//! Any non-shutdown session error is logged and the join is retried after a
//! fixed interval.

use std::sync::Arc;
use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::kafka::dispatch::{DeliveredMessage, KindProcessor};

#[derive(Debug, Clone)]
pub struct ConsumerRunnerConfig {
    pub brokers: String,
    pub group_id: String,
    pub topic: String,
    pub retry_interval: Duration,
}

pub struct ConsumerRunner {
    config: ConsumerRunnerConfig,
    processor: Arc<dyn KindProcessor>,
}

impl ConsumerRunner {
    pub fn new(config: ConsumerRunnerConfig, processor: Arc<dyn KindProcessor>) -> Self {
        Self { config, processor }
    }

    /// Run until the shutdown channel flips to `true`. Shutdown is not an
    /// error; in-flight, not-yet-processed messages are never committed.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            topic = %self.config.topic,
            group = %self.config.group_id,
            kind = %self.processor.kind(),
            "consumer runner started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let consumer = match self.join() {
                Ok(consumer) => consumer,
                Err(e) => {
                    error!(
                        error = %e,
                        topic = %self.config.topic,
                        "failed to join consumer group, retrying"
                    );
                    if self.sleep_or_shutdown(&mut shutdown).await {
                        break;
                    }
                    continue;
                }
            };

            if self.consume(&consumer, &mut shutdown).await {
                break;
            }

            // Session error path: back off for the fixed interval, then rejoin.
            if self.sleep_or_shutdown(&mut shutdown).await {
                break;
            }
        }

        info!(topic = %self.config.topic, "consumer runner stopped");
        Ok(())
    }

    fn join(&self) -> Result<StreamConsumer> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &self.config.brokers)
            .set("group.id", &self.config.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("enable.partition.eof", "false")
            .set("session.timeout.ms", "30000")
            .set("heartbeat.interval.ms", "3000")
            .set("max.poll.interval.ms", "300000")
            .create()?;

        consumer.subscribe(&[&self.config.topic])?;

        Ok(consumer)
    }

    /// Poll-and-process loop for one group session. Returns `true` when the
    /// loop ended because of shutdown, `false` on a session error that should
    /// be retried with a fresh join.
    async fn consume(
        &self,
        consumer: &StreamConsumer,
        shutdown: &mut watch::Receiver<bool>,
    ) -> bool {
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!(topic = %self.config.topic, "shutdown signal received, stopping consumer");
                        return true;
                    }
                }
                message = consumer.recv() => {
                    match message {
                        Ok(msg) => {
                            let delivered = DeliveredMessage {
                                topic: msg.topic(),
                                partition: msg.partition(),
                                offset: msg.offset(),
                                key: msg.key(),
                                payload: msg.payload().unwrap_or_default(),
                            };

                            // Strictly sequential within the session: the
                            // idempotency-audit-effect sequence is not safe
                            // under partition-local reordering.
                            let commit = self.processor.process(&delivered).await;

                            if commit {
                                if let Err(e) = consumer.commit_message(&msg, CommitMode::Async) {
                                    warn!(
                                        error = %e,
                                        topic = delivered.topic,
                                        partition = delivered.partition,
                                        offset = delivered.offset,
                                        "failed to commit offset"
                                    );
                                }
                            } else {
                                debug!(
                                    topic = delivered.topic,
                                    partition = delivered.partition,
                                    offset = delivered.offset,
                                    "offset held, message will be redelivered"
                                );
                            }
                        }
                        Err(e) => {
                            error!(
                                error = %e,
                                topic = %self.config.topic,
                                "kafka consume error, rejoining group"
                            );
                            return false;
                        }
                    }
                }
            }
        }
    }

    /// Sleep for the retry interval, waking early on shutdown. Returns `true`
    /// when shutdown was signalled.
    async fn sleep_or_shutdown(&self, shutdown: &mut watch::Receiver<bool>) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(self.config.retry_interval) => false,
            _ = shutdown.changed() => *shutdown.borrow(),
        }
    }
}
