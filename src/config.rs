use std::env;

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub kafka: KafkaConfig,
    pub consumers: ConsumersConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    /// Value of the `source` envelope field stamped on every published event.
    pub source: String,
    pub publish_timeout_ms: u64,
    pub topics: TopicsConfig,
}

#[derive(Debug, Clone)]
pub struct TopicsConfig {
    pub personal: String,
    pub position: String,
    pub history: String,
}

/// Per-topic consumer settings.
///
/// `commit_on_dlq` controls whether a dead-lettered message still advances
/// the offset. Personal and history consumers hold the offset so transient
/// outages get redelivered; the position consumer commits to avoid redelivery
/// storms on its high-volume topic.
#[derive(Debug, Clone)]
pub struct ConsumersConfig {
    pub group_personal: String,
    pub group_position: String,
    pub group_history: String,
    pub retry_interval_ms: u64,
    pub commit_on_dlq_personal: bool,
    pub commit_on_dlq_position: bool,
    pub commit_on_dlq_history: bool,
}

// Default value functions
fn default_app_env() -> String {
    "development".to_string()
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    8080
}

fn default_db_max_connections() -> u32 {
    20
}

fn default_kafka_source() -> String {
    "hr-events-service".to_string()
}

fn default_publish_timeout_ms() -> u64 {
    5000
}

fn default_retry_interval_ms() -> u64 {
    500
}

fn required(key: &str) -> Result<String> {
    env::var(key).map_err(|_| AppError::Config(format!("{} must be set", key)))
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn bool_or(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let app = AppConfig {
            env: env_or("APP_ENV", default_app_env()),
            host: env_or("APP_HOST", default_app_host()),
            port: parse_or("APP_PORT", default_app_port()),
        };

        let database = DatabaseConfig {
            url: required("DATABASE_URL")?,
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", default_db_max_connections()),
        };

        let kafka = KafkaConfig {
            brokers: required("KAFKA_BROKERS")?,
            source: env_or("KAFKA_EVENT_SOURCE", default_kafka_source()),
            publish_timeout_ms: parse_or("KAFKA_PUBLISH_TIMEOUT_MS", default_publish_timeout_ms()),
            topics: TopicsConfig {
                personal: env_or("KAFKA_TOPIC_PERSONAL", "hr.personal".to_string()),
                position: env_or("KAFKA_TOPIC_POSITIONS", "hr.positions".to_string()),
                history: env_or("KAFKA_TOPIC_HISTORY", "hr.history".to_string()),
            },
        };

        let consumers = ConsumersConfig {
            group_personal: env_or("KAFKA_GROUP_PERSONAL", "consumer_personal".to_string()),
            group_position: env_or("KAFKA_GROUP_POSITIONS", "consumer_positions".to_string()),
            group_history: env_or("KAFKA_GROUP_HISTORY", "consumer_history".to_string()),
            retry_interval_ms: parse_or("CONSUMER_RETRY_INTERVAL_MS", default_retry_interval_ms()),
            commit_on_dlq_personal: bool_or("COMMIT_ON_DLQ_PERSONAL", false),
            commit_on_dlq_position: bool_or("COMMIT_ON_DLQ_POSITIONS", true),
            commit_on_dlq_history: bool_or("COMMIT_ON_DLQ_HISTORY", false),
        };

        Ok(Config {
            app,
            database,
            kafka,
            consumers,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }
}
