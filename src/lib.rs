//! Event-driven HR data pipeline.
//!
//! Three Kafka topics carry employee events (personal facts, position
//! changes, employment history); one consumer group per topic applies them
//! to PostgreSQL aggregates with an idempotency ledger for exactly-once
//! effect, and a dead-letter table for everything permanently rejected.
//! A small HTTP API publishes events and exposes the read side.

pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod kafka;
pub mod models;
pub mod routes;

pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, Result};
