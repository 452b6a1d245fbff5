//! Ingestion endpoints: accept an event, append it to Kafka, return 202.
//!
//! The HTTP layer does not run business validation; that is the consumers'
//! job, and a rejected event must leave a dead-letter trace rather than a
//! 4xx nobody records. Only structurally unusable requests (no employee_id)
//! are refused here, because they cannot even be partitioned.

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::models::{HistoryPayload, PersonalPayload, PositionPayload};

#[derive(Debug, Deserialize)]
pub struct PublishRequest<T> {
    /// Caller-supplied idempotency key; generated when absent.
    #[serde(default)]
    pub message_id: Option<Uuid>,
    #[serde(flatten)]
    pub payload: T,
}

#[derive(Debug, Serialize)]
struct PublishResponse {
    message_id: Uuid,
    status: &'static str,
}

fn accepted(message_id: Uuid) -> HttpResponse {
    HttpResponse::Accepted().json(PublishResponse {
        message_id,
        status: "accepted",
    })
}

fn require_employee_id(employee_id: &str) -> Result<()> {
    if employee_id.trim().is_empty() {
        return Err(AppError::BadRequest("employee_id is required".into()));
    }
    Ok(())
}

#[post("/personal")]
pub async fn publish_personal(
    state: web::Data<AppState>,
    body: web::Json<PublishRequest<PersonalPayload>>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    require_employee_id(&body.payload.employee_id)?;

    let message_id = body.message_id.unwrap_or_else(Uuid::new_v4);
    state
        .publisher
        .publish_personal(message_id, body.payload)
        .await?;

    info!(message_id = %message_id, "personal event accepted");
    Ok(accepted(message_id))
}

#[post("/position")]
pub async fn publish_position(
    state: web::Data<AppState>,
    body: web::Json<PublishRequest<PositionPayload>>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    require_employee_id(&body.payload.employee_id)?;

    let message_id = body.message_id.unwrap_or_else(Uuid::new_v4);
    state
        .publisher
        .publish_position(message_id, body.payload)
        .await?;

    info!(message_id = %message_id, "position event accepted");
    Ok(accepted(message_id))
}

#[post("/history")]
pub async fn publish_history(
    state: web::Data<AppState>,
    body: web::Json<PublishRequest<HistoryPayload>>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    require_employee_id(&body.payload.employee_id)?;

    let message_id = body.message_id.unwrap_or_else(Uuid::new_v4);
    state
        .publisher
        .publish_history(message_id, body.payload)
        .await?;

    info!(message_id = %message_id, "history event accepted");
    Ok(accepted(message_id))
}
