use actix_web::{post, web, HttpResponse};
use tracing::warn;

use crate::app_state::AppState;
use crate::error::Result;

/// Truncate every pipeline table. Destructive, for test environments.
#[post("/reset")]
pub async fn reset_state(state: web::Data<AppState>) -> Result<HttpResponse> {
    warn!("resetting all pipeline state");
    state.ledger.reset_all().await?;
    Ok(HttpResponse::NoContent().finish())
}
