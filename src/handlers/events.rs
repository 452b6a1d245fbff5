//! Read-side listings over the audit ledger and the dead-letter queue.

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::error::Result;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl PageQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[get("/audit")]
pub async fn list_audit(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let events = state.ledger.list_audit(query.limit(), query.offset()).await?;
    Ok(HttpResponse::Ok().json(events))
}

#[get("/dead-letters")]
pub async fn list_dead_letters(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let dead_letters = state
        .ledger
        .list_dead_letters(query.limit(), query.offset())
        .await?;
    Ok(HttpResponse::Ok().json(dead_letters))
}
