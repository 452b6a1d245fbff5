//! Read-side endpoints over the employee aggregates.

use actix_web::{get, web, HttpResponse};

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::handlers::events::PageQuery;

#[get("")]
pub async fn list_employees(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let profiles = state.profiles.list(query.limit(), query.offset()).await?;
    Ok(HttpResponse::Ok().json(profiles))
}

#[get("/{employee_id}")]
pub async fn get_employee(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let employee_id = path.into_inner();
    match state.profiles.get(&employee_id).await? {
        Some(profile) => Ok(HttpResponse::Ok().json(profile)),
        None => Err(AppError::NotFound(format!(
            "employee {} not found",
            employee_id
        ))),
    }
}

#[get("/{employee_id}/history")]
pub async fn get_employee_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let employee_id = path.into_inner();
    let records = state.history.list_by_employee(&employee_id).await?;
    Ok(HttpResponse::Ok().json(records))
}
