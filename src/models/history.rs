use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One employment record in an employee's work history.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmploymentRecord {
    pub id: i64,
    pub employee_id: String,
    pub company: String,
    pub position: Option<String>,
    pub period_from: String,
    pub period_to: String,
    pub stack: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEmploymentRecord {
    pub employee_id: String,
    pub company: String,
    pub position: Option<String>,
    pub period_from: String,
    pub period_to: String,
    pub stack: Vec<String>,
}
