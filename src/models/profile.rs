use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Employee profile aggregate, keyed by `employee_id`.
///
/// The personal and position field groups are disjoint column sets written by
/// independent upserts; dates are surfaced as `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeProfile {
    pub employee_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub department: Option<String>,
    pub grade: Option<String>,
    pub effective_from: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Personal field group written by the personal-facts processor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalFields {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub email: String,
    pub phone: String,
}

/// Position field group written by the position processor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionFields {
    pub title: String,
    pub department: String,
    pub grade: String,
    pub effective_from: String,
}
