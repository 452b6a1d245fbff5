//! Append-only employment history store.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::error::Result;
use crate::models::{EmploymentRecord, NewEmploymentRecord};

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append one employment record; returns the surrogate id.
    async fn append(&self, record: NewEmploymentRecord) -> Result<i64>;

    async fn list_by_employee(&self, employee_id: &str) -> Result<Vec<EmploymentRecord>>;
}

#[derive(Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn append(&self, record: NewEmploymentRecord) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO employment_history
                (employee_id, company, position, period_from, period_to, stack, created_at)
            VALUES ($1, $2, $3, $4::date, $5::date, $6, NOW())
            RETURNING id
            "#,
        )
        .bind(&record.employee_id)
        .bind(&record.company)
        .bind(&record.position)
        .bind(&record.period_from)
        .bind(&record.period_to)
        .bind(&record.stack)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("id")?)
    }

    async fn list_by_employee(&self, employee_id: &str) -> Result<Vec<EmploymentRecord>> {
        let records = sqlx::query_as::<_, EmploymentRecord>(
            r#"
            SELECT id,
                   employee_id,
                   company,
                   position,
                   to_char(period_from, 'YYYY-MM-DD') AS period_from,
                   to_char(period_to, 'YYYY-MM-DD') AS period_to,
                   stack,
                   created_at
            FROM employment_history
            WHERE employee_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
