//! Employee profile store.
//!
//! The personal and position processors write disjoint column groups through
//! independent upserts, so they can race harmlessly: each wins its own
//! columns, last writer wins per field group.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{EmployeeProfile, PersonalFields, PositionFields};

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn upsert_personal_fields(&self, employee_id: &str, fields: PersonalFields)
        -> Result<()>;

    async fn upsert_position_fields(&self, employee_id: &str, fields: PositionFields)
        -> Result<()>;

    /// `Ok(None)` means the profile does not exist — a permanent condition for
    /// dependency checks, distinct from a transient store error.
    async fn get(&self, employee_id: &str) -> Result<Option<EmployeeProfile>>;

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<EmployeeProfile>>;
}

const SELECT_PROFILE: &str = r#"
SELECT employee_id,
       first_name,
       last_name,
       to_char(birth_date, 'YYYY-MM-DD') AS birth_date,
       email,
       phone,
       title,
       department,
       grade,
       to_char(effective_from, 'YYYY-MM-DD') AS effective_from,
       updated_at
FROM employee_profile
"#;

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn upsert_personal_fields(
        &self,
        employee_id: &str,
        fields: PersonalFields,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO employee_profile
                (employee_id, first_name, last_name, birth_date, email, phone, updated_at)
            VALUES ($1, $2, $3, NULLIF($4, '')::date, $5, $6, NOW())
            ON CONFLICT (employee_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name  = EXCLUDED.last_name,
                birth_date = EXCLUDED.birth_date,
                email      = EXCLUDED.email,
                phone      = EXCLUDED.phone,
                updated_at = NOW()
            "#,
        )
        .bind(employee_id)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.birth_date)
        .bind(&fields.email)
        .bind(&fields.phone)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn upsert_position_fields(
        &self,
        employee_id: &str,
        fields: PositionFields,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO employee_profile
                (employee_id, title, department, grade, effective_from, updated_at)
            VALUES ($1, $2, $3, NULLIF($4, ''), NULLIF($5, '')::date, NOW())
            ON CONFLICT (employee_id) DO UPDATE SET
                title          = EXCLUDED.title,
                department     = EXCLUDED.department,
                grade          = EXCLUDED.grade,
                effective_from = EXCLUDED.effective_from,
                updated_at     = NOW()
            "#,
        )
        .bind(employee_id)
        .bind(&fields.title)
        .bind(&fields.department)
        .bind(&fields.grade)
        .bind(&fields.effective_from)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, employee_id: &str) -> Result<Option<EmployeeProfile>> {
        let profile = sqlx::query_as::<_, EmployeeProfile>(
            &format!("{SELECT_PROFILE} WHERE employee_id = $1"),
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<EmployeeProfile>> {
        let profiles = sqlx::query_as::<_, EmployeeProfile>(&format!(
            "{SELECT_PROFILE} ORDER BY updated_at DESC, employee_id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }
}
