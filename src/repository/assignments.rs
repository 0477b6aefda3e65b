//! Assignments repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::AssignmentsRepository;
use crate::{
    error::{AppError, AppResult},
    models::{
        assignment::{Assignment, AssignmentFields},
        enums::AssignmentStatus,
    },
};

#[derive(Clone)]
pub struct PgAssignmentsRepository {
    pool: Pool<Postgres>,
}

impl PgAssignmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Assignment record not found".to_string())
}

#[async_trait]
impl AssignmentsRepository for PgAssignmentsRepository {
    async fn list(&self) -> AppResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, Assignment>("SELECT * FROM assignments ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Assignment> {
        sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    async fn find_active_for_asset(&self, asset_id: i32) -> AppResult<Option<Assignment>> {
        let row = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE asset_id = $1 AND status = $2 LIMIT 1",
        )
        .bind(asset_id)
        .bind(AssignmentStatus::Assigned)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, fields: &AssignmentFields, created_by: i32) -> AppResult<Assignment> {
        let row = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (
                asset_id, assigned_to, assignment_date, return_date, status, notes, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(fields.asset_id)
        .bind(fields.assigned_to)
        .bind(fields.assignment_date)
        .bind(fields.return_date)
        .bind(fields.status)
        .bind(&fields.notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, fields: &AssignmentFields) -> AppResult<Assignment> {
        sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET asset_id = $1, assigned_to = $2, assignment_date = $3, return_date = $4,
                status = $5, notes = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(fields.asset_id)
        .bind(fields.assigned_to)
        .bind(fields.assignment_date)
        .bind(fields.return_date)
        .bind(fields.status)
        .bind(&fields.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}
