//! Disposals repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::DisposalsRepository;
use crate::{
    error::{AppError, AppResult},
    models::disposal::{Disposal, DisposalFields},
};

#[derive(Clone)]
pub struct PgDisposalsRepository {
    pool: Pool<Postgres>,
}

impl PgDisposalsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Disposal record not found".to_string())
}

#[async_trait]
impl DisposalsRepository for PgDisposalsRepository {
    async fn list(&self) -> AppResult<Vec<Disposal>> {
        let rows = sqlx::query_as::<_, Disposal>(
            "SELECT * FROM disposals ORDER BY disposal_date DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Disposal> {
        sqlx::query_as::<_, Disposal>("SELECT * FROM disposals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    async fn create(&self, fields: &DisposalFields, created_by: i32) -> AppResult<Disposal> {
        let row = sqlx::query_as::<_, Disposal>(
            r#"
            INSERT INTO disposals (asset_id, disposal_date, method, reason, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(fields.asset_id)
        .bind(fields.disposal_date)
        .bind(fields.method)
        .bind(&fields.reason)
        .bind(&fields.notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, fields: &DisposalFields) -> AppResult<Disposal> {
        sqlx::query_as::<_, Disposal>(
            r#"
            UPDATE disposals
            SET asset_id = $1, disposal_date = $2, method = $3, reason = $4, notes = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(fields.asset_id)
        .bind(fields.disposal_date)
        .bind(fields.method)
        .bind(&fields.reason)
        .bind(&fields.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM disposals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}
