//! Maintenance repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::MaintenanceRepository;
use crate::{
    error::{AppError, AppResult},
    models::maintenance::{Maintenance, MaintenanceFields},
};

#[derive(Clone)]
pub struct PgMaintenanceRepository {
    pool: Pool<Postgres>,
}

impl PgMaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Maintenance record not found".to_string())
}

#[async_trait]
impl MaintenanceRepository for PgMaintenanceRepository {
    async fn list(&self) -> AppResult<Vec<Maintenance>> {
        let rows = sqlx::query_as::<_, Maintenance>(
            "SELECT * FROM maintenance ORDER BY maintenance_date DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Maintenance> {
        sqlx::query_as::<_, Maintenance>("SELECT * FROM maintenance WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    async fn create(&self, fields: &MaintenanceFields, created_by: i32) -> AppResult<Maintenance> {
        let row = sqlx::query_as::<_, Maintenance>(
            r#"
            INSERT INTO maintenance (
                asset_id, maintenance_date, maintenance_type, description, cost,
                performed_by, status, notes, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(fields.asset_id)
        .bind(fields.maintenance_date)
        .bind(fields.maintenance_type)
        .bind(&fields.description)
        .bind(fields.cost)
        .bind(&fields.performed_by)
        .bind(fields.status)
        .bind(&fields.notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, fields: &MaintenanceFields) -> AppResult<Maintenance> {
        sqlx::query_as::<_, Maintenance>(
            r#"
            UPDATE maintenance
            SET asset_id = $1, maintenance_date = $2, maintenance_type = $3, description = $4,
                cost = $5, performed_by = $6, status = $7, notes = $8, updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(fields.asset_id)
        .bind(fields.maintenance_date)
        .bind(fields.maintenance_type)
        .bind(&fields.description)
        .bind(fields.cost)
        .bind(&fields.performed_by)
        .bind(fields.status)
        .bind(&fields.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM maintenance WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}
