//! Assets repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::AssetsRepository;
use crate::{
    error::{AppError, AppResult},
    models::asset::{Asset, AssetFields, AssetStateChange, AssetSummary, AssigneeChange},
};

#[derive(Clone)]
pub struct PgAssetsRepository {
    pool: Pool<Postgres>,
}

impl PgAssetsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Asset not found".to_string())
}

#[async_trait]
impl AssetsRepository for PgAssetsRepository {
    async fn list(&self) -> AppResult<Vec<Asset>> {
        let rows = sqlx::query_as::<_, Asset>("SELECT * FROM assets ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    async fn get_by_serial_number(&self, serial_number: &str) -> AppResult<Option<Asset>> {
        let asset = sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE serial_number = $1")
            .bind(serial_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(asset)
    }

    async fn create(&self, fields: &AssetFields, created_by: i32) -> AppResult<Asset> {
        let row = sqlx::query_as::<_, Asset>(
            r#"
            INSERT INTO assets (
                name, asset_type, serial_number, purchase_date, warranty_end_date,
                status, location, assigned_to, notes, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.asset_type)
        .bind(&fields.serial_number)
        .bind(fields.purchase_date)
        .bind(fields.warranty_end_date)
        .bind(fields.status)
        .bind(&fields.location)
        .bind(fields.assigned_to)
        .bind(&fields.notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, fields: &AssetFields) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>(
            r#"
            UPDATE assets
            SET name = $1, asset_type = $2, serial_number = $3, purchase_date = $4,
                warranty_end_date = $5, status = $6, location = $7, assigned_to = $8,
                notes = $9, updated_at = NOW()
            WHERE id = $10
            RETURNING *
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.asset_type)
        .bind(&fields.serial_number)
        .bind(fields.purchase_date)
        .bind(fields.warranty_end_date)
        .bind(fields.status)
        .bind(&fields.location)
        .bind(fields.assigned_to)
        .bind(&fields.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    async fn set_state(&self, id: i32, change: &AssetStateChange) -> AppResult<Asset> {
        let (replace_holder, holder) = match change.assigned_to {
            AssigneeChange::Keep => (false, None),
            AssigneeChange::Set(user_id) => (true, Some(user_id)),
            AssigneeChange::Clear => (true, None),
        };

        sqlx::query_as::<_, Asset>(
            r#"
            UPDATE assets
            SET status = $1,
                assigned_to = CASE WHEN $2 THEN $3 ELSE assigned_to END,
                updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(change.status)
        .bind(replace_holder)
        .bind(holder)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn summaries(&self, ids: &[i32]) -> AppResult<Vec<AssetSummary>> {
        let rows = sqlx::query_as::<_, AssetSummary>(
            "SELECT id, name, serial_number FROM assets WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
