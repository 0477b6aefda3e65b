//! Maintenance ledger service

use chrono::Utc;
use rust_decimal::Decimal;
use validator::Validate;

use super::{
    non_blank,
    status_sync::{LedgerEvent, StatusSync},
    References,
};
use crate::{
    error::{AppError, AppResult},
    models::maintenance::{
        Maintenance, MaintenanceDetails, MaintenanceFields, MaintenanceInput, DEFAULT_PERFORMER,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
    sync: StatusSync,
}

fn check_cost(cost: Decimal) -> AppResult<()> {
    if cost < Decimal::ZERO {
        return Err(AppError::Validation("cost cannot be negative".to_string()));
    }
    Ok(())
}

impl MaintenanceService {
    pub fn new(repository: Repository, sync: StatusSync) -> Self {
        Self { repository, sync }
    }

    pub async fn list(&self) -> AppResult<Vec<MaintenanceDetails>> {
        let records = self.repository.maintenance.list().await?;
        self.with_references(records).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceDetails> {
        let record = self.repository.maintenance.get_by_id(id).await?;
        self.with_references(vec![record])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Maintenance lookup returned nothing".to_string()))
    }

    pub async fn create(&self, data: &MaintenanceInput, created_by: i32) -> AppResult<Maintenance> {
        data.validate()?;

        let (Some(asset_id), Some(maintenance_type), Some(description)) =
            (data.asset, data.maintenance_type, non_blank(&data.description))
        else {
            return Err(AppError::Validation(
                "Please fill in all required fields: asset, type, description".to_string(),
            ));
        };

        let cost = data.cost.unwrap_or_default();
        check_cost(cost)?;

        self.repository.assets.get_by_id(asset_id).await?;

        let fields = MaintenanceFields {
            asset_id,
            maintenance_date: data
                .maintenance_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            maintenance_type,
            description,
            cost,
            performed_by: non_blank(&data.performed_by)
                .unwrap_or_else(|| DEFAULT_PERFORMER.to_string()),
            status: data.status.unwrap_or_default(),
            notes: data.notes.clone(),
        };

        let record = self
            .repository
            .maintenance
            .create(&fields, created_by)
            .await?;
        tracing::info!(
            maintenance_id = record.id,
            asset_id,
            status = %record.status,
            "Maintenance recorded"
        );

        if let Some(event) = LedgerEvent::for_maintenance(record.status) {
            self.sync.apply(asset_id, event).await?;
        }

        Ok(record)
    }

    /// Merge `data` into a record; only a status change moves the asset
    pub async fn update(&self, id: i32, data: &MaintenanceInput) -> AppResult<Maintenance> {
        data.validate()?;

        let current = self.repository.maintenance.get_by_id(id).await?;
        let fields = data.merge_into(&current);

        if fields.description.is_empty() {
            return Err(AppError::Validation("description is required".to_string()));
        }
        if fields.performed_by.is_empty() {
            return Err(AppError::Validation("performedBy cannot be empty".to_string()));
        }
        check_cost(fields.cost)?;
        if fields.asset_id != current.asset_id {
            self.repository.assets.get_by_id(fields.asset_id).await?;
        }

        let record = self.repository.maintenance.update(id, &fields).await?;
        tracing::info!(
            maintenance_id = id,
            asset_id = record.asset_id,
            from = %current.status,
            to = %record.status,
            "Maintenance updated"
        );

        if record.status != current.status {
            if let Some(event) = LedgerEvent::for_maintenance(record.status) {
                self.sync.apply(record.asset_id, event).await?;
            }
        }

        Ok(record)
    }

    /// Delete a record. The asset keeps whatever status it has.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let record = self.repository.maintenance.get_by_id(id).await?;
        self.repository.maintenance.delete(id).await?;
        tracing::info!(maintenance_id = id, asset_id = record.asset_id, "Maintenance deleted");
        Ok(())
    }

    async fn with_references(
        &self,
        records: Vec<Maintenance>,
    ) -> AppResult<Vec<MaintenanceDetails>> {
        let asset_ids = records.iter().map(|r| r.asset_id).collect();
        let user_ids = records.iter().map(|r| r.created_by).collect();
        let refs = References::load(&self.repository, asset_ids, user_ids).await?;

        Ok(records
            .into_iter()
            .map(|maintenance| MaintenanceDetails {
                asset_info: refs.asset(maintenance.asset_id),
                creator: refs.user(maintenance.created_by),
                maintenance,
            })
            .collect())
    }
}
