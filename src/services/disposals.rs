//! Disposal ledger service

use chrono::Utc;
use validator::Validate;

use super::{
    non_blank,
    status_sync::{LedgerEvent, StatusSync},
    References,
};
use crate::{
    error::{AppError, AppResult},
    models::disposal::{Disposal, DisposalDetails, DisposalFields, DisposalInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct DisposalsService {
    repository: Repository,
    sync: StatusSync,
}

impl DisposalsService {
    pub fn new(repository: Repository, sync: StatusSync) -> Self {
        Self { repository, sync }
    }

    pub async fn list(&self) -> AppResult<Vec<DisposalDetails>> {
        let records = self.repository.disposals.list().await?;
        self.with_references(records).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<DisposalDetails> {
        let record = self.repository.disposals.get_by_id(id).await?;
        self.with_references(vec![record])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Disposal lookup returned nothing".to_string()))
    }

    /// Record an asset's end of life. The asset is always marked Disposed.
    pub async fn create(&self, data: &DisposalInput, created_by: i32) -> AppResult<Disposal> {
        data.validate()?;

        let (Some(asset_id), Some(method), Some(reason)) =
            (data.asset, data.method, non_blank(&data.reason))
        else {
            return Err(AppError::Validation(
                "Please fill in all required fields: asset, method, reason".to_string(),
            ));
        };

        self.repository.assets.get_by_id(asset_id).await?;

        let fields = DisposalFields {
            asset_id,
            disposal_date: data.disposal_date.unwrap_or_else(|| Utc::now().date_naive()),
            method,
            reason,
            notes: data.notes.clone(),
        };

        let record = self.repository.disposals.create(&fields, created_by).await?;
        tracing::info!(disposal_id = record.id, asset_id, method = %record.method, "Disposal recorded");

        self.sync.apply(asset_id, LedgerEvent::Disposed).await?;
        Ok(record)
    }

    /// Merge `data` into a record and mark its asset Disposed again.
    ///
    /// When the record is moved to another asset the previous one stays
    /// Disposed; a warning is logged so it can be corrected by hand.
    pub async fn update(&self, id: i32, data: &DisposalInput) -> AppResult<Disposal> {
        data.validate()?;

        let current = self.repository.disposals.get_by_id(id).await?;
        let fields = data.merge_into(&current);

        if fields.reason.is_empty() {
            return Err(AppError::Validation("reason is required".to_string()));
        }
        if fields.asset_id != current.asset_id {
            self.repository.assets.get_by_id(fields.asset_id).await?;
            tracing::warn!(
                disposal_id = id,
                old_asset_id = current.asset_id,
                new_asset_id = fields.asset_id,
                "Disposal moved to another asset; previous asset keeps its Disposed status"
            );
        }

        let record = self.repository.disposals.update(id, &fields).await?;
        tracing::info!(disposal_id = id, asset_id = record.asset_id, "Disposal updated");

        self.sync.apply(record.asset_id, LedgerEvent::Disposed).await?;
        Ok(record)
    }

    /// Delete a record without reverting the asset's status
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let record = self.repository.disposals.get_by_id(id).await?;
        self.repository.disposals.delete(id).await?;
        tracing::info!(disposal_id = id, asset_id = record.asset_id, "Disposal deleted");
        Ok(())
    }

    async fn with_references(&self, records: Vec<Disposal>) -> AppResult<Vec<DisposalDetails>> {
        let asset_ids = records.iter().map(|r| r.asset_id).collect();
        let user_ids = records.iter().map(|r| r.created_by).collect();
        let refs = References::load(&self.repository, asset_ids, user_ids).await?;

        Ok(records
            .into_iter()
            .map(|disposal| DisposalDetails {
                asset_info: refs.asset(disposal.asset_id),
                creator: refs.user(disposal.created_by),
                disposal,
            })
            .collect())
    }
}
