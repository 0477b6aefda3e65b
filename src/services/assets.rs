//! Asset registry service

use chrono::Utc;
use validator::Validate;

use super::{non_blank, References};
use crate::{
    error::{AppError, AppResult},
    models::asset::{Asset, AssetDetails, AssetFields, AssetInput, DEFAULT_LOCATION},
    repository::Repository,
};

#[derive(Clone)]
pub struct AssetsService {
    repository: Repository,
}

impl AssetsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all assets with creator and assignee resolved
    pub async fn list(&self) -> AppResult<Vec<AssetDetails>> {
        let assets = self.repository.assets.list().await?;
        self.with_users(assets).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<AssetDetails> {
        let asset = self.repository.assets.get_by_id(id).await?;
        let mut details = self.with_users(vec![asset]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::Internal("Asset lookup returned nothing".to_string()))
    }

    /// Register a new asset, recorded as created by `created_by`
    pub async fn create(&self, data: &AssetInput, created_by: i32) -> AppResult<Asset> {
        data.validate()?;

        let (Some(name), Some(asset_type), Some(serial_number)) = (
            non_blank(&data.name),
            non_blank(&data.asset_type),
            non_blank(&data.serial_number),
        ) else {
            return Err(AppError::Validation(
                "Please fill in all required fields: name, type, serial number".to_string(),
            ));
        };

        if self
            .repository
            .assets
            .get_by_serial_number(&serial_number)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Asset with this serial number already exists".to_string(),
            ));
        }

        self.check_assignee(data.assigned_to).await?;

        let fields = AssetFields {
            name,
            asset_type,
            serial_number,
            purchase_date: data.purchase_date.unwrap_or_else(|| Utc::now().date_naive()),
            warranty_end_date: data.warranty_end_date,
            status: data.status.unwrap_or_default(),
            location: non_blank(&data.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            assigned_to: data.assigned_to,
            notes: non_blank(&data.notes),
        };

        let asset = self.repository.assets.create(&fields, created_by).await?;
        tracing::info!(asset_id = asset.id, serial_number = %asset.serial_number, "Asset created");
        Ok(asset)
    }

    /// Replace an asset's writable fields.
    ///
    /// Name, type, serial number, purchase date, status and location keep
    /// their value when omitted; assignee, warranty end and notes are
    /// replaced, so omitting them clears them. No status-sync rule runs here.
    pub async fn update(&self, id: i32, data: &AssetInput) -> AppResult<Asset> {
        data.validate()?;

        let current = self.repository.assets.get_by_id(id).await?;

        if let Some(serial_number) = non_blank(&data.serial_number) {
            if serial_number != current.serial_number {
                let existing = self
                    .repository
                    .assets
                    .get_by_serial_number(&serial_number)
                    .await?;
                if existing.is_some_and(|other| other.id != id) {
                    return Err(AppError::Conflict(
                        "Another asset with this serial number already exists".to_string(),
                    ));
                }
            }
        }

        self.check_assignee(data.assigned_to).await?;

        let fields = AssetFields {
            name: non_blank(&data.name).unwrap_or(current.name),
            asset_type: non_blank(&data.asset_type).unwrap_or(current.asset_type),
            serial_number: non_blank(&data.serial_number).unwrap_or(current.serial_number),
            purchase_date: data.purchase_date.unwrap_or(current.purchase_date),
            warranty_end_date: data.warranty_end_date,
            status: data.status.unwrap_or(current.status),
            location: non_blank(&data.location).unwrap_or(current.location),
            assigned_to: data.assigned_to,
            notes: non_blank(&data.notes),
        };

        let asset = self.repository.assets.update(id, &fields).await?;
        tracing::info!(asset_id = id, status = %asset.status, "Asset updated");
        Ok(asset)
    }

    /// Delete an asset. Ledger records pointing at it are left in place.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.assets.delete(id).await?;
        tracing::info!(asset_id = id, "Asset deleted");
        Ok(())
    }

    async fn check_assignee(&self, assigned_to: Option<i32>) -> AppResult<()> {
        if let Some(user_id) = assigned_to {
            if !self.repository.users.exists(user_id).await? {
                return Err(AppError::Validation("Assigned user not found".to_string()));
            }
        }
        Ok(())
    }

    async fn with_users(&self, assets: Vec<Asset>) -> AppResult<Vec<AssetDetails>> {
        let user_ids = assets
            .iter()
            .flat_map(|a| std::iter::once(a.created_by).chain(a.assigned_to))
            .collect();
        let refs = References::load(&self.repository, Vec::new(), user_ids).await?;

        Ok(assets
            .into_iter()
            .map(|asset| AssetDetails {
                assignee: asset.assigned_to.and_then(|id| refs.user(id)),
                creator: refs.user(asset.created_by),
                asset,
            })
            .collect())
    }
}
