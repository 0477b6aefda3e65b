//! Business logic services

pub mod assets;
pub mod assignments;
pub mod auth;
pub mod disposals;
pub mod maintenance;
pub mod status_sync;

use std::collections::HashMap;

use crate::{
    config::{AuthConfig, SyncConfig},
    error::AppResult,
    models::{asset::AssetSummary, user::UserSummary},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub assets: assets::AssetsService,
    pub assignments: assignments::AssignmentsService,
    pub maintenance: maintenance::MaintenanceService,
    pub disposals: disposals::DisposalsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, sync_config: SyncConfig) -> Self {
        let sync = status_sync::StatusSync::new(repository.assets.clone(), sync_config);

        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            assets: assets::AssetsService::new(repository.clone()),
            assignments: assignments::AssignmentsService::new(repository.clone(), sync.clone()),
            maintenance: maintenance::MaintenanceService::new(repository.clone(), sync.clone()),
            disposals: disposals::DisposalsService::new(repository.clone(), sync),
            repository,
        }
    }

    /// Round trip to the store, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.users.count().await?;
        Ok(())
    }
}

/// Trimmed value of an optional text field, `None` when absent or blank
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Asset and user summaries looked up in bulk for a page of ledger records
pub(crate) struct References {
    assets: HashMap<i32, AssetSummary>,
    users: HashMap<i32, UserSummary>,
}

impl References {
    pub async fn load(
        repository: &Repository,
        mut asset_ids: Vec<i32>,
        mut user_ids: Vec<i32>,
    ) -> AppResult<Self> {
        asset_ids.sort_unstable();
        asset_ids.dedup();
        user_ids.sort_unstable();
        user_ids.dedup();

        let assets = repository
            .assets
            .summaries(&asset_ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        let users = repository
            .users
            .summaries(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(Self { assets, users })
    }

    /// `None` once the asset has been deleted
    pub fn asset(&self, id: i32) -> Option<AssetSummary> {
        self.assets.get(&id).cloned()
    }

    pub fn user(&self, id: i32) -> Option<UserSummary> {
        self.users.get(&id).cloned()
    }
}
