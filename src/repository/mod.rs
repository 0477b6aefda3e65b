//! Repository layer for database operations
//!
//! Services only see the per-entity traits below. Two backends implement
//! them: PostgreSQL through sqlx, and an in-process store used by tests and
//! by `database.url = "memory://"`.

pub mod assets;
pub mod assignments;
pub mod disposals;
pub mod maintenance;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        asset::{Asset, AssetFields, AssetStateChange, AssetSummary},
        assignment::{Assignment, AssignmentFields},
        disposal::{Disposal, DisposalFields},
        maintenance::{Maintenance, MaintenanceFields},
        user::{User, UserFields, UserSummary},
    },
};

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<User>>;
    /// Fails with `NotFound` when the id is unknown
    async fn get_by_id(&self, id: i32) -> AppResult<User>;
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn exists(&self, id: i32) -> AppResult<bool>;
    async fn create(&self, fields: &UserFields) -> AppResult<User>;
    async fn update(&self, id: i32, fields: &UserFields) -> AppResult<User>;
    async fn summaries(&self, ids: &[i32]) -> AppResult<Vec<UserSummary>>;
    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetsRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Asset>>;
    /// Fails with `NotFound` when the id is unknown
    async fn get_by_id(&self, id: i32) -> AppResult<Asset>;
    async fn get_by_serial_number(&self, serial_number: &str) -> AppResult<Option<Asset>>;
    async fn create(&self, fields: &AssetFields, created_by: i32) -> AppResult<Asset>;
    async fn update(&self, id: i32, fields: &AssetFields) -> AppResult<Asset>;
    /// Write only the synchronized status/holder pair
    async fn set_state(&self, id: i32, change: &AssetStateChange) -> AppResult<Asset>;
    async fn delete(&self, id: i32) -> AppResult<()>;
    async fn summaries(&self, ids: &[i32]) -> AppResult<Vec<AssetSummary>>;
}

#[async_trait]
pub trait AssignmentsRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Assignment>>;
    async fn get_by_id(&self, id: i32) -> AppResult<Assignment>;
    /// The record currently holding the asset, if any
    async fn find_active_for_asset(&self, asset_id: i32) -> AppResult<Option<Assignment>>;
    async fn create(&self, fields: &AssignmentFields, created_by: i32) -> AppResult<Assignment>;
    async fn update(&self, id: i32, fields: &AssignmentFields) -> AppResult<Assignment>;
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Maintenance>>;
    async fn get_by_id(&self, id: i32) -> AppResult<Maintenance>;
    async fn create(&self, fields: &MaintenanceFields, created_by: i32) -> AppResult<Maintenance>;
    async fn update(&self, id: i32, fields: &MaintenanceFields) -> AppResult<Maintenance>;
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[async_trait]
pub trait DisposalsRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Disposal>>;
    async fn get_by_id(&self, id: i32) -> AppResult<Disposal>;
    async fn create(&self, fields: &DisposalFields, created_by: i32) -> AppResult<Disposal>;
    async fn update(&self, id: i32, fields: &DisposalFields) -> AppResult<Disposal>;
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Main repository struct holding one handle per entity
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn UsersRepository>,
    pub assets: Arc<dyn AssetsRepository>,
    pub assignments: Arc<dyn AssignmentsRepository>,
    pub maintenance: Arc<dyn MaintenanceRepository>,
    pub disposals: Arc<dyn DisposalsRepository>,
}

impl Repository {
    /// Create a repository backed by the given PostgreSQL pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::PgUsersRepository::new(pool.clone())),
            assets: Arc::new(assets::PgAssetsRepository::new(pool.clone())),
            assignments: Arc::new(assignments::PgAssignmentsRepository::new(pool.clone())),
            maintenance: Arc::new(maintenance::PgMaintenanceRepository::new(pool.clone())),
            disposals: Arc::new(disposals::PgDisposalsRepository::new(pool)),
        }
    }

    /// Create a repository backed by a fresh in-process store
    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::default();
        Self {
            users: Arc::new(store.clone()),
            assets: Arc::new(store.clone()),
            assignments: Arc::new(store.clone()),
            maintenance: Arc::new(store.clone()),
            disposals: Arc::new(store),
        }
    }
}
