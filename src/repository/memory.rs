//! In-process store implementing every repository trait
//!
//! Uniqueness rules (serial number, user email, one active assignment per
//! asset) are checked under the same write lock as the insert, so they hold
//! under concurrent requests just like the database constraints do.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{
    AssetsRepository, AssignmentsRepository, DisposalsRepository, MaintenanceRepository,
    UsersRepository,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        asset::{Asset, AssetFields, AssetStateChange, AssetSummary},
        assignment::{Assignment, AssignmentFields},
        disposal::{Disposal, DisposalFields},
        enums::AssignmentStatus,
        maintenance::{Maintenance, MaintenanceFields},
        user::{User, UserFields, UserSummary},
    },
};

/// One table: rows keyed by id plus the next id to hand out
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    assets: Table<Asset>,
    assignments: Table<Assignment>,
    maintenance: Table<Maintenance>,
    disposals: Table<Disposal>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

fn users_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

fn asset_not_found() -> AppError {
    AppError::NotFound("Asset not found".to_string())
}

fn assignment_not_found() -> AppError {
    AppError::NotFound("Assignment record not found".to_string())
}

fn maintenance_not_found() -> AppError {
    AppError::NotFound("Maintenance record not found".to_string())
}

fn disposal_not_found() -> AppError {
    AppError::NotFound("Disposal record not found".to_string())
}

fn check_email_free(tables: &Tables, email: &str, exclude_id: Option<i32>) -> AppResult<()> {
    let taken = tables
        .users
        .rows
        .values()
        .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id) != exclude_id);
    if taken {
        return Err(AppError::Conflict("User already exists".to_string()));
    }
    Ok(())
}

fn check_serial_free(tables: &Tables, serial_number: &str, exclude_id: Option<i32>) -> AppResult<()> {
    let taken = tables
        .assets
        .rows
        .values()
        .any(|a| a.serial_number == serial_number && Some(a.id) != exclude_id);
    if taken {
        return Err(AppError::Conflict(
            "Asset with this serial number already exists".to_string(),
        ));
    }
    Ok(())
}

fn check_single_active(tables: &Tables, fields: &AssignmentFields, exclude_id: Option<i32>) -> AppResult<()> {
    if fields.status != AssignmentStatus::Assigned {
        return Ok(());
    }
    let taken = tables.assignments.rows.values().any(|a| {
        a.asset_id == fields.asset_id
            && a.status == AssignmentStatus::Assigned
            && Some(a.id) != exclude_id
    });
    if taken {
        return Err(AppError::Conflict("Asset is already assigned".to_string()));
    }
    Ok(())
}

#[async_trait]
impl UsersRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.tables.read().await.users.all())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<User> {
        let tables = self.tables.read().await;
        tables.users.rows.get(&id).cloned().ok_or_else(users_not_found)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .rows
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.tables.read().await.users.rows.contains_key(&id))
    }

    async fn create(&self, fields: &UserFields) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        check_email_free(&tables, &fields.email, None)?;
        let now = Utc::now();
        Ok(tables.users.insert_with(|id| User {
            id,
            name: fields.name.clone(),
            email: fields.email.clone(),
            password_hash: fields.password_hash.clone(),
            university: fields.university.clone(),
            address: fields.address.clone(),
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(&self, id: i32, fields: &UserFields) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        check_email_free(&tables, &fields.email, Some(id))?;
        let user = tables.users.rows.get_mut(&id).ok_or_else(users_not_found)?;
        user.name = fields.name.clone();
        user.email = fields.email.clone();
        user.password_hash = fields.password_hash.clone();
        user.university = fields.university.clone();
        user.address = fields.address.clone();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn summaries(&self, ids: &[i32]) -> AppResult<Vec<UserSummary>> {
        let tables = self.tables.read().await;
        let wanted: HashSet<i32> = ids.iter().copied().collect();
        Ok(tables
            .users
            .rows
            .values()
            .filter(|u| wanted.contains(&u.id))
            .map(UserSummary::from)
            .collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.users.rows.len() as i64)
    }
}

#[async_trait]
impl AssetsRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Asset>> {
        Ok(self.tables.read().await.assets.all())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Asset> {
        let tables = self.tables.read().await;
        tables.assets.rows.get(&id).cloned().ok_or_else(asset_not_found)
    }

    async fn get_by_serial_number(&self, serial_number: &str) -> AppResult<Option<Asset>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assets
            .rows
            .values()
            .find(|a| a.serial_number == serial_number)
            .cloned())
    }

    async fn create(&self, fields: &AssetFields, created_by: i32) -> AppResult<Asset> {
        let mut tables = self.tables.write().await;
        check_serial_free(&tables, &fields.serial_number, None)?;
        let now = Utc::now();
        Ok(tables.assets.insert_with(|id| Asset {
            id,
            name: fields.name.clone(),
            asset_type: fields.asset_type.clone(),
            serial_number: fields.serial_number.clone(),
            purchase_date: fields.purchase_date,
            warranty_end_date: fields.warranty_end_date,
            status: fields.status,
            location: fields.location.clone(),
            assigned_to: fields.assigned_to,
            notes: fields.notes.clone(),
            created_by,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(&self, id: i32, fields: &AssetFields) -> AppResult<Asset> {
        let mut tables = self.tables.write().await;
        check_serial_free(&tables, &fields.serial_number, Some(id))?;
        let asset = tables.assets.rows.get_mut(&id).ok_or_else(asset_not_found)?;
        asset.name = fields.name.clone();
        asset.asset_type = fields.asset_type.clone();
        asset.serial_number = fields.serial_number.clone();
        asset.purchase_date = fields.purchase_date;
        asset.warranty_end_date = fields.warranty_end_date;
        asset.status = fields.status;
        asset.location = fields.location.clone();
        asset.assigned_to = fields.assigned_to;
        asset.notes = fields.notes.clone();
        asset.updated_at = Utc::now();
        Ok(asset.clone())
    }

    async fn set_state(&self, id: i32, change: &AssetStateChange) -> AppResult<Asset> {
        let mut tables = self.tables.write().await;
        let asset = tables.assets.rows.get_mut(&id).ok_or_else(asset_not_found)?;
        asset.status = change.status;
        asset.assigned_to = change.assigned_to.apply(asset.assigned_to);
        asset.updated_at = Utc::now();
        Ok(asset.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables.assets.rows.remove(&id).map(|_| ()).ok_or_else(asset_not_found)
    }

    async fn summaries(&self, ids: &[i32]) -> AppResult<Vec<AssetSummary>> {
        let tables = self.tables.read().await;
        let wanted: HashSet<i32> = ids.iter().copied().collect();
        Ok(tables
            .assets
            .rows
            .values()
            .filter(|a| wanted.contains(&a.id))
            .map(|a| AssetSummary {
                id: a.id,
                name: a.name.clone(),
                serial_number: a.serial_number.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl AssignmentsRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Assignment>> {
        Ok(self.tables.read().await.assignments.all())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Assignment> {
        let tables = self.tables.read().await;
        tables
            .assignments
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(assignment_not_found)
    }

    async fn find_active_for_asset(&self, asset_id: i32) -> AppResult<Option<Assignment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .rows
            .values()
            .find(|a| a.asset_id == asset_id && a.status == AssignmentStatus::Assigned)
            .cloned())
    }

    async fn create(&self, fields: &AssignmentFields, created_by: i32) -> AppResult<Assignment> {
        let mut tables = self.tables.write().await;
        check_single_active(&tables, fields, None)?;
        let now = Utc::now();
        Ok(tables.assignments.insert_with(|id| Assignment {
            id,
            asset_id: fields.asset_id,
            assigned_to: fields.assigned_to,
            assignment_date: fields.assignment_date,
            return_date: fields.return_date,
            status: fields.status,
            notes: fields.notes.clone(),
            created_by,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(&self, id: i32, fields: &AssignmentFields) -> AppResult<Assignment> {
        let mut tables = self.tables.write().await;
        check_single_active(&tables, fields, Some(id))?;
        let row = tables
            .assignments
            .rows
            .get_mut(&id)
            .ok_or_else(assignment_not_found)?;
        row.asset_id = fields.asset_id;
        row.assigned_to = fields.assigned_to;
        row.assignment_date = fields.assignment_date;
        row.return_date = fields.return_date;
        row.status = fields.status;
        row.notes = fields.notes.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .assignments
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(assignment_not_found)
    }
}

#[async_trait]
impl MaintenanceRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Maintenance>> {
        let mut rows = self.tables.read().await.maintenance.all();
        rows.sort_by(|a, b| {
            b.maintenance_date
                .cmp(&a.maintenance_date)
                .then(b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Maintenance> {
        let tables = self.tables.read().await;
        tables
            .maintenance
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(maintenance_not_found)
    }

    async fn create(&self, fields: &MaintenanceFields, created_by: i32) -> AppResult<Maintenance> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        Ok(tables.maintenance.insert_with(|id| Maintenance {
            id,
            asset_id: fields.asset_id,
            maintenance_date: fields.maintenance_date,
            maintenance_type: fields.maintenance_type,
            description: fields.description.clone(),
            cost: fields.cost,
            performed_by: fields.performed_by.clone(),
            status: fields.status,
            notes: fields.notes.clone(),
            created_by,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(&self, id: i32, fields: &MaintenanceFields) -> AppResult<Maintenance> {
        let mut tables = self.tables.write().await;
        let row = tables
            .maintenance
            .rows
            .get_mut(&id)
            .ok_or_else(maintenance_not_found)?;
        row.asset_id = fields.asset_id;
        row.maintenance_date = fields.maintenance_date;
        row.maintenance_type = fields.maintenance_type;
        row.description = fields.description.clone();
        row.cost = fields.cost;
        row.performed_by = fields.performed_by.clone();
        row.status = fields.status;
        row.notes = fields.notes.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .maintenance
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(maintenance_not_found)
    }
}

#[async_trait]
impl DisposalsRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Disposal>> {
        let mut rows = self.tables.read().await.disposals.all();
        rows.sort_by(|a, b| b.disposal_date.cmp(&a.disposal_date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Disposal> {
        let tables = self.tables.read().await;
        tables
            .disposals
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(disposal_not_found)
    }

    async fn create(&self, fields: &DisposalFields, created_by: i32) -> AppResult<Disposal> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        Ok(tables.disposals.insert_with(|id| Disposal {
            id,
            asset_id: fields.asset_id,
            disposal_date: fields.disposal_date,
            method: fields.method,
            reason: fields.reason.clone(),
            notes: fields.notes.clone(),
            created_by,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(&self, id: i32, fields: &DisposalFields) -> AppResult<Disposal> {
        let mut tables = self.tables.write().await;
        let row = tables
            .disposals
            .rows
            .get_mut(&id)
            .ok_or_else(disposal_not_found)?;
        row.asset_id = fields.asset_id;
        row.disposal_date = fields.disposal_date;
        row.method = fields.method;
        row.reason = fields.reason.clone();
        row.notes = fields.notes.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .disposals
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(disposal_not_found)
    }
}
