//! Asset model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::AssetStatus;
use super::user::UserSummary;

/// Location given to assets created without one
pub const DEFAULT_LOCATION: &str = "Storage";

/// Asset record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: i32,
    pub name: String,
    /// Kind of hardware (Laptop, Monitor, Server, ...)
    #[serde(rename = "type")]
    pub asset_type: String,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub warranty_end_date: Option<NaiveDate>,
    pub status: AssetStatus,
    pub location: String,
    /// User currently holding the asset
    pub assigned_to: Option<i32>,
    pub notes: Option<String>,
    /// User who recorded the asset
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Asset with its user references resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetDetails {
    #[serde(flatten)]
    pub asset: Asset,
    pub assignee: Option<UserSummary>,
    pub creator: Option<UserSummary>,
}

/// Reference to an asset as embedded in ledger records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub id: i32,
    pub name: String,
    pub serial_number: String,
}

/// Writable asset fields, as stored
#[derive(Debug, Clone, PartialEq)]
pub struct AssetFields {
    pub name: String,
    pub asset_type: String,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub warranty_end_date: Option<NaiveDate>,
    pub status: AssetStatus,
    pub location: String,
    pub assigned_to: Option<i32>,
    pub notes: Option<String>,
}

/// Change to the synchronized part of an asset (status and holder)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetStateChange {
    pub status: AssetStatus,
    pub assigned_to: AssigneeChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeChange {
    Keep,
    Set(i32),
    Clear,
}

impl AssigneeChange {
    /// Holder after applying the change to `current`
    pub fn apply(self, current: Option<i32>) -> Option<i32> {
        match self {
            AssigneeChange::Keep => current,
            AssigneeChange::Set(user_id) => Some(user_id),
            AssigneeChange::Clear => None,
        }
    }
}

/// Create or replace asset request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetInput {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type cannot be empty"))]
    pub asset_type: Option<String>,
    #[validate(length(min = 1, message = "serial number cannot be empty"))]
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub status: Option<AssetStatus>,
    pub location: Option<String>,
    pub assigned_to: Option<i32>,
    #[validate(length(max = 500, message = "notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}
