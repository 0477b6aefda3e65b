//! Disposal (end-of-life) model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::asset::AssetSummary;
use super::enums::DisposalMethod;
use super::user::UserSummary;

/// Disposal record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Disposal {
    pub id: i32,
    #[serde(rename = "asset")]
    pub asset_id: i32,
    pub disposal_date: NaiveDate,
    pub method: DisposalMethod,
    pub reason: String,
    pub notes: Option<String>,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisposalDetails {
    #[serde(flatten)]
    pub disposal: Disposal,
    pub asset_info: Option<AssetSummary>,
    pub creator: Option<UserSummary>,
}

/// Writable disposal fields, as stored
#[derive(Debug, Clone, PartialEq)]
pub struct DisposalFields {
    pub asset_id: i32,
    pub disposal_date: NaiveDate,
    pub method: DisposalMethod,
    pub reason: String,
    pub notes: Option<String>,
}

impl From<&Disposal> for DisposalFields {
    fn from(d: &Disposal) -> Self {
        Self {
            asset_id: d.asset_id,
            disposal_date: d.disposal_date,
            method: d.method,
            reason: d.reason.clone(),
            notes: d.notes.clone(),
        }
    }
}

/// Create or update disposal request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisposalInput {
    pub asset: Option<i32>,
    pub disposal_date: Option<NaiveDate>,
    pub method: Option<DisposalMethod>,
    #[validate(length(
        min = 1,
        max = 500,
        message = "reason must be between 1 and 500 characters"
    ))]
    pub reason: Option<String>,
    #[validate(length(max = 500, message = "notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}

impl DisposalInput {
    /// Overlay the request on an existing record; absent fields keep their value
    pub fn merge_into(&self, current: &Disposal) -> DisposalFields {
        let mut fields = DisposalFields::from(current);
        if let Some(asset_id) = self.asset {
            fields.asset_id = asset_id;
        }
        if let Some(date) = self.disposal_date {
            fields.disposal_date = date;
        }
        if let Some(method) = self.method {
            fields.method = method;
        }
        if let Some(ref reason) = self.reason {
            fields.reason = reason.trim().to_string();
        }
        if self.notes.is_some() {
            fields.notes = self.notes.clone();
        }
        fields
    }
}
