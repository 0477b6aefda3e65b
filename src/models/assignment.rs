//! Assignment (asset hand-out) model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::asset::AssetSummary;
use super::enums::AssignmentStatus;
use super::user::UserSummary;

/// Assignment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i32,
    #[serde(rename = "asset")]
    pub asset_id: i32,
    pub assigned_to: i32,
    pub assignment_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assignment with asset and users resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetails {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub asset_info: Option<AssetSummary>,
    pub assignee: Option<UserSummary>,
    pub creator: Option<UserSummary>,
}

/// Writable assignment fields, as stored
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentFields {
    pub asset_id: i32,
    pub assigned_to: i32,
    pub assignment_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
}

impl From<&Assignment> for AssignmentFields {
    fn from(a: &Assignment) -> Self {
        Self {
            asset_id: a.asset_id,
            assigned_to: a.assigned_to,
            assignment_date: a.assignment_date,
            return_date: a.return_date,
            status: a.status,
            notes: a.notes.clone(),
        }
    }
}

/// Create or update assignment request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInput {
    pub asset: Option<i32>,
    pub assigned_to: Option<i32>,
    pub assignment_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub status: Option<AssignmentStatus>,
    #[validate(length(max = 500, message = "notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}

impl AssignmentInput {
    /// Overlay the request on an existing record; absent fields keep their value
    pub fn merge_into(&self, current: &Assignment) -> AssignmentFields {
        let mut fields = AssignmentFields::from(current);
        if let Some(asset_id) = self.asset {
            fields.asset_id = asset_id;
        }
        if let Some(user_id) = self.assigned_to {
            fields.assigned_to = user_id;
        }
        if let Some(date) = self.assignment_date {
            fields.assignment_date = date;
        }
        if self.return_date.is_some() {
            fields.return_date = self.return_date;
        }
        if let Some(status) = self.status {
            fields.status = status;
        }
        if self.notes.is_some() {
            fields.notes = self.notes.clone();
        }
        fields
    }
}
