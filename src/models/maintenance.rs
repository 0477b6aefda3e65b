//! Maintenance (service event) model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::asset::AssetSummary;
use super::enums::{MaintenanceStatus, MaintenanceType};
use super::user::UserSummary;

/// Who performs maintenance when nobody is named
pub const DEFAULT_PERFORMER: &str = "Internal IT";

/// Maintenance record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    pub id: i32,
    #[serde(rename = "asset")]
    pub asset_id: i32,
    pub maintenance_date: NaiveDate,
    #[serde(rename = "type")]
    pub maintenance_type: MaintenanceType,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub cost: Decimal,
    pub performed_by: String,
    pub status: MaintenanceStatus,
    pub notes: Option<String>,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceDetails {
    #[serde(flatten)]
    pub maintenance: Maintenance,
    pub asset_info: Option<AssetSummary>,
    pub creator: Option<UserSummary>,
}

/// Writable maintenance fields, as stored
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceFields {
    pub asset_id: i32,
    pub maintenance_date: NaiveDate,
    pub maintenance_type: MaintenanceType,
    pub description: String,
    pub cost: Decimal,
    pub performed_by: String,
    pub status: MaintenanceStatus,
    pub notes: Option<String>,
}

impl From<&Maintenance> for MaintenanceFields {
    fn from(m: &Maintenance) -> Self {
        Self {
            asset_id: m.asset_id,
            maintenance_date: m.maintenance_date,
            maintenance_type: m.maintenance_type,
            description: m.description.clone(),
            cost: m.cost,
            performed_by: m.performed_by.clone(),
            status: m.status,
            notes: m.notes.clone(),
        }
    }
}

/// Create or update maintenance request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceInput {
    pub asset: Option<i32>,
    pub maintenance_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub maintenance_type: Option<MaintenanceType>,
    #[validate(length(
        min = 1,
        max = 1000,
        message = "description must be between 1 and 1000 characters"
    ))]
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub cost: Option<Decimal>,
    pub performed_by: Option<String>,
    pub status: Option<MaintenanceStatus>,
    #[validate(length(max = 500, message = "notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}

impl MaintenanceInput {
    /// Overlay the request on an existing record; absent fields keep their value
    pub fn merge_into(&self, current: &Maintenance) -> MaintenanceFields {
        let mut fields = MaintenanceFields::from(current);
        if let Some(asset_id) = self.asset {
            fields.asset_id = asset_id;
        }
        if let Some(date) = self.maintenance_date {
            fields.maintenance_date = date;
        }
        if let Some(kind) = self.maintenance_type {
            fields.maintenance_type = kind;
        }
        if let Some(ref description) = self.description {
            fields.description = description.trim().to_string();
        }
        if let Some(cost) = self.cost {
            fields.cost = cost;
        }
        if let Some(ref performed_by) = self.performed_by {
            fields.performed_by = performed_by.trim().to_string();
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

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cost: Decimal) -> Maintenance {
        let now = Utc::now();
        Maintenance {
            id: 1,
            asset_id: 2,
            maintenance_date: now.date_naive(),
            maintenance_type: MaintenanceType::Repair,
            description: "Replace fan".to_string(),
            cost,
            performed_by: DEFAULT_PERFORMER.to_string(),
            status: MaintenanceStatus::Completed,
            notes: None,
            created_by: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_cost_is_a_json_number() {
        let value = serde_json::to_value(record(Decimal::new(1250, 2))).unwrap();
        assert_eq!(value["cost"], serde_json::json!(12.5));

        let value = serde_json::to_value(record(Decimal::ZERO)).unwrap();
        assert!(value["cost"].is_number());
    }

    #[test]
    fn test_input_cost_accepts_numbers_and_strings() {
        let input: MaintenanceInput =
            serde_json::from_value(serde_json::json!({ "cost": 99.99 })).unwrap();
        assert_eq!(input.cost, Some(Decimal::new(9999, 2)));

        let input: MaintenanceInput =
            serde_json::from_value(serde_json::json!({ "cost": "40" })).unwrap();
        assert_eq!(input.cost, Some(Decimal::new(40, 0)));
    }
}
