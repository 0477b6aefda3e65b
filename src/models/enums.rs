//! Shared domain enums
//!
//! Every enum here travels on the wire and in the database as its
//! human-readable label ("In Use", "Under Maintenance", ...).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Implements `as_str`, `Display`, `FromStr` and TEXT column mapping for a label enum
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $label => Ok($name::$variant), )+
                    _ => Err(format!("Invalid {} value: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = sqlx::Decode::<sqlx::Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// AssetStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum AssetStatus {
    #[default]
    Available,
    #[serde(rename = "In Use")]
    InUse,
    #[serde(rename = "Under Maintenance")]
    UnderMaintenance,
    Disposed,
    Retired,
}

text_enum!(AssetStatus {
    Available => "Available",
    InUse => "In Use",
    UnderMaintenance => "Under Maintenance",
    Disposed => "Disposed",
    Retired => "Retired",
});

// ---------------------------------------------------------------------------
// AssignmentStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum AssignmentStatus {
    #[default]
    Assigned,
    Returned,
    Lost,
    Damaged,
}

text_enum!(AssignmentStatus {
    Assigned => "Assigned",
    Returned => "Returned",
    Lost => "Lost",
    Damaged => "Damaged",
});

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MaintenanceType {
    Preventive,
    Repair,
    Upgrade,
    Inspection,
    Other,
}

text_enum!(MaintenanceType {
    Preventive => "Preventive",
    Repair => "Repair",
    Upgrade => "Upgrade",
    Inspection => "Inspection",
    Other => "Other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum MaintenanceStatus {
    #[default]
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

text_enum!(MaintenanceStatus {
    Scheduled => "Scheduled",
    InProgress => "In Progress",
    Completed => "Completed",
    Cancelled => "Cancelled",
});

// ---------------------------------------------------------------------------
// DisposalMethod
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DisposalMethod {
    Recycled,
    Donated,
    Sold,
    Destroyed,
    Other,
}

text_enum!(DisposalMethod {
    Recycled => "Recycled",
    Donated => "Donated",
    Sold => "Sold",
    Destroyed => "Destroyed",
    Other => "Other",
});
