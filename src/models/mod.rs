//! Data models for Assetrack

pub mod asset;
pub mod assignment;
pub mod disposal;
pub mod enums;
pub mod maintenance;
pub mod user;

// Re-export commonly used types
pub use asset::{Asset, AssetDetails, AssetSummary};
pub use assignment::{Assignment, AssignmentDetails};
pub use disposal::{Disposal, DisposalDetails};
pub use enums::{AssetStatus, AssignmentStatus, DisposalMethod, MaintenanceStatus, MaintenanceType};
pub use maintenance::{Maintenance, MaintenanceDetails};
pub use user::{User, UserSummary};
