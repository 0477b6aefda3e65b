//! Asset status synchronization
//!
//! Assignment, maintenance and disposal writes all move the asset they point
//! at through the same state machine. [`transition`] is the pure rule table;
//! [`StatusSync`] reads the asset, applies the rule and writes the result.
//!
//! The ledger write and the asset write are two separate store operations.
//! When the second one fails the ledger and the registry disagree until
//! someone fixes the asset by hand; the failure is logged and returned.

use std::sync::Arc;

use crate::{
    config::{SyncConfig, UnresolvedAssignmentPolicy},
    error::{AppError, AppResult},
    models::{
        asset::{AssetStateChange, AssigneeChange},
        enums::{AssetStatus, AssignmentStatus, MaintenanceStatus},
    },
    repository::AssetsRepository,
};

/// Something that happened in a ledger and may move an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEvent {
    /// An assignment became active for this user
    AssignmentActivated { assignee: i32 },
    /// The active assignment ended (returned, deleted, or moved to another asset)
    AssignmentReleased,
    AssignmentLost,
    AssignmentDamaged,
    MaintenanceStarted,
    MaintenanceCompleted,
    Disposed,
}

impl LedgerEvent {
    /// Event raised by an assignment entering `status`
    pub fn for_assignment(status: AssignmentStatus, assignee: i32) -> Self {
        match status {
            AssignmentStatus::Assigned => LedgerEvent::AssignmentActivated { assignee },
            AssignmentStatus::Returned => LedgerEvent::AssignmentReleased,
            AssignmentStatus::Lost => LedgerEvent::AssignmentLost,
            AssignmentStatus::Damaged => LedgerEvent::AssignmentDamaged,
        }
    }

    /// Event raised by a maintenance record entering `status`, if any
    pub fn for_maintenance(status: MaintenanceStatus) -> Option<Self> {
        match status {
            MaintenanceStatus::InProgress => Some(LedgerEvent::MaintenanceStarted),
            MaintenanceStatus::Completed => Some(LedgerEvent::MaintenanceCompleted),
            MaintenanceStatus::Scheduled | MaintenanceStatus::Cancelled => None,
        }
    }
}

fn unresolved(policy: UnresolvedAssignmentPolicy) -> Option<AssetStateChange> {
    match policy {
        UnresolvedAssignmentPolicy::Ignore => None,
        UnresolvedAssignmentPolicy::Release => Some(AssetStateChange {
            status: AssetStatus::Available,
            assigned_to: AssigneeChange::Clear,
        }),
        UnresolvedAssignmentPolicy::Retire => Some(AssetStateChange {
            status: AssetStatus::Retired,
            assigned_to: AssigneeChange::Clear,
        }),
        UnresolvedAssignmentPolicy::Maintenance => Some(AssetStateChange {
            status: AssetStatus::UnderMaintenance,
            assigned_to: AssigneeChange::Keep,
        }),
    }
}

/// Asset change implied by `event` for an asset currently in `current`
pub fn transition(
    current: AssetStatus,
    event: LedgerEvent,
    policy: &SyncConfig,
) -> Option<AssetStateChange> {
    match event {
        LedgerEvent::AssignmentActivated { assignee } => Some(AssetStateChange {
            status: AssetStatus::InUse,
            assigned_to: AssigneeChange::Set(assignee),
        }),
        LedgerEvent::AssignmentReleased => Some(AssetStateChange {
            status: AssetStatus::Available,
            assigned_to: AssigneeChange::Clear,
        }),
        LedgerEvent::AssignmentLost => unresolved(policy.lost_assignment),
        LedgerEvent::AssignmentDamaged => unresolved(policy.damaged_assignment),
        LedgerEvent::MaintenanceStarted => Some(AssetStateChange {
            status: AssetStatus::UnderMaintenance,
            assigned_to: AssigneeChange::Keep,
        }),
        LedgerEvent::MaintenanceCompleted => {
            (current == AssetStatus::UnderMaintenance).then_some(AssetStateChange {
                status: AssetStatus::Available,
                assigned_to: AssigneeChange::Keep,
            })
        }
        LedgerEvent::Disposed => Some(AssetStateChange {
            status: AssetStatus::Disposed,
            assigned_to: AssigneeChange::Keep,
        }),
    }
}

/// Applies ledger events to the asset registry
#[derive(Clone)]
pub struct StatusSync {
    assets: Arc<dyn AssetsRepository>,
    policy: SyncConfig,
}

impl StatusSync {
    pub fn new(assets: Arc<dyn AssetsRepository>, policy: SyncConfig) -> Self {
        Self { assets, policy }
    }

    /// Move `asset_id` according to `event`.
    ///
    /// A missing asset is not an error: ledgers hold weak references and the
    /// asset may have been deleted since the record was written.
    pub async fn apply(&self, asset_id: i32, event: LedgerEvent) -> AppResult<()> {
        let asset = match self.assets.get_by_id(asset_id).await {
            Ok(asset) => asset,
            Err(AppError::NotFound(_)) => {
                tracing::warn!(asset_id, ?event, "Ledger event for unknown asset ignored");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let Some(change) = transition(asset.status, event, &self.policy) else {
            tracing::debug!(asset_id, ?event, status = %asset.status, "Asset status unchanged");
            return Ok(());
        };

        match self.assets.set_state(asset_id, &change).await {
            Ok(updated) => {
                tracing::info!(
                    asset_id,
                    ?event,
                    from = %asset.status,
                    to = %updated.status,
                    assigned_to = ?updated.assigned_to,
                    "Asset status synchronized"
                );
                Ok(())
            }
            Err(AppError::NotFound(_)) => {
                tracing::warn!(asset_id, ?event, "Asset vanished before its status could be synchronized");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    asset_id,
                    ?event,
                    error = %e,
                    "Ledger written but asset status update failed; registry is out of sync"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::asset::Asset, repository::MockAssetsRepository};
    use chrono::Utc;

    fn policy() -> SyncConfig {
        SyncConfig::default()
    }

    fn asset(status: AssetStatus, assigned_to: Option<i32>) -> Asset {
        let now = Utc::now();
        Asset {
            id: 1,
            name: "Laptop".to_string(),
            asset_type: "Laptop".to_string(),
            serial_number: "SN1".to_string(),
            purchase_date: now.date_naive(),
            warranty_end_date: None,
            status,
            location: "Storage".to_string(),
            assigned_to,
            notes: None,
            created_by: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_activation_puts_asset_in_use() {
        for current in [AssetStatus::Available, AssetStatus::UnderMaintenance, AssetStatus::InUse] {
            let change =
                transition(current, LedgerEvent::AssignmentActivated { assignee: 9 }, &policy());
            assert_eq!(
                change,
                Some(AssetStateChange {
                    status: AssetStatus::InUse,
                    assigned_to: AssigneeChange::Set(9),
                })
            );
        }
    }

    #[test]
    fn test_release_frees_asset() {
        let change = transition(AssetStatus::InUse, LedgerEvent::AssignmentReleased, &policy());
        assert_eq!(
            change,
            Some(AssetStateChange {
                status: AssetStatus::Available,
                assigned_to: AssigneeChange::Clear,
            })
        );
    }

    #[test]
    fn test_lost_and_damaged_ignored_by_default() {
        assert_eq!(transition(AssetStatus::InUse, LedgerEvent::AssignmentLost, &policy()), None);
        assert_eq!(transition(AssetStatus::InUse, LedgerEvent::AssignmentDamaged, &policy()), None);
    }

    #[test]
    fn test_lost_and_damaged_follow_policy() {
        let policy = SyncConfig {
            lost_assignment: UnresolvedAssignmentPolicy::Retire,
            damaged_assignment: UnresolvedAssignmentPolicy::Maintenance,
        };
        assert_eq!(
            transition(AssetStatus::InUse, LedgerEvent::AssignmentLost, &policy),
            Some(AssetStateChange {
                status: AssetStatus::Retired,
                assigned_to: AssigneeChange::Clear,
            })
        );
        assert_eq!(
            transition(AssetStatus::InUse, LedgerEvent::AssignmentDamaged, &policy),
            Some(AssetStateChange {
                status: AssetStatus::UnderMaintenance,
                assigned_to: AssigneeChange::Keep,
            })
        );
    }

    #[test]
    fn test_maintenance_completion_only_frees_assets_under_maintenance() {
        let freed = transition(
            AssetStatus::UnderMaintenance,
            LedgerEvent::MaintenanceCompleted,
            &policy(),
        );
        assert_eq!(freed.map(|c| c.status), Some(AssetStatus::Available));

        for current in [
            AssetStatus::Available,
            AssetStatus::InUse,
            AssetStatus::Disposed,
            AssetStatus::Retired,
        ] {
            assert_eq!(transition(current, LedgerEvent::MaintenanceCompleted, &policy()), None);
        }
    }

    #[test]
    fn test_disposal_always_wins() {
        for current in [
            AssetStatus::Available,
            AssetStatus::InUse,
            AssetStatus::UnderMaintenance,
            AssetStatus::Disposed,
            AssetStatus::Retired,
        ] {
            let change = transition(current, LedgerEvent::Disposed, &policy());
            assert_eq!(change.map(|c| c.status), Some(AssetStatus::Disposed));
        }
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            LedgerEvent::for_assignment(AssignmentStatus::Assigned, 3),
            LedgerEvent::AssignmentActivated { assignee: 3 }
        );
        assert_eq!(
            LedgerEvent::for_assignment(AssignmentStatus::Returned, 3),
            LedgerEvent::AssignmentReleased
        );
        assert_eq!(LedgerEvent::for_maintenance(MaintenanceStatus::Scheduled), None);
        assert_eq!(LedgerEvent::for_maintenance(MaintenanceStatus::Cancelled), None);
        assert_eq!(
            LedgerEvent::for_maintenance(MaintenanceStatus::InProgress),
            Some(LedgerEvent::MaintenanceStarted)
        );
    }

    #[tokio::test]
    async fn test_apply_skips_write_when_rule_says_nothing() {
        let mut assets = MockAssetsRepository::new();
        assets
            .expect_get_by_id()
            .returning(|_| Ok(asset(AssetStatus::Available, None)));
        assets.expect_set_state().never();

        let sync = StatusSync::new(Arc::new(assets), policy());
        sync.apply(1, LedgerEvent::MaintenanceCompleted).await.unwrap();
    }

    #[tokio::test]
    async fn test_apply_writes_computed_change() {
        let mut assets = MockAssetsRepository::new();
        assets
            .expect_get_by_id()
            .returning(|_| Ok(asset(AssetStatus::InUse, Some(4))));
        assets
            .expect_set_state()
            .withf(|id, change| {
                *id == 1
                    && *change
                        == AssetStateChange {
                            status: AssetStatus::Available,
                            assigned_to: AssigneeChange::Clear,
                        }
            })
            .times(1)
            .returning(|_, _| Ok(asset(AssetStatus::Available, None)));

        let sync = StatusSync::new(Arc::new(assets), policy());
        sync.apply(1, LedgerEvent::AssignmentReleased).await.unwrap();
    }

    #[tokio::test]
    async fn test_apply_ignores_unknown_asset() {
        let mut assets = MockAssetsRepository::new();
        assets
            .expect_get_by_id()
            .returning(|_| Err(AppError::NotFound("Asset not found".to_string())));
        assets.expect_set_state().never();

        let sync = StatusSync::new(Arc::new(assets), policy());
        sync.apply(99, LedgerEvent::Disposed).await.unwrap();
    }

    #[tokio::test]
    async fn test_apply_surfaces_failed_status_write() {
        let mut assets = MockAssetsRepository::new();
        assets
            .expect_get_by_id()
            .returning(|_| Ok(asset(AssetStatus::Available, None)));
        assets
            .expect_set_state()
            .returning(|_, _| Err(AppError::Internal("connection reset".to_string())));

        let sync = StatusSync::new(Arc::new(assets), policy());
        let err = sync.apply(1, LedgerEvent::Disposed).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
