//! Assignment ledger service

use chrono::Utc;
use validator::Validate;

use super::{
    status_sync::{LedgerEvent, StatusSync},
    References,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        assignment::{Assignment, AssignmentDetails, AssignmentFields, AssignmentInput},
        enums::AssignmentStatus,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AssignmentsService {
    repository: Repository,
    sync: StatusSync,
}

impl AssignmentsService {
    pub fn new(repository: Repository, sync: StatusSync) -> Self {
        Self { repository, sync }
    }

    pub async fn list(&self) -> AppResult<Vec<AssignmentDetails>> {
        let records = self.repository.assignments.list().await?;
        self.with_references(records).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<AssignmentDetails> {
        let record = self.repository.assignments.get_by_id(id).await?;
        self.with_references(vec![record])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Assignment lookup returned nothing".to_string()))
    }

    /// Hand an asset to a user. The asset becomes In Use by that user.
    pub async fn create(&self, data: &AssignmentInput, created_by: i32) -> AppResult<Assignment> {
        data.validate()?;

        let (Some(asset_id), Some(assignee)) = (data.asset, data.assigned_to) else {
            return Err(AppError::Validation(
                "Please provide both asset and assignedTo".to_string(),
            ));
        };

        self.repository.assets.get_by_id(asset_id).await?;
        self.repository.users.get_by_id(assignee).await?;
        self.ensure_not_held(asset_id, None).await?;

        let fields = AssignmentFields {
            asset_id,
            assigned_to: assignee,
            assignment_date: data
                .assignment_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            return_date: data.return_date,
            status: data.status.unwrap_or_default(),
            notes: data.notes.clone(),
        };

        let record = self
            .repository
            .assignments
            .create(&fields, created_by)
            .await?;
        tracing::info!(
            assignment_id = record.id,
            asset_id,
            assigned_to = assignee,
            status = %record.status,
            "Assignment created"
        );

        self.sync
            .apply(asset_id, LedgerEvent::AssignmentActivated { assignee })
            .await?;

        Ok(record)
    }

    /// Merge `data` into an assignment and move the affected asset(s)
    pub async fn update(&self, id: i32, data: &AssignmentInput) -> AppResult<Assignment> {
        data.validate()?;

        let current = self.repository.assignments.get_by_id(id).await?;
        let fields = data.merge_into(&current);
        let asset_changed = fields.asset_id != current.asset_id;

        if asset_changed {
            self.repository.assets.get_by_id(fields.asset_id).await?;
            self.ensure_not_held(fields.asset_id, Some(id)).await?;
        } else if fields.status == AssignmentStatus::Assigned
            && current.status != AssignmentStatus::Assigned
        {
            self.ensure_not_held(fields.asset_id, Some(id)).await?;
        }
        if fields.assigned_to != current.assigned_to {
            self.repository.users.get_by_id(fields.assigned_to).await?;
        }

        let record = self.repository.assignments.update(id, &fields).await?;
        tracing::info!(
            assignment_id = id,
            asset_id = record.asset_id,
            from = %current.status,
            to = %record.status,
            "Assignment updated"
        );

        let activated = LedgerEvent::AssignmentActivated {
            assignee: record.assigned_to,
        };

        if asset_changed {
            self.sync
                .apply(current.asset_id, LedgerEvent::AssignmentReleased)
                .await?;
            if record.status == AssignmentStatus::Assigned {
                self.sync.apply(record.asset_id, activated).await?;
            }
        } else if record.status != current.status {
            let event = LedgerEvent::for_assignment(record.status, record.assigned_to);
            self.sync.apply(record.asset_id, event).await?;
        } else if record.status == AssignmentStatus::Assigned
            && record.assigned_to != current.assigned_to
        {
            // Same active record handed to someone else
            self.sync.apply(record.asset_id, activated).await?;
        }

        Ok(record)
    }

    /// Delete an assignment, releasing its asset first if it was active
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let record = self.repository.assignments.get_by_id(id).await?;

        if record.status == AssignmentStatus::Assigned {
            self.sync
                .apply(record.asset_id, LedgerEvent::AssignmentReleased)
                .await?;
        }

        self.repository.assignments.delete(id).await?;
        tracing::info!(assignment_id = id, asset_id = record.asset_id, "Assignment deleted");
        Ok(())
    }

    /// Fail with a conflict naming the holder when another record is active
    async fn ensure_not_held(&self, asset_id: i32, except: Option<i32>) -> AppResult<()> {
        let Some(active) = self
            .repository
            .assignments
            .find_active_for_asset(asset_id)
            .await?
        else {
            return Ok(());
        };
        if Some(active.id) == except {
            return Ok(());
        }

        let holder = match self.repository.users.get_by_id(active.assigned_to).await {
            Ok(user) => user.name,
            Err(AppError::NotFound(_)) => format!("user {}", active.assigned_to),
            Err(e) => return Err(e),
        };
        Err(AppError::Conflict(format!(
            "Asset is already assigned to {}",
            holder
        )))
    }

    async fn with_references(&self, records: Vec<Assignment>) -> AppResult<Vec<AssignmentDetails>> {
        let asset_ids = records.iter().map(|r| r.asset_id).collect();
        let user_ids = records
            .iter()
            .flat_map(|r| [r.assigned_to, r.created_by])
            .collect();
        let refs = References::load(&self.repository, asset_ids, user_ids).await?;

        Ok(records
            .into_iter()
            .map(|assignment| AssignmentDetails {
                asset_info: refs.asset(assignment.asset_id),
                assignee: refs.user(assignment.assigned_to),
                creator: refs.user(assignment.created_by),
                assignment,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{SyncConfig, UnresolvedAssignmentPolicy},
        models::{
            asset::{Asset, AssetFields},
            enums::AssetStatus,
            user::UserFields,
        },
    };
    use chrono::NaiveDate;

    struct Fixture {
        service: AssignmentsService,
        repository: Repository,
        alice: i32,
        bob: i32,
    }

    async fn user(repository: &Repository, name: &str, email: &str) -> i32 {
        repository
            .users
            .create(&UserFields {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                university: None,
                address: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn setup_with(policy: SyncConfig) -> Fixture {
        let repository = Repository::in_memory();
        let alice = user(&repository, "Alice", "a@x.com").await;
        let bob = user(&repository, "Bob", "b@x.com").await;
        let sync = StatusSync::new(repository.assets.clone(), policy);
        Fixture {
            service: AssignmentsService::new(repository.clone(), sync),
            repository,
            alice,
            bob,
        }
    }

    async fn setup() -> Fixture {
        setup_with(SyncConfig::default()).await
    }

    async fn asset(fx: &Fixture, serial: &str) -> i32 {
        fx.repository
            .assets
            .create(
                &AssetFields {
                    name: format!("Laptop {}", serial),
                    asset_type: "Laptop".to_string(),
                    serial_number: serial.to_string(),
                    purchase_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    warranty_end_date: None,
                    status: AssetStatus::Available,
                    location: "Storage".to_string(),
                    assigned_to: None,
                    notes: None,
                },
                fx.alice,
            )
            .await
            .unwrap()
            .id
    }

    async fn reload(fx: &Fixture, id: i32) -> Asset {
        fx.repository.assets.get_by_id(id).await.unwrap()
    }

    fn assign(asset: i32, user: i32) -> AssignmentInput {
        AssignmentInput {
            asset: Some(asset),
            assigned_to: Some(user),
            ..Default::default()
        }
    }

    fn with_status(status: AssignmentStatus) -> AssignmentInput {
        AssignmentInput {
            status: Some(status),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_assign_and_return_round_trip() {
        let fx = setup().await;
        let asset_id = asset(&fx, "SN1").await;

        let record = fx.service.create(&assign(asset_id, fx.bob), fx.alice).await.unwrap();
        assert_eq!(record.status, AssignmentStatus::Assigned);
        assert_eq!(record.created_by, fx.alice);

        let held = reload(&fx, asset_id).await;
        assert_eq!(held.status, AssetStatus::InUse);
        assert_eq!(held.assigned_to, Some(fx.bob));

        fx.service
            .update(record.id, &with_status(AssignmentStatus::Returned))
            .await
            .unwrap();

        let released = reload(&fx, asset_id).await;
        assert_eq!(released.status, AssetStatus::Available);
        assert_eq!(released.assigned_to, None);
    }

    #[tokio::test]
    async fn test_create_requires_asset_and_assignee() {
        let fx = setup().await;
        let err = fx
            .service
            .create(
                &AssignmentInput {
                    asset: Some(1),
                    ..Default::default()
                },
                fx.alice,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_with_unknown_references_is_not_found() {
        let fx = setup().await;
        let asset_id = asset(&fx, "SN1").await;

        let err = fx.service.create(&assign(99, fx.bob), fx.alice).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = fx.service.create(&assign(asset_id, 99), fx.alice).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_second_active_assignment_conflicts_and_names_holder() {
        let fx = setup().await;
        let asset_id = asset(&fx, "SN1").await;
        fx.service.create(&assign(asset_id, fx.bob), fx.alice).await.unwrap();

        let err = fx.service.create(&assign(asset_id, fx.alice), fx.alice).await.unwrap_err();
        match err {
            AppError::Conflict(message) => assert!(message.contains("Bob")),
            other => panic!("expected conflict, got {:?}", other),
        }
        assert_eq!(fx.repository.assignments.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reactivating_a_returned_record_names_current_holder() {
        let fx = setup().await;
        let asset_id = asset(&fx, "SN1").await;
        let first = fx.service.create(&assign(asset_id, fx.bob), fx.alice).await.unwrap();
        fx.service
            .update(first.id, &with_status(AssignmentStatus::Returned))
            .await
            .unwrap();
        fx.service.create(&assign(asset_id, fx.alice), fx.alice).await.unwrap();

        let err = fx
            .service
            .update(first.id, &with_status(AssignmentStatus::Assigned))
            .await
            .unwrap_err();
        match err {
            AppError::Conflict(message) => {
                assert_eq!(message, "Asset is already assigned to Alice")
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        let unchanged = fx.repository.assignments.get_by_id(first.id).await.unwrap();
        assert_eq!(unchanged.status, AssignmentStatus::Returned);
        assert_eq!(reload(&fx, asset_id).await.assigned_to, Some(fx.alice));
    }

    #[tokio::test]
    async fn test_returned_asset_can_be_assigned_again() {
        let fx = setup().await;
        let asset_id = asset(&fx, "SN1").await;
        let first = fx.service.create(&assign(asset_id, fx.bob), fx.alice).await.unwrap();
        fx.service
            .update(first.id, &with_status(AssignmentStatus::Returned))
            .await
            .unwrap();

        fx.service.create(&assign(asset_id, fx.alice), fx.alice).await.unwrap();
        assert_eq!(reload(&fx, asset_id).await.assigned_to, Some(fx.alice));
    }

    #[tokio::test]
    async fn test_reactivating_sets_asset_in_use() {
        let fx = setup().await;
        let asset_id = asset(&fx, "SN1").await;
        let record = fx.service.create(&assign(asset_id, fx.bob), fx.alice).await.unwrap();
        fx.service
            .update(record.id, &with_status(AssignmentStatus::Returned))
            .await
            .unwrap();

        fx.service
            .update(record.id, &with_status(AssignmentStatus::Assigned))
            .await
            .unwrap();

        let asset = reload(&fx, asset_id).await;
        assert_eq!(asset.status, AssetStatus::InUse);
        assert_eq!(asset.assigned_to, Some(fx.bob));
    }

    #[tokio::test]
    async fn test_lost_leaves_asset_untouched_by_default() {
        let fx = setup().await;
        let asset_id = asset(&fx, "SN1").await;
        let record = fx.service.create(&assign(asset_id, fx.bob), fx.alice).await.unwrap();

        fx.service
            .update(record.id, &with_status(AssignmentStatus::Lost))
            .await
            .unwrap();

        let asset = reload(&fx, asset_id).await;
        assert_eq!(asset.status, AssetStatus::InUse);
        assert_eq!(asset.assigned_to, Some(fx.bob));
    }

    #[tokio::test]
    async fn test_damaged_follows_configured_policy() {
        let fx = setup_with(SyncConfig {
            damaged_assignment: UnresolvedAssignmentPolicy::Maintenance,
            ..Default::default()
        })
        .await;
        let asset_id = asset(&fx, "SN1").await;
        let record = fx.service.create(&assign(asset_id, fx.bob), fx.alice).await.unwrap();

        fx.service
            .update(record.id, &with_status(AssignmentStatus::Damaged))
            .await
            .unwrap();

        let asset = reload(&fx, asset_id).await;
        assert_eq!(asset.status, AssetStatus::UnderMaintenance);
        assert_eq!(asset.assigned_to, Some(fx.bob));
    }

    #[tokio::test]
    async fn test_moving_to_another_asset_releases_the_old_one() {
        let fx = setup().await;
        let first = asset(&fx, "SN1").await;
        let second = asset(&fx, "SN2").await;
        let record = fx.service.create(&assign(first, fx.bob), fx.alice).await.unwrap();

        fx.service
            .update(
                record.id,
                &AssignmentInput {
                    asset: Some(second),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let old = reload(&fx, first).await;
        assert_eq!(old.status, AssetStatus::Available);
        assert_eq!(old.assigned_to, None);

        let new = reload(&fx, second).await;
        assert_eq!(new.status, AssetStatus::InUse);
        assert_eq!(new.assigned_to, Some(fx.bob));
    }

    #[tokio::test]
    async fn test_moving_onto_a_held_asset_conflicts() {
        let fx = setup().await;
        let first = asset(&fx, "SN1").await;
        let second = asset(&fx, "SN2").await;
        let record = fx.service.create(&assign(first, fx.bob), fx.alice).await.unwrap();
        fx.service.create(&assign(second, fx.alice), fx.alice).await.unwrap();

        let err = fx
            .service
            .update(
                record.id,
                &AssignmentInput {
                    asset: Some(second),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Nothing moved
        assert_eq!(reload(&fx, first).await.assigned_to, Some(fx.bob));
        assert_eq!(reload(&fx, second).await.assigned_to, Some(fx.alice));
    }

    #[tokio::test]
    async fn test_delete_active_assignment_releases_asset() {
        let fx = setup().await;
        let asset_id = asset(&fx, "SN1").await;
        let record = fx.service.create(&assign(asset_id, fx.bob), fx.alice).await.unwrap();

        fx.service.delete(record.id).await.unwrap();

        let asset = reload(&fx, asset_id).await;
        assert_eq!(asset.status, AssetStatus::Available);
        assert_eq!(asset.assigned_to, None);
        assert!(fx.repository.assignments.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_inactive_assignment_leaves_asset() {
        let fx = setup().await;
        let asset_id = asset(&fx, "SN1").await;
        let record = fx.service.create(&assign(asset_id, fx.bob), fx.alice).await.unwrap();
        fx.service
            .update(record.id, &with_status(AssignmentStatus::Lost))
            .await
            .unwrap();

        fx.service.delete(record.id).await.unwrap();

        let asset = reload(&fx, asset_id).await;
        assert_eq!(asset.status, AssetStatus::InUse);
        assert_eq!(asset.assigned_to, Some(fx.bob));
    }

    #[tokio::test]
    async fn test_unknown_assignment_is_not_found() {
        let fx = setup().await;
        let err = fx.service.get_by_id(5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = fx.service.delete(5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_details_survive_asset_deletion() {
        let fx = setup().await;
        let asset_id = asset(&fx, "SN1").await;
        let record = fx.service.create(&assign(asset_id, fx.bob), fx.alice).await.unwrap();
        fx.repository.assets.delete(asset_id).await.unwrap();

        let details = fx.service.get_by_id(record.id).await.unwrap();
        assert!(details.asset_info.is_none());
        assert_eq!(details.assignee.map(|u| u.name), Some("Bob".to_string()));

        // Releasing a deleted asset is not an error
        fx.service.delete(record.id).await.unwrap();
    }
}
