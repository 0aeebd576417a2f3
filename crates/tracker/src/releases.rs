//! Release lifecycle management.
//!
//! Promotion and rollback follow the same sequence within a single transaction:
//!
//! 1. The acting user is resolved.
//! 2. The release row is loaded and locked.
//! 3. The target stage is computed with [`Environment::next`] or [`Environment::previous`].
//! 4. The stage is written, guarded by the stage observed in step 2.
//! 5. A successful deployment log record for the target stage is inserted.
//!
//! Either both writes are committed or neither is, so the stored stage
//! always agrees with the latest transition record of a release.

use std::sync::Arc;

use db::{
    current_timestamp, environment::Environment, release, sea_query::Expr, ActiveValue,
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use tracing::{debug, info};

use crate::{
    recorder::{self, NewDeploymentLog},
    users,
};

/// Errors that may occur during release management.
#[derive(Debug, Display, From, Error)]
pub enum ReleaseError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Requested release does not exist.
    #[display(fmt = "release not found")]
    ReleaseNotFound,

    /// Release owner or acting user does not exist.
    #[display(fmt = "user not found")]
    UserNotFound,

    /// Another release already uses the provided version number.
    #[display(fmt = "release version already exists")]
    DuplicateVersion,

    /// Promotion was requested for a release at the last stage.
    #[display(fmt = "release is already at the final stage and cannot be promoted further")]
    AlreadyAtFinalStage,

    /// Rollback was requested for a release at the first stage.
    #[display(fmt = "release is already at the first stage and cannot be rolled back further")]
    AlreadyAtFirstStage,
}

/// Direction of a release movement along the environment ladder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    Promote,
    Rollback,
}

impl Transition {
    /// Stage a release at `from` ends up at, if the transition is possible.
    pub fn target(self, from: Environment) -> Option<Environment> {
        match self {
            Transition::Promote => from.next(),
            Transition::Rollback => from.previous(),
        }
    }

    fn boundary_error(self) -> ReleaseError {
        match self {
            Transition::Promote => ReleaseError::AlreadyAtFinalStage,
            Transition::Rollback => ReleaseError::AlreadyAtFirstStage,
        }
    }

    fn notes(self, from: Environment, to: Environment) -> String {
        let (from, to) = (from.as_str(), to.as_str());

        match self {
            Transition::Promote => format!("Release promoted from {from} to {to}"),
            Transition::Rollback => format!("Release rolled back from {from} to {to}"),
        }
    }
}

/// Editable release fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseDetails {
    pub version_number: String,
    pub description: String,
    pub owner_id: i64,
}

/// Release lifecycle handle.
#[derive(Clone)]
pub struct ReleaseManager {
    db: Arc<DatabaseConnection>,
}

impl ReleaseManager {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new release at the first stage of the environment ladder.
    pub async fn create(&self, details: ReleaseDetails) -> Result<release::Model, ReleaseError> {
        self.db
            .transaction::<_, release::Model, ReleaseError>(|txn| {
                Box::pin(async move {
                    if !users::exists(txn, details.owner_id).await? {
                        return Err(ReleaseError::UserNotFound);
                    }

                    if version_taken(txn, &details.version_number, None).await? {
                        debug!(version = %details.version_number, "duplicate release version");
                        return Err(ReleaseError::DuplicateVersion);
                    }

                    let now = current_timestamp();

                    let model = release::Entity::insert(release::ActiveModel {
                        version_number: ActiveValue::Set(details.version_number),
                        description: ActiveValue::Set(details.description),
                        owner_id: ActiveValue::Set(details.owner_id),
                        current_environment: ActiveValue::Set(Environment::first()),
                        created_at: ActiveValue::Set(now),
                        updated_at: ActiveValue::Set(now),
                        ..Default::default()
                    })
                    .exec_with_returning(txn)
                    .await?;

                    info!(
                        release_id = model.id,
                        version = %model.version_number,
                        "release created"
                    );

                    Ok(model)
                })
            })
            .await
            .into_raw_result()
    }

    pub async fn find_by_id(&self, release_id: i64) -> Result<Option<release::Model>, DbErr> {
        release::Entity::find_by_id(release_id).one(&*self.db).await
    }

    pub async fn get_by_id(&self, release_id: i64) -> Result<release::Model, ReleaseError> {
        self.find_by_id(release_id)
            .await?
            .ok_or(ReleaseError::ReleaseNotFound)
    }

    pub async fn get_by_version(
        &self,
        version_number: &str,
    ) -> Result<release::Model, ReleaseError> {
        release::Entity::find()
            .filter(release::Column::VersionNumber.eq(version_number))
            .one(&*self.db)
            .await?
            .ok_or(ReleaseError::ReleaseNotFound)
    }

    /// List all releases, newest first.
    pub async fn list_all(&self) -> Result<Vec<release::Model>, DbErr> {
        release::Entity::find()
            .order_by_desc(release::Column::CreatedAt)
            .order_by_desc(release::Column::Id)
            .all(&*self.db)
            .await
    }

    pub async fn list_by_environment(
        &self,
        environment: Environment,
    ) -> Result<Vec<release::Model>, DbErr> {
        release::Entity::find()
            .filter(release::Column::CurrentEnvironment.eq(environment))
            .order_by_desc(release::Column::CreatedAt)
            .order_by_desc(release::Column::Id)
            .all(&*self.db)
            .await
    }

    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<release::Model>, DbErr> {
        release::Entity::find()
            .filter(release::Column::OwnerId.eq(owner_id))
            .order_by_desc(release::Column::CreatedAt)
            .order_by_desc(release::Column::Id)
            .all(&*self.db)
            .await
    }

    /// Move a release one stage forward.
    pub async fn promote(
        &self,
        release_id: i64,
        actor_id: i64,
    ) -> Result<release::Model, ReleaseError> {
        self.transition(release_id, actor_id, Transition::Promote)
            .await
    }

    /// Move a release one stage backward.
    pub async fn rollback(
        &self,
        release_id: i64,
        actor_id: i64,
    ) -> Result<release::Model, ReleaseError> {
        self.transition(release_id, actor_id, Transition::Rollback)
            .await
    }

    /// Move a release along the environment ladder and record the deployment.
    ///
    /// Records created by this method are always successful: a transition that
    /// can not be performed is rejected before anything is written.
    pub async fn transition(
        &self,
        release_id: i64,
        actor_id: i64,
        transition: Transition,
    ) -> Result<release::Model, ReleaseError> {
        self.db
            .transaction::<_, release::Model, ReleaseError>(|txn| {
                Box::pin(async move {
                    if !users::exists(txn, actor_id).await? {
                        return Err(ReleaseError::UserNotFound);
                    }

                    let release = release::Entity::find_by_id(release_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                        .ok_or(ReleaseError::ReleaseNotFound)?;

                    let from = release.current_environment;

                    let Some(to) = transition.target(from) else {
                        debug!(
                            release_id,
                            environment = from.as_str(),
                            ?transition,
                            "transition rejected"
                        );
                        return Err(transition.boundary_error());
                    };

                    let updated_at = current_timestamp();

                    let result = release::Entity::update_many()
                        .col_expr(release::Column::CurrentEnvironment, Expr::value(to).into())
                        .col_expr(release::Column::UpdatedAt, Expr::value(updated_at).into())
                        .filter(release::Column::Id.eq(release_id))
                        .filter(release::Column::CurrentEnvironment.eq(from))
                        .exec(txn)
                        .await?;

                    // Stage has changed since it was read, the transition is no longer valid.
                    if result.rows_affected != 1 {
                        return Err(ReleaseError::DatabaseError(DbErr::Custom(format!(
                            "release {release_id} was modified concurrently"
                        ))));
                    }

                    recorder::insert(
                        txn,
                        NewDeploymentLog::new(release_id, to, actor_id, true)
                            .with_notes(transition.notes(from, to)),
                    )
                    .await?;

                    info!(
                        release_id,
                        actor_id,
                        from = from.as_str(),
                        to = to.as_str(),
                        ?transition,
                        "release moved"
                    );

                    Ok(release::Model {
                        current_environment: to,
                        updated_at,
                        ..release
                    })
                })
            })
            .await
            .into_raw_result()
    }

    /// Overwrite version number, description and owner of a release.
    ///
    /// The current stage of a release is never changed by this method.
    pub async fn update(
        &self,
        release_id: i64,
        details: ReleaseDetails,
    ) -> Result<release::Model, ReleaseError> {
        self.db
            .transaction::<_, release::Model, ReleaseError>(|txn| {
                Box::pin(async move {
                    let release = release::Entity::find_by_id(release_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                        .ok_or(ReleaseError::ReleaseNotFound)?;

                    if version_taken(txn, &details.version_number, Some(release.id)).await? {
                        debug!(version = %details.version_number, "duplicate release version");
                        return Err(ReleaseError::DuplicateVersion);
                    }

                    if !users::exists(txn, details.owner_id).await? {
                        return Err(ReleaseError::UserNotFound);
                    }

                    let mut active_model: release::ActiveModel = release.into();
                    active_model.version_number = ActiveValue::Set(details.version_number);
                    active_model.description = ActiveValue::Set(details.description);
                    active_model.owner_id = ActiveValue::Set(details.owner_id);
                    active_model.updated_at = ActiveValue::Set(current_timestamp());

                    let model = release::Entity::update(active_model).exec(txn).await?;

                    info!(release_id, version = %model.version_number, "release updated");

                    Ok(model)
                })
            })
            .await
            .into_raw_result()
    }

    /// Delete a release together with its deployment history.
    pub async fn delete(&self, release_id: i64) -> Result<(), ReleaseError> {
        self.db
            .transaction::<_, (), ReleaseError>(|txn| {
                Box::pin(async move {
                    let exists = release::Entity::find_by_id(release_id)
                        .select_only()
                        .exists(txn)
                        .await?;

                    if !exists {
                        return Err(ReleaseError::ReleaseNotFound);
                    }

                    release::Entity::delete_by_id(release_id).exec(txn).await?;

                    info!(release_id, "release deleted");

                    Ok(())
                })
            })
            .await
            .into_raw_result()
    }
}

/// Check if the version number is used by any release other than `except`.
async fn version_taken<C: ConnectionTrait + Send>(
    conn: &C,
    version_number: &str,
    except: Option<i64>,
) -> Result<bool, DbErr> {
    let mut query = release::Entity::find()
        .select_only()
        .filter(release::Column::VersionNumber.eq(version_number));

    if let Some(release_id) = except {
        query = query.filter(release::Column::Id.ne(release_id));
    }

    query.exists(conn).await
}

#[cfg(test)]
mod tests {
    use db::{environment::Environment, release, EntityTrait};

    use super::{ReleaseDetails, ReleaseError, ReleaseManager, Transition};
    use crate::{
        recorder::DeploymentLogRecorder,
        testing::{create_database, create_release, create_user},
    };

    fn details(version_number: &str, owner_id: i64) -> ReleaseDetails {
        ReleaseDetails {
            version_number: String::from(version_number),
            description: String::from("Initial release"),
            owner_id,
        }
    }

    #[test]
    fn transition_notes() {
        assert_eq!(
            Transition::Promote.notes(Environment::Uat, Environment::Prod),
            "Release promoted from UAT to PROD"
        );
        assert_eq!(
            Transition::Rollback.notes(Environment::Qa, Environment::Dev),
            "Release rolled back from QA to DEV"
        );
    }

    #[tokio::test]
    async fn create() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;

        let manager = ReleaseManager::new(db);

        let release = manager.create(details("1.0.0", user.id)).await.unwrap();

        assert_eq!(release.version_number, "1.0.0");
        assert_eq!(release.description, "Initial release");
        assert_eq!(release.owner_id, user.id);
        assert_eq!(release.current_environment, Environment::Dev);
        assert_eq!(release.created_at, release.updated_at);

        assert_eq!(manager.get_by_id(release.id).await.unwrap(), release);
        assert_eq!(manager.get_by_version("1.0.0").await.unwrap(), release);
    }

    #[tokio::test]
    async fn create_duplicate_version() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;

        let manager = ReleaseManager::new(db.clone());

        manager.create(details("1.0.0", user.id)).await.unwrap();

        let err = manager.create(details("1.0.0", user.id)).await.unwrap_err();

        assert!(matches!(err, ReleaseError::DuplicateVersion));
        assert_eq!(release::Entity::find().all(&*db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_unknown_owner() {
        let db = create_database().await;

        let manager = ReleaseManager::new(db);

        let err = manager.create(details("1.0.0", 42)).await.unwrap_err();

        assert!(matches!(err, ReleaseError::UserNotFound));
        assert!(manager.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookups() {
        let db = create_database().await;
        let john = create_user(&db, "john.doe").await;
        let jane = create_user(&db, "jane.doe").await;

        let manager = ReleaseManager::new(db);

        let first = manager.create(details("1.0.0", john.id)).await.unwrap();
        let second = manager.create(details("1.1.0", jane.id)).await.unwrap();
        let third = manager.create(details("2.0.0", john.id)).await.unwrap();

        let second = manager.promote(second.id, jane.id).await.unwrap();

        assert_eq!(
            manager.list_all().await.unwrap(),
            vec![third.clone(), second.clone(), first.clone()]
        );
        assert_eq!(
            manager.list_by_owner(john.id).await.unwrap(),
            vec![third.clone(), first.clone()]
        );
        assert_eq!(
            manager.list_by_environment(Environment::Dev).await.unwrap(),
            vec![third, first]
        );
        assert_eq!(
            manager.list_by_environment(Environment::Qa).await.unwrap(),
            vec![second]
        );
        assert!(manager
            .list_by_environment(Environment::Prod)
            .await
            .unwrap()
            .is_empty());

        assert!(matches!(
            manager.get_by_id(1000).await,
            Err(ReleaseError::ReleaseNotFound)
        ));
        assert!(matches!(
            manager.get_by_version("9.9.9").await,
            Err(ReleaseError::ReleaseNotFound)
        ));
    }

    #[tokio::test]
    async fn promote() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;
        let release = create_release(&db, "1.0.0", user.id).await;

        let manager = ReleaseManager::new(db.clone());
        let recorder = DeploymentLogRecorder::new(db);

        let promoted = manager.promote(release.id, user.id).await.unwrap();

        assert_eq!(promoted.current_environment, Environment::Qa);
        assert_eq!(manager.get_by_id(release.id).await.unwrap(), promoted);

        let logs = recorder.list_by_release(release.id).await.unwrap();

        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].environment, Environment::Qa);
        assert_eq!(logs[0].deployed_by, user.id);
        assert!(logs[0].success);
        assert_eq!(
            logs[0].notes.as_deref(),
            Some("Release promoted from DEV to QA")
        );
    }

    #[tokio::test]
    async fn promote_at_final_stage() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;
        let release = create_release(&db, "1.0.0", user.id).await;

        let manager = ReleaseManager::new(db.clone());
        let recorder = DeploymentLogRecorder::new(db);

        for _ in 0..3 {
            manager.promote(release.id, user.id).await.unwrap();
        }

        let before = manager.get_by_id(release.id).await.unwrap();

        assert_eq!(before.current_environment, Environment::Prod);

        let err = manager.promote(release.id, user.id).await.unwrap_err();

        assert!(matches!(err, ReleaseError::AlreadyAtFinalStage));
        assert_eq!(manager.get_by_id(release.id).await.unwrap(), before);
        assert_eq!(recorder.list_by_release(release.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn rollback() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;
        let release = create_release(&db, "1.0.0", user.id).await;

        let manager = ReleaseManager::new(db.clone());
        let recorder = DeploymentLogRecorder::new(db);

        let err = manager.rollback(release.id, user.id).await.unwrap_err();

        assert!(matches!(err, ReleaseError::AlreadyAtFirstStage));
        assert_eq!(manager.get_by_id(release.id).await.unwrap(), release);
        assert!(recorder.list_all().await.unwrap().is_empty());

        manager.promote(release.id, user.id).await.unwrap();

        let rolled_back = manager.rollback(release.id, user.id).await.unwrap();

        assert_eq!(rolled_back.current_environment, Environment::Dev);

        let logs = recorder.list_by_release(release.id).await.unwrap();

        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].environment, Environment::Dev);
        assert!(logs[0].success);
        assert_eq!(
            logs[0].notes.as_deref(),
            Some("Release rolled back from QA to DEV")
        );
    }

    #[tokio::test]
    async fn rollback_from_final_stage() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;
        let release = create_release(&db, "1.0.0", user.id).await;

        let manager = ReleaseManager::new(db);

        for _ in 0..3 {
            manager.promote(release.id, user.id).await.unwrap();
        }

        let release = manager.rollback(release.id, user.id).await.unwrap();

        assert_eq!(release.current_environment, Environment::Uat);
    }

    #[tokio::test]
    async fn transition_unknown_release_or_actor() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;
        let release = create_release(&db, "1.0.0", user.id).await;

        let manager = ReleaseManager::new(db.clone());
        let recorder = DeploymentLogRecorder::new(db);

        assert!(matches!(
            manager.promote(release.id + 1, user.id).await,
            Err(ReleaseError::ReleaseNotFound)
        ));
        assert!(matches!(
            manager.promote(release.id, user.id + 1).await,
            Err(ReleaseError::UserNotFound)
        ));
        assert!(matches!(
            manager.rollback(release.id + 1, user.id).await,
            Err(ReleaseError::ReleaseNotFound)
        ));

        assert_eq!(manager.get_by_id(release.id).await.unwrap(), release);
        assert!(recorder.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn promote_to_production() {
        let db = create_database().await;
        let user = create_user(&db, "u1").await;

        let manager = ReleaseManager::new(db.clone());
        let recorder = DeploymentLogRecorder::new(db);

        let release = manager.create(details("1.2.0", user.id)).await.unwrap();

        assert_eq!(release.current_environment, Environment::Dev);

        for _ in 0..3 {
            manager.promote(release.id, user.id).await.unwrap();
        }

        assert_eq!(
            manager.get_by_id(release.id).await.unwrap().current_environment,
            Environment::Prod
        );

        let environments = |logs: Vec<db::deployment_log::Model>| {
            logs.into_iter()
                .map(|log| log.environment)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            environments(recorder.list_by_release(release.id).await.unwrap()),
            vec![Environment::Prod, Environment::Uat, Environment::Qa]
        );

        assert!(matches!(
            manager.promote(release.id, user.id).await,
            Err(ReleaseError::AlreadyAtFinalStage)
        ));
        assert_eq!(recorder.list_by_release(release.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn concurrent_promotions() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;
        let release = create_release(&db, "1.0.0", user.id).await;

        let manager = ReleaseManager::new(db.clone());
        let recorder = DeploymentLogRecorder::new(db);

        let (first, second) = tokio::join!(
            manager.promote(release.id, user.id),
            manager.promote(release.id, user.id)
        );

        let mut reached = vec![
            first.unwrap().current_environment,
            second.unwrap().current_environment,
        ];
        reached.sort();

        assert_eq!(reached, vec![Environment::Qa, Environment::Uat]);

        let stored = manager.get_by_id(release.id).await.unwrap();
        let logs = recorder.list_by_release(release.id).await.unwrap();

        assert_eq!(stored.current_environment, Environment::Uat);
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].environment, stored.current_environment);
    }

    #[tokio::test]
    async fn update() {
        let db = create_database().await;
        let john = create_user(&db, "john.doe").await;
        let jane = create_user(&db, "jane.doe").await;

        let manager = ReleaseManager::new(db);

        let release = manager.create(details("1.0.0", john.id)).await.unwrap();
        let release = manager.promote(release.id, john.id).await.unwrap();

        let updated = manager
            .update(
                release.id,
                ReleaseDetails {
                    version_number: String::from("1.0.1"),
                    description: String::from("Hotfix"),
                    owner_id: jane.id,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.version_number, "1.0.1");
        assert_eq!(updated.description, "Hotfix");
        assert_eq!(updated.owner_id, jane.id);
        assert_eq!(updated.current_environment, Environment::Qa);
        assert_eq!(updated.created_at, release.created_at);

        // Keeping the same version number is not a conflict.
        manager
            .update(release.id, details("1.0.1", jane.id))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_conflicts() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;

        let manager = ReleaseManager::new(db);

        let first = manager.create(details("1.0.0", user.id)).await.unwrap();
        let second = manager.create(details("1.1.0", user.id)).await.unwrap();

        assert!(matches!(
            manager.update(second.id, details("1.0.0", user.id)).await,
            Err(ReleaseError::DuplicateVersion)
        ));
        assert!(matches!(
            manager.update(second.id, details("1.2.0", user.id + 1)).await,
            Err(ReleaseError::UserNotFound)
        ));
        assert!(matches!(
            manager.update(second.id + 1, details("1.2.0", user.id)).await,
            Err(ReleaseError::ReleaseNotFound)
        ));

        assert_eq!(manager.get_by_id(first.id).await.unwrap(), first);
        assert_eq!(manager.get_by_id(second.id).await.unwrap(), second);
    }

    #[tokio::test]
    async fn delete() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;
        let release = create_release(&db, "1.0.0", user.id).await;

        let manager = ReleaseManager::new(db.clone());
        let recorder = DeploymentLogRecorder::new(db);

        manager.promote(release.id, user.id).await.unwrap();

        assert!(matches!(
            manager.delete(release.id + 1).await,
            Err(ReleaseError::ReleaseNotFound)
        ));

        manager.delete(release.id).await.unwrap();

        assert!(matches!(
            manager.get_by_id(release.id).await,
            Err(ReleaseError::ReleaseNotFound)
        ));
        assert!(recorder.list_all().await.unwrap().is_empty());
        assert!(matches!(
            manager.delete(release.id).await,
            Err(ReleaseError::ReleaseNotFound)
        ));
    }
}
