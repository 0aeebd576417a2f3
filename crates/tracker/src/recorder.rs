//! Deployment log recorder.
//!
//! The recorder is the only place deployment log records are created.
//! It performs no validation of its own: request bodies are validated
//! before reaching it, and referenced releases and users are expected
//! to be resolved by the caller.
//!
//! All listings are ordered from the most recent deployment to the oldest one.

use std::sync::Arc;

use db::{
    current_timestamp, deployment_log, environment::Environment, ActiveValue, ColumnTrait,
    Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PrimitiveDateTime,
    QueryFilter, QueryOrder,
};
use tracing::info;

/// Deployment log record that is about to be stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewDeploymentLog {
    /// Related release identifier.
    pub release_id: i64,

    /// Stage the deployment targeted.
    pub environment: Environment,

    /// Identifier of the user that performed the deployment.
    pub deployed_by: i64,

    /// Whether the deployment succeeded.
    pub success: bool,

    /// Free-form notes.
    pub notes: Option<String>,

    /// Deployment time, if it differs from the time of recording.
    pub deployment_timestamp: Option<PrimitiveDateTime>,
}

impl NewDeploymentLog {
    pub fn new(release_id: i64, environment: Environment, deployed_by: i64, success: bool) -> Self {
        Self {
            release_id,
            environment,
            deployed_by,
            success,
            notes: None,
            deployment_timestamp: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn at(mut self, deployment_timestamp: PrimitiveDateTime) -> Self {
        self.deployment_timestamp = Some(deployment_timestamp);
        self
    }
}

/// Insert a new deployment log record using an arbitrary connection.
///
/// Release transitions use this function to write a record within
/// the same transaction that modifies the release.
pub(crate) async fn insert<C: ConnectionTrait>(
    conn: &C,
    entry: NewDeploymentLog,
) -> Result<deployment_log::Model, DbErr> {
    let model = deployment_log::Entity::insert(deployment_log::ActiveModel {
        release_id: ActiveValue::Set(entry.release_id),
        environment: ActiveValue::Set(entry.environment),
        deployed_by: ActiveValue::Set(entry.deployed_by),
        deployment_timestamp: ActiveValue::Set(
            entry.deployment_timestamp.unwrap_or_else(current_timestamp),
        ),
        success: ActiveValue::Set(entry.success),
        notes: ActiveValue::Set(entry.notes),
        ..Default::default()
    })
    .exec_with_returning(conn)
    .await?;

    info!(
        deployment_log_id = model.id,
        release_id = model.release_id,
        environment = model.environment.as_str(),
        success = model.success,
        "deployment recorded"
    );

    Ok(model)
}

/// Deployment log write and query handle.
#[derive(Clone)]
pub struct DeploymentLogRecorder {
    db: Arc<DatabaseConnection>,
}

impl DeploymentLogRecorder {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Store a new deployment log record.
    ///
    /// If the record has no deployment timestamp set, the current time is used instead.
    pub async fn record(&self, entry: NewDeploymentLog) -> Result<deployment_log::Model, DbErr> {
        insert(&*self.db, entry).await
    }

    pub async fn list_all(&self) -> Result<Vec<deployment_log::Model>, DbErr> {
        self.list(Condition::all()).await
    }

    pub async fn list_by_release(
        &self,
        release_id: i64,
    ) -> Result<Vec<deployment_log::Model>, DbErr> {
        self.list(Condition::all().add(deployment_log::Column::ReleaseId.eq(release_id)))
            .await
    }

    pub async fn list_by_environment(
        &self,
        environment: Environment,
    ) -> Result<Vec<deployment_log::Model>, DbErr> {
        self.list(Condition::all().add(deployment_log::Column::Environment.eq(environment)))
            .await
    }

    /// List deployments performed by the provided user.
    pub async fn list_by_actor(&self, user_id: i64) -> Result<Vec<deployment_log::Model>, DbErr> {
        self.list(Condition::all().add(deployment_log::Column::DeployedBy.eq(user_id)))
            .await
    }

    pub async fn list_by_success(
        &self,
        success: bool,
    ) -> Result<Vec<deployment_log::Model>, DbErr> {
        self.list(Condition::all().add(deployment_log::Column::Success.eq(success)))
            .await
    }

    pub async fn list_failed(&self) -> Result<Vec<deployment_log::Model>, DbErr> {
        self.list_by_success(false).await
    }

    pub async fn list_successful(&self) -> Result<Vec<deployment_log::Model>, DbErr> {
        self.list_by_success(true).await
    }

    pub async fn list_by_release_and_environment(
        &self,
        release_id: i64,
        environment: Environment,
    ) -> Result<Vec<deployment_log::Model>, DbErr> {
        self.list(
            Condition::all()
                .add(deployment_log::Column::ReleaseId.eq(release_id))
                .add(deployment_log::Column::Environment.eq(environment)),
        )
        .await
    }

    /// List deployments performed within the `[start, end]` time range.
    ///
    /// Both bounds are inclusive. An empty list is returned if `start` is after `end`.
    pub async fn list_by_timestamp_range(
        &self,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> Result<Vec<deployment_log::Model>, DbErr> {
        self.list(
            Condition::all().add(deployment_log::Column::DeploymentTimestamp.between(start, end)),
        )
        .await
    }

    async fn list(&self, condition: Condition) -> Result<Vec<deployment_log::Model>, DbErr> {
        deployment_log::Entity::find()
            .filter(condition)
            .order_by_desc(deployment_log::Column::DeploymentTimestamp)
            .order_by_desc(deployment_log::Column::Id)
            .all(&*self.db)
            .await
    }
}
