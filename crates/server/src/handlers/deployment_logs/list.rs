use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{
    extract::{Path, State},
    Json,
};
use db::{environment::Environment, DatabaseConnection};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracker::{DeploymentLogRecorder, ReleaseManager, UserDirectory};

use super::{DeploymentLogApiError, DeploymentLogData};
use crate::schema::example_error;

/// Release identifier path segment.
#[derive(Deserialize, JsonSchema)]
pub(super) struct ReleasePath {
    /// Release identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    release_id: i64,
}

/// Environment path segment.
#[derive(Deserialize, JsonSchema)]
pub(super) struct EnvironmentPath {
    /// Deployment stage.
    #[schemars(example = "crate::schema::example_environment")]
    environment: Environment,
}

/// Release identifier and environment path segments.
#[derive(Deserialize, JsonSchema)]
pub(super) struct ReleaseEnvironmentPath {
    /// Release identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    release_id: i64,

    /// Deployment stage.
    #[schemars(example = "crate::schema::example_environment")]
    environment: Environment,
}

/// User identifier path segment.
#[derive(Deserialize, JsonSchema)]
pub(super) struct UserPath {
    /// User identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    user_id: i64,
}

type LogList = Result<Json<Vec<DeploymentLogData>>, DeploymentLogApiError>;

fn into_response(logs: Vec<db::deployment_log::Model>) -> LogList {
    Ok(Json(logs.into_iter().map(DeploymentLogData::from).collect()))
}

/// Generate OAPI documentation for the [`list`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get the full deployment history.")
        .response_with::<200, Json<Vec<DeploymentLogData>>, _>(|op| {
            op.description("Deployment log list, most recent deployments first.")
        })
}

pub(super) async fn list(State(db): State<Arc<DatabaseConnection>>) -> LogList {
    into_response(DeploymentLogRecorder::new(db).list_all().await?)
}

/// Generate OAPI documentation for the [`by_release`] handler.
pub(super) fn by_release_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get deployment history of a release.")
        .response_with::<200, Json<Vec<DeploymentLogData>>, _>(|op| {
            op.description("Deployment log list, most recent deployments first.")
        })
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("Release not found.")
                .example(example_error(DeploymentLogApiError::ReleaseNotFound))
        })
}

pub(super) async fn by_release(
    Path(path): Path<ReleasePath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> LogList {
    ReleaseManager::new(db.clone())
        .find_by_id(path.release_id)
        .await?
        .ok_or(DeploymentLogApiError::ReleaseNotFound)?;

    into_response(
        DeploymentLogRecorder::new(db)
            .list_by_release(path.release_id)
            .await?,
    )
}

/// Generate OAPI documentation for the [`by_environment`] handler.
pub(super) fn by_environment_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get deployment history of a stage.")
        .response_with::<200, Json<Vec<DeploymentLogData>>, _>(|op| {
            op.description("Deployment log list, most recent deployments first.")
        })
}

pub(super) async fn by_environment(
    Path(path): Path<EnvironmentPath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> LogList {
    into_response(
        DeploymentLogRecorder::new(db)
            .list_by_environment(path.environment)
            .await?,
    )
}

/// Generate OAPI documentation for the [`by_release_and_environment`] handler.
pub(super) fn by_release_and_environment_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get deployment history of a release within a single stage.")
        .response_with::<200, Json<Vec<DeploymentLogData>>, _>(|op| {
            op.description("Deployment log list, most recent deployments first.")
        })
}

pub(super) async fn by_release_and_environment(
    Path(path): Path<ReleaseEnvironmentPath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> LogList {
    into_response(
        DeploymentLogRecorder::new(db)
            .list_by_release_and_environment(path.release_id, path.environment)
            .await?,
    )
}

/// Generate OAPI documentation for the [`by_user`] handler.
pub(super) fn by_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get deployments performed by a user.")
        .response_with::<200, Json<Vec<DeploymentLogData>>, _>(|op| {
            op.description("Deployment log list, most recent deployments first.")
        })
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("User not found.")
                .example(example_error(DeploymentLogApiError::UserNotFound))
        })
}

pub(super) async fn by_user(
    Path(path): Path<UserPath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> LogList {
    UserDirectory::new(db.clone())
        .find_by_id(path.user_id)
        .await?
        .ok_or(DeploymentLogApiError::UserNotFound)?;

    into_response(
        DeploymentLogRecorder::new(db)
            .list_by_actor(path.user_id)
            .await?,
    )
}

/// Generate OAPI documentation for the [`failed`] handler.
pub(super) fn failed_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get failed deployments.")
        .response_with::<200, Json<Vec<DeploymentLogData>>, _>(|op| {
            op.description("Deployment log list, most recent deployments first.")
        })
}

pub(super) async fn failed(State(db): State<Arc<DatabaseConnection>>) -> LogList {
    into_response(DeploymentLogRecorder::new(db).list_failed().await?)
}

/// Generate OAPI documentation for the [`successful`] handler.
pub(super) fn successful_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get successful deployments.")
        .response_with::<200, Json<Vec<DeploymentLogData>>, _>(|op| {
            op.description("Deployment log list, most recent deployments first.")
        })
}

pub(super) async fn successful(State(db): State<Arc<DatabaseConnection>>) -> LogList {
    into_response(DeploymentLogRecorder::new(db).list_successful().await?)
}
