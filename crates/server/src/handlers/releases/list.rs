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
use tracker::{ReleaseManager, UserDirectory};

use super::{ReleaseApiError, ReleaseData};
use crate::schema::example_error;

/// Environment path segment.
#[derive(Deserialize, JsonSchema)]
pub(super) struct EnvironmentPath {
    /// Deployment stage.
    #[schemars(example = "crate::schema::example_environment")]
    environment: Environment,
}

/// Release owner path segment.
#[derive(Deserialize, JsonSchema)]
pub(super) struct OwnerPath {
    /// Release owner identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    owner_id: i64,
}

/// Generate OAPI documentation for the [`list`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get list of all releases.")
        .response_with::<200, Json<Vec<ReleaseData>>, _>(|op| {
            op.description("Release list response, newest releases first.")
        })
}

/// List all known releases.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<Vec<ReleaseData>>, ReleaseApiError> {
    let releases = ReleaseManager::new(db).list_all().await?;

    Ok(Json(releases.into_iter().map(ReleaseData::from).collect()))
}

/// Generate OAPI documentation for the [`by_environment`] handler.
pub(super) fn by_environment_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get list of releases currently deployed to the provided stage.")
        .response_with::<200, Json<Vec<ReleaseData>>, _>(|op| {
            op.description("Release list response, newest releases first.")
        })
}

/// List releases by their current stage.
pub(super) async fn by_environment(
    Path(path): Path<EnvironmentPath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<Vec<ReleaseData>>, ReleaseApiError> {
    let releases = ReleaseManager::new(db)
        .list_by_environment(path.environment)
        .await?;

    Ok(Json(releases.into_iter().map(ReleaseData::from).collect()))
}

/// Generate OAPI documentation for the [`by_owner`] handler.
pub(super) fn by_owner_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get list of releases owned by the provided user.")
        .response_with::<200, Json<Vec<ReleaseData>>, _>(|op| {
            op.description("Release list response, newest releases first.")
        })
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("User not found.")
                .example(example_error(ReleaseApiError::UserNotFound))
        })
}

/// List releases by their owner.
pub(super) async fn by_owner(
    Path(path): Path<OwnerPath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<Vec<ReleaseData>>, ReleaseApiError> {
    UserDirectory::new(db.clone())
        .find_by_id(path.owner_id)
        .await?
        .ok_or(ReleaseApiError::UserNotFound)?;

    let releases = ReleaseManager::new(db).list_by_owner(path.owner_id).await?;

    Ok(Json(releases.into_iter().map(ReleaseData::from).collect()))
}
