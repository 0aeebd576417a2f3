use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{extract::State, Json};
use db::{environment::Environment, timestamp_from_unix, DatabaseConnection};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracker::{DeploymentLogRecorder, NewDeploymentLog, ReleaseManager, UserDirectory};
use validator::Validate;

use super::{DeploymentLogApiError, DeploymentLogData};
use crate::{schema::example_error, validation::ValidatedJson};

/// JSON request body.
#[derive(Deserialize, Validate, JsonSchema)]
pub(super) struct DeploymentLogRequest {
    /// Related release identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    release_id: i64,

    /// Stage the deployment targeted.
    #[schemars(example = "crate::schema::example_environment")]
    environment: Environment,

    /// Identifier of the user that performed the deployment.
    #[schemars(example = "crate::schema::example_database_identifier")]
    deployed_by: i64,

    /// Whether the deployment succeeded.
    success: bool,

    /// Free-form deployment notes.
    ///
    /// Blank notes are treated as absent.
    #[serde(default)]
    #[schemars(example = "crate::schema::example_notes")]
    notes: Option<String>,

    /// Deployment time as a unix timestamp.
    ///
    /// If `null`, the time of recording is used instead.
    #[serde(default)]
    #[schemars(example = "crate::schema::example_timestamp")]
    deployment_timestamp: Option<i64>,
}

/// Generate OAPI documentation for the [`record`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Record a deployment attempt.")
        .description(
            r#"Deployment attempts recorded with this route do not change
the current stage of the related release."#,
        )
        .response::<200, Json<DeploymentLogData>>()
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("Release or user not found.")
                .example(example_error(DeploymentLogApiError::ReleaseNotFound))
        })
        .response_with::<422, Json<Value>, _>(|op| {
            op.description("Invalid deployment timestamp.")
                .example(example_error(DeploymentLogApiError::InvalidTimestamp))
        })
}

/// Direct deployment logging handler.
pub(super) async fn record(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<DeploymentLogRequest>,
) -> Result<Json<DeploymentLogData>, DeploymentLogApiError> {
    ReleaseManager::new(db.clone())
        .find_by_id(request.release_id)
        .await?
        .ok_or(DeploymentLogApiError::ReleaseNotFound)?;

    UserDirectory::new(db.clone())
        .find_by_id(request.deployed_by)
        .await?
        .ok_or(DeploymentLogApiError::UserNotFound)?;

    let mut entry = NewDeploymentLog::new(
        request.release_id,
        request.environment,
        request.deployed_by,
        request.success,
    );

    if let Some(notes) = request.notes.as_deref().map(str::trim) {
        if !notes.is_empty() {
            entry = entry.with_notes(notes);
        }
    }

    if let Some(timestamp) = request.deployment_timestamp {
        let timestamp =
            timestamp_from_unix(timestamp).ok_or(DeploymentLogApiError::InvalidTimestamp)?;

        entry = entry.at(timestamp);
    }

    let log = DeploymentLogRecorder::new(db).record(entry).await?;

    Ok(Json(log.into()))
}
