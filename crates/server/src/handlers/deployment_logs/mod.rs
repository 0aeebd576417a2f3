/// Deployment log list routes.
mod list;

/// Deployment log time range route.
mod range;

/// Direct deployment logging route.
mod record;

use std::sync::Arc;

use aide::{
    axum::{routing::get_with, ApiRouter},
    OperationIo,
};
use axum::http::StatusCode;
use axum_derive_error::ErrorResponse;
use db::{deployment_log, environment::Environment, DatabaseConnection, DbErr};
use derive_more::{Display, Error, From};
use schemars::JsonSchema;
use serde::Serialize;

/// Information about a single deployment.
#[derive(Serialize, JsonSchema)]
pub(super) struct DeploymentLogData {
    /// Deployment log record identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    pub id: i64,

    /// Related release identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    pub release_id: i64,

    /// Stage the deployment targeted.
    #[schemars(example = "crate::schema::example_environment")]
    pub environment: Environment,

    /// Identifier of the user that performed the deployment.
    #[schemars(example = "crate::schema::example_database_identifier")]
    pub deployed_by: i64,

    /// Deployment time.
    #[schemars(example = "crate::schema::example_timestamp")]
    pub deployment_timestamp: i64,

    /// Whether the deployment succeeded.
    pub success: bool,

    /// Free-form deployment notes.
    #[schemars(example = "crate::schema::example_notes")]
    pub notes: Option<String>,
}

impl From<deployment_log::Model> for DeploymentLogData {
    fn from(model: deployment_log::Model) -> Self {
        Self {
            id: model.id,
            release_id: model.release_id,
            environment: model.environment,
            deployed_by: model.deployed_by,
            deployment_timestamp: model.deployment_timestamp.assume_utc().unix_timestamp(),
            success: model.success,
            notes: model.notes,
        }
    }
}

/// Errors that may occur during deployment log request handling.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum DeploymentLogApiError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Referenced release does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "release not found")]
    ReleaseNotFound,

    /// Referenced user does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "user not found")]
    UserNotFound,

    /// Provided unix timestamp is out of the supported range.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "invalid timestamp")]
    InvalidTimestamp,
}

/// Create an [`ApiRouter`] that provides an API server with deployment history routes.
pub(crate) fn routes() -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .api_route(
            "/",
            get_with(list::list, list::docs).post_with(record::record, record::docs),
        )
        .api_route(
            "/release/:release_id",
            get_with(list::by_release, list::by_release_docs),
        )
        .api_route(
            "/release/:release_id/environment/:environment",
            get_with(
                list::by_release_and_environment,
                list::by_release_and_environment_docs,
            ),
        )
        .api_route(
            "/environment/:environment",
            get_with(list::by_environment, list::by_environment_docs),
        )
        .api_route("/user/:user_id", get_with(list::by_user, list::by_user_docs))
        .api_route("/failed", get_with(list::failed, list::failed_docs))
        .api_route(
            "/successful",
            get_with(list::successful, list::successful_docs),
        )
        .api_route("/range", get_with(range::range, range::docs))
        .with_path_items(|op| op.tag("Deployment history"))
}
