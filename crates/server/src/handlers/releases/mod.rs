/// Release creation route.
mod create;

/// Release deletion route.
mod delete;

/// Release details routes.
mod details;

/// Release list routes.
mod list;

/// Promotion and rollback routes.
mod transition;

/// Release update route.
mod update;

use std::sync::Arc;

use aide::{
    axum::{
        routing::{get_with, post_with},
        ApiRouter,
    },
    OperationIo,
};
use axum::http::StatusCode;
use axum_derive_error::ErrorResponse;
use db::{environment::Environment, release, DatabaseConnection, DbErr};
use derive_more::{Display, Error, From};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracker::{ReleaseDetails, ReleaseError};
use validator::Validate;

/// Regular expression to match `MAJOR.MINOR.PATCH` release version numbers.
static VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\d+\.\d+\.\d+$"#).expect("invalid regex string"));

/// Information about a single release.
#[derive(Serialize, JsonSchema)]
pub(crate) struct ReleaseData {
    /// Release identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    pub id: i64,

    /// Unique release version number.
    #[schemars(example = "crate::schema::example_version_number")]
    pub version_number: String,

    /// Release description.
    #[schemars(example = "crate::schema::example_description")]
    pub description: String,

    /// Release owner identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    pub owner_id: i64,

    /// Stage the release is currently deployed to.
    #[schemars(example = "crate::schema::example_environment")]
    pub current_environment: Environment,

    /// Release creation time.
    #[schemars(example = "crate::schema::example_timestamp")]
    pub created_at: i64,

    /// Release last modification time.
    #[schemars(example = "crate::schema::example_timestamp")]
    pub updated_at: i64,
}

impl From<release::Model> for ReleaseData {
    fn from(model: release::Model) -> Self {
        Self {
            id: model.id,
            version_number: model.version_number,
            description: model.description,
            owner_id: model.owner_id,
            current_environment: model.current_environment,
            created_at: model.created_at.assume_utc().unix_timestamp(),
            updated_at: model.updated_at.assume_utc().unix_timestamp(),
        }
    }
}

/// JSON request body used to create or update a release.
#[derive(Deserialize, Validate, JsonSchema)]
pub(super) struct ReleaseRequest {
    /// Release version number in a `MAJOR.MINOR.PATCH` format.
    #[validate(regex = "VERSION_REGEX")]
    #[schemars(example = "crate::schema::example_version_number")]
    version_number: String,

    /// Release description.
    #[validate(length(min = 1))]
    #[schemars(example = "crate::schema::example_description")]
    description: String,

    /// Release owner identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    owner_id: i64,
}

impl From<ReleaseRequest> for ReleaseDetails {
    fn from(request: ReleaseRequest) -> Self {
        Self {
            version_number: request.version_number,
            description: request.description,
            owner_id: request.owner_id,
        }
    }
}

/// Release identifier path segment.
#[derive(Deserialize, JsonSchema)]
pub(super) struct ReleasePath {
    /// Release identifier.
    id: i64,
}

/// Errors that may occur during release request handling.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum ReleaseApiError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Requested release does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "release not found")]
    ReleaseNotFound,

    /// Release owner or acting user does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "user not found")]
    UserNotFound,

    /// Release version number is already in use.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "release version already exists")]
    DuplicateVersion,

    /// Release can not be promoted past the last stage.
    #[status(StatusCode::BAD_REQUEST)]
    #[display(fmt = "release is already at the final stage and cannot be promoted further")]
    AlreadyAtFinalStage,

    /// Release can not be rolled back past the first stage.
    #[status(StatusCode::BAD_REQUEST)]
    #[display(fmt = "release is already at the first stage and cannot be rolled back further")]
    AlreadyAtFirstStage,
}

impl From<ReleaseError> for ReleaseApiError {
    fn from(err: ReleaseError) -> Self {
        match err {
            ReleaseError::DatabaseError(err) => ReleaseApiError::DatabaseError(err),
            ReleaseError::ReleaseNotFound => ReleaseApiError::ReleaseNotFound,
            ReleaseError::UserNotFound => ReleaseApiError::UserNotFound,
            ReleaseError::DuplicateVersion => ReleaseApiError::DuplicateVersion,
            ReleaseError::AlreadyAtFinalStage => ReleaseApiError::AlreadyAtFinalStage,
            ReleaseError::AlreadyAtFirstStage => ReleaseApiError::AlreadyAtFirstStage,
        }
    }
}

/// Create an [`ApiRouter`] that provides an API server with release lifecycle routes.
pub(crate) fn routes() -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .api_route(
            "/",
            get_with(list::list, list::docs).post_with(create::create, create::docs),
        )
        .api_route(
            "/:id",
            get_with(details::details, details::docs)
                .put_with(update::update, update::docs)
                .delete_with(delete::delete, delete::docs),
        )
        .api_route(
            "/version/:version",
            get_with(details::by_version, details::by_version_docs),
        )
        .api_route(
            "/environment/:environment",
            get_with(list::by_environment, list::by_environment_docs),
        )
        .api_route(
            "/owner/:owner_id",
            get_with(list::by_owner, list::by_owner_docs),
        )
        .api_route(
            "/:id/promote",
            post_with(transition::promote, transition::promote_docs),
        )
        .api_route(
            "/:id/rollback",
            post_with(transition::rollback, transition::rollback_docs),
        )
        .with_path_items(|op| op.tag("Release management"))
}
