/// User creation route.
mod create;

/// User deletion route.
mod delete;

/// User details routes.
mod details;

/// User list routes.
mod list;

/// User update route.
mod update;

use std::sync::Arc;

use aide::{
    axum::{routing::get_with, ApiRouter},
    OperationIo,
};
use axum::http::StatusCode;
use axum_derive_error::ErrorResponse;
use db::{
    user::{self, Role},
    DatabaseConnection, DbErr,
};
use derive_more::{Display, Error, From};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracker::{UserDetails, UserError};
use validator::Validate;

/// Information about a single user.
#[derive(Serialize, JsonSchema)]
pub(super) struct UserData {
    /// User identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    pub id: i64,

    #[schemars(example = "crate::schema::example_username")]
    pub username: String,

    #[schemars(example = "crate::schema::example_email")]
    pub email: String,

    #[schemars(example = "crate::schema::example_full_name")]
    pub full_name: String,

    #[schemars(example = "crate::schema::example_role")]
    pub role: Role,

    /// User creation time.
    #[schemars(example = "crate::schema::example_timestamp")]
    pub created_at: i64,
}

impl From<user::Model> for UserData {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            full_name: model.full_name,
            role: model.role,
            created_at: model.created_at.assume_utc().unix_timestamp(),
        }
    }
}

/// JSON request body used to create or update a user.
#[derive(Deserialize, Validate, JsonSchema)]
pub(super) struct UserRequest {
    /// Unique user name.
    #[validate(length(min = 1))]
    #[schemars(example = "crate::schema::example_username")]
    username: String,

    /// Unique e-mail address.
    #[validate(email)]
    #[schemars(example = "crate::schema::example_email")]
    email: String,

    #[validate(length(min = 1))]
    #[schemars(example = "crate::schema::example_full_name")]
    full_name: String,

    #[schemars(example = "crate::schema::example_role")]
    role: Role,
}

impl From<UserRequest> for UserDetails {
    fn from(request: UserRequest) -> Self {
        Self {
            username: request.username,
            email: request.email,
            full_name: request.full_name,
            role: request.role,
        }
    }
}

/// User identifier path segment.
#[derive(Deserialize, JsonSchema)]
pub(super) struct UserPath {
    /// User identifier.
    id: i64,
}

/// Errors that may occur during user request handling.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum UserApiError {
    /// Database-related error.
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "user not found")]
    UserNotFound,

    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "username already exists")]
    DuplicateUsername,

    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "email already exists")]
    DuplicateEmail,
}

impl From<UserError> for UserApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DatabaseError(err) => UserApiError::DatabaseError(err),
            UserError::UserNotFound => UserApiError::UserNotFound,
            UserError::DuplicateUsername => UserApiError::DuplicateUsername,
            UserError::DuplicateEmail => UserApiError::DuplicateEmail,
        }
    }
}

/// Create an [`ApiRouter`] that provides an API server with user directory routes.
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
            "/username/:username",
            get_with(details::by_username, details::by_username_docs),
        )
        .api_route("/role/:role", get_with(list::by_role, list::by_role_docs))
        .with_path_items(|op| op.tag("User directory"))
}
