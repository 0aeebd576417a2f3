use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{
    extract::{Path, State},
    Json,
};
use db::DatabaseConnection;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracker::UserDirectory;

use super::{UserApiError, UserData, UserPath};
use crate::schema::example_error;

/// User name path segment.
#[derive(Deserialize, JsonSchema)]
pub(super) struct UsernamePath {
    #[schemars(example = "crate::schema::example_username")]
    username: String,
}

/// Generate OAPI documentation for the [`details`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get user details.")
        .response::<200, Json<UserData>>()
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("User not found.")
                .example(example_error(UserApiError::UserNotFound))
        })
}

pub(super) async fn details(
    Path(path): Path<UserPath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<UserData>, UserApiError> {
    let user = UserDirectory::new(db).get_by_id(path.id).await?;

    Ok(Json(user.into()))
}

/// Generate OAPI documentation for the [`by_username`] handler.
pub(super) fn by_username_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get user details by user name.")
        .response::<200, Json<UserData>>()
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("User not found.")
                .example(example_error(UserApiError::UserNotFound))
        })
}

pub(super) async fn by_username(
    Path(path): Path<UsernamePath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<UserData>, UserApiError> {
    let user = UserDirectory::new(db)
        .get_by_username(&path.username)
        .await?;

    Ok(Json(user.into()))
}
