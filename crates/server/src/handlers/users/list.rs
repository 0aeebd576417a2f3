use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{
    extract::{Path, State},
    Json,
};
use db::{user::Role, DatabaseConnection};
use schemars::JsonSchema;
use serde::Deserialize;
use tracker::UserDirectory;

use super::{UserApiError, UserData};

/// User role path segment.
#[derive(Deserialize, JsonSchema)]
pub(super) struct RolePath {
    #[schemars(example = "crate::schema::example_role")]
    role: Role,
}

/// Generate OAPI documentation for the [`list`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get list of all users.")
        .response_with::<200, Json<Vec<UserData>>, _>(|op| op.description("User list response."))
}

pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<Vec<UserData>>, UserApiError> {
    let users = UserDirectory::new(db).list_all().await?;

    Ok(Json(users.into_iter().map(UserData::from).collect()))
}

/// Generate OAPI documentation for the [`by_role`] handler.
pub(super) fn by_role_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get list of users with the provided role.")
        .response_with::<200, Json<Vec<UserData>>, _>(|op| op.description("User list response."))
}

pub(super) async fn by_role(
    Path(path): Path<RolePath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<Vec<UserData>>, UserApiError> {
    let users = UserDirectory::new(db).list_by_role(path.role).await?;

    Ok(Json(users.into_iter().map(UserData::from).collect()))
}
