use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{
    extract::{Path, State},
    Json,
};
use db::DatabaseConnection;
use serde_json::Value;
use tracker::UserDirectory;

use super::{UserApiError, UserData, UserPath, UserRequest};
use crate::{schema::example_error, validation::ValidatedJson};

/// Generate OAPI documentation for the [`update`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update user details.")
        .response::<200, Json<UserData>>()
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("User not found.")
                .example(example_error(UserApiError::UserNotFound))
        })
        .response_with::<409, Json<Value>, _>(|op| {
            op.description("Username or e-mail address is taken by another user.")
                .example(example_error(UserApiError::DuplicateEmail))
        })
}

/// User update handler.
pub(super) async fn update(
    Path(path): Path<UserPath>,
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<UserRequest>,
) -> Result<Json<UserData>, UserApiError> {
    let user = UserDirectory::new(db)
        .update(path.id, request.into())
        .await?;

    Ok(Json(user.into()))
}
