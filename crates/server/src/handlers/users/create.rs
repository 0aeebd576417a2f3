use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{extract::State, Json};
use db::DatabaseConnection;
use serde_json::Value;
use tracker::UserDirectory;

use super::{UserApiError, UserData, UserRequest};
use crate::{schema::example_error, validation::ValidatedJson};

/// Generate OAPI documentation for the [`create`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create a new user.")
        .response::<200, Json<UserData>>()
        .response_with::<409, Json<Value>, _>(|op| {
            op.description("Username or e-mail address is already taken.")
                .example(example_error(UserApiError::DuplicateUsername))
        })
}

/// User creation handler.
pub(super) async fn create(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<UserRequest>,
) -> Result<Json<UserData>, UserApiError> {
    let user = UserDirectory::new(db).create(request.into()).await?;

    Ok(Json(user.into()))
}
