use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{
    extract::{Path, State},
    Json,
};
use db::DatabaseConnection;
use serde_json::Value;
use tracker::UserDirectory;

use super::{UserApiError, UserPath};
use crate::schema::example_error;

/// Generate OAPI documentation for the [`delete`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete a user.")
        .description("Users that own releases or performed deployments can not be deleted.")
        .response::<200, ()>()
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("User not found.")
                .example(example_error(UserApiError::UserNotFound))
        })
}

/// User deletion handler.
pub(super) async fn delete(
    Path(path): Path<UserPath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<(), UserApiError> {
    UserDirectory::new(db).delete(path.id).await?;

    Ok(())
}
