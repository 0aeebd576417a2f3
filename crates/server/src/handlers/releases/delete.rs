use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{
    extract::{Path, State},
    Json,
};
use db::DatabaseConnection;
use serde_json::Value;
use tracker::ReleaseManager;

use super::{ReleaseApiError, ReleasePath};
use crate::schema::example_error;

/// Generate OAPI documentation for the [`delete`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete a release.")
        .description("Deployment history of the release is deleted as well.")
        .response::<200, ()>()
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("Release not found.")
                .example(example_error(ReleaseApiError::ReleaseNotFound))
        })
}

/// Release deletion handler.
pub(super) async fn delete(
    Path(path): Path<ReleasePath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<(), ReleaseApiError> {
    ReleaseManager::new(db).delete(path.id).await?;

    Ok(())
}
