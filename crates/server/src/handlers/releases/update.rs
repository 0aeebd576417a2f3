use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{
    extract::{Path, State},
    Json,
};
use db::DatabaseConnection;
use serde_json::Value;
use tracker::ReleaseManager;

use super::{ReleaseApiError, ReleaseData, ReleasePath, ReleaseRequest};
use crate::{schema::example_error, validation::ValidatedJson};

/// Generate OAPI documentation for the [`update`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update release details.")
        .description("Release stage can be changed only with promotion and rollback requests.")
        .response::<200, Json<ReleaseData>>()
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("Release or its new owner not found.")
                .example(example_error(ReleaseApiError::ReleaseNotFound))
        })
        .response_with::<409, Json<Value>, _>(|op| {
            op.description("Release version already exists.")
                .example(example_error(ReleaseApiError::DuplicateVersion))
        })
}

/// Release update handler.
pub(super) async fn update(
    Path(path): Path<ReleasePath>,
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<ReleaseRequest>,
) -> Result<Json<ReleaseData>, ReleaseApiError> {
    let release = ReleaseManager::new(db)
        .update(path.id, request.into())
        .await?;

    Ok(Json(release.into()))
}
