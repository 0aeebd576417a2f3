use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use db::DatabaseConnection;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracker::{ReleaseManager, Transition};

use super::{ReleaseApiError, ReleaseData, ReleasePath};
use crate::schema::example_error;

/// Query string that contains the acting user identifier.
#[derive(Deserialize, JsonSchema)]
pub(super) struct TransitionQuery {
    /// Identifier of the user that performs the deployment.
    #[schemars(example = "crate::schema::example_database_identifier")]
    actor_id: i64,
}

/// Shared OAPI documentation for both transition handlers.
fn transition_docs(op: TransformOperation, boundary: ReleaseApiError) -> TransformOperation {
    op.response_with::<200, Json<ReleaseData>, _>(|op| {
        op.description("Release details after the transition.")
    })
    .response_with::<400, Json<Value>, _>(|op| {
        op.description("Release can not be moved any further.")
            .example(example_error(boundary))
    })
    .response_with::<404, Json<Value>, _>(|op| {
        op.description("Release or acting user not found.")
            .example(example_error(ReleaseApiError::ReleaseNotFound))
    })
}

/// Generate OAPI documentation for the [`promote`] handler.
pub(super) fn promote_docs(op: TransformOperation) -> TransformOperation {
    transition_docs(
        op.summary("Promote a release to the next stage.")
            .description("A successful deployment log record is created for the new stage."),
        ReleaseApiError::AlreadyAtFinalStage,
    )
}

/// Generate OAPI documentation for the [`rollback`] handler.
pub(super) fn rollback_docs(op: TransformOperation) -> TransformOperation {
    transition_docs(
        op.summary("Roll a release back to the previous stage.")
            .description("A successful deployment log record is created for the new stage."),
        ReleaseApiError::AlreadyAtFirstStage,
    )
}

async fn handle(
    db: Arc<DatabaseConnection>,
    release_id: i64,
    actor_id: i64,
    transition: Transition,
) -> Result<Json<ReleaseData>, ReleaseApiError> {
    let release = ReleaseManager::new(db)
        .transition(release_id, actor_id, transition)
        .await?;

    Ok(Json(release.into()))
}

/// Release promotion handler.
pub(super) async fn promote(
    Path(path): Path<ReleasePath>,
    Query(query): Query<TransitionQuery>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<ReleaseData>, ReleaseApiError> {
    handle(db, path.id, query.actor_id, Transition::Promote).await
}

/// Release rollback handler.
pub(super) async fn rollback(
    Path(path): Path<ReleasePath>,
    Query(query): Query<TransitionQuery>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<ReleaseData>, ReleaseApiError> {
    handle(db, path.id, query.actor_id, Transition::Rollback).await
}
