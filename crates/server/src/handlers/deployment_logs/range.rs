use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{
    extract::{Query, State},
    Json,
};
use db::{timestamp_from_unix, DatabaseConnection};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracker::DeploymentLogRecorder;

use super::{DeploymentLogApiError, DeploymentLogData};
use crate::schema::example_error;

/// Query string that contains time range bounds.
#[derive(Deserialize, JsonSchema)]
pub(super) struct RangeQuery {
    /// Range start as a unix timestamp, inclusive.
    #[schemars(example = "crate::schema::example_timestamp")]
    start: i64,

    /// Range end as a unix timestamp, inclusive.
    #[schemars(example = "crate::schema::example_timestamp")]
    end: i64,
}

/// Generate OAPI documentation for the [`range`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get deployments performed within a time range.")
        .description(
            "Both range bounds are inclusive. An empty list is returned if `start` is after `end`.",
        )
        .response_with::<200, Json<Vec<DeploymentLogData>>, _>(|op| {
            op.description("Deployment log list, most recent deployments first.")
        })
        .response_with::<422, Json<Value>, _>(|op| {
            op.description("Range bound is not a valid timestamp.")
                .example(example_error(DeploymentLogApiError::InvalidTimestamp))
        })
}

/// Deployment log time range request handler.
pub(super) async fn range(
    Query(query): Query<RangeQuery>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<Vec<DeploymentLogData>>, DeploymentLogApiError> {
    let start = timestamp_from_unix(query.start);
    let end = timestamp_from_unix(query.end);

    let (Some(start), Some(end)) = (start, end) else {
        return Err(DeploymentLogApiError::InvalidTimestamp);
    };

    let logs = DeploymentLogRecorder::new(db)
        .list_by_timestamp_range(start, end)
        .await?;

    Ok(Json(logs.into_iter().map(DeploymentLogData::from).collect()))
}
