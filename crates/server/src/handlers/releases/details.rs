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
use tracker::ReleaseManager;

use super::{ReleaseApiError, ReleaseData, ReleasePath};
use crate::schema::example_error;

/// Release version path segment.
#[derive(Deserialize, JsonSchema)]
pub(super) struct VersionPath {
    /// Release version number.
    #[schemars(example = "crate::schema::example_version_number")]
    version: String,
}

/// Generate OAPI documentation for the [`details`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get release details.")
        .response::<200, Json<ReleaseData>>()
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("Release not found.")
                .example(example_error(ReleaseApiError::ReleaseNotFound))
        })
}

/// Release details request handler.
pub(super) async fn details(
    Path(path): Path<ReleasePath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<ReleaseData>, ReleaseApiError> {
    let release = ReleaseManager::new(db).get_by_id(path.id).await?;

    Ok(Json(release.into()))
}

/// Generate OAPI documentation for the [`by_version`] handler.
pub(super) fn by_version_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get release details by its version number.")
        .response::<200, Json<ReleaseData>>()
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("Release not found.")
                .example(example_error(ReleaseApiError::ReleaseNotFound))
        })
}

/// Release lookup by version number.
pub(super) async fn by_version(
    Path(path): Path<VersionPath>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<ReleaseData>, ReleaseApiError> {
    let release = ReleaseManager::new(db)
        .get_by_version(&path.version)
        .await?;

    Ok(Json(release.into()))
}

#[cfg(test)]
mod tests {
    use crate::testing::{create_database, create_user, ResponseBodyExt};

    use assert_json::assert_json;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::{Service, ServiceExt};
    use tracker::{ReleaseDetails, ReleaseManager};

    #[tokio::test]
    async fn successful() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;

        let manager = ReleaseManager::new(db.clone());

        let release = manager
            .create(ReleaseDetails {
                version_number: String::from("1.0.0"),
                description: String::from("Initial release"),
                owner_id: user.id,
            })
            .await
            .unwrap();
        let release = manager.promote(release.id, user.id).await.unwrap();

        let created_at = release.created_at.assume_utc().unix_timestamp();
        let updated_at = release.updated_at.assume_utc().unix_timestamp();

        let mut service = crate::app_router(db);

        let uris = [
            format!("/releases/{}", release.id),
            String::from("/releases/version/1.0.0"),
        ];

        for uri in uris {
            let response = service
                .call(
                    Request::builder()
                        .method("GET")
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_json!(response.json().await, {
                "id": release.id,
                "version_number": "1.0.0",
                "description": "Initial release",
                "owner_id": user.id,
                "current_environment": "QA",
                "created_at": created_at,
                "updated_at": updated_at,
            });
        }
    }

    #[tokio::test]
    async fn unknown() {
        let db = create_database().await;

        let response = crate::app_router(db.clone())
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/releases/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = crate::app_router(db)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/releases/version/9.9.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
