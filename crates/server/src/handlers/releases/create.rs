use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{extract::State, Json};
use db::DatabaseConnection;
use serde_json::Value;
use tracker::ReleaseManager;

use super::{ReleaseApiError, ReleaseData, ReleaseRequest};
use crate::{schema::example_error, validation::ValidatedJson};

/// Generate OAPI documentation for the [`create`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create a new release.")
        .description("Every new release starts at the `DEV` stage.")
        .response::<200, Json<ReleaseData>>()
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("Release owner not found.")
                .example(example_error(ReleaseApiError::UserNotFound))
        })
        .response_with::<409, Json<Value>, _>(|op| {
            op.description("Release version already exists.")
                .example(example_error(ReleaseApiError::DuplicateVersion))
        })
}

/// Release creation handler.
pub(super) async fn create(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<ReleaseRequest>,
) -> Result<Json<ReleaseData>, ReleaseApiError> {
    let release = ReleaseManager::new(db).create(request.into()).await?;

    Ok(Json(release.into()))
}

#[cfg(test)]
mod tests {
    use crate::testing::{create_database, create_user, RequestBodyExt, ResponseBodyExt};

    use assert_json::assert_json;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::{Service, ServiceExt};
    use tracker::ReleaseManager;

    #[tokio::test]
    async fn successful() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;

        let response = crate::app_router(db.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/releases")
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "version_number": "1.2.0",
                        "description": "Quarterly feature release",
                        "owner_id": user.id,
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let release = ReleaseManager::new(db)
            .get_by_version("1.2.0")
            .await
            .expect("release was not created");

        let created_at = release.created_at.assume_utc().unix_timestamp();

        assert_json!(response.json().await, {
            "id": release.id,
            "version_number": "1.2.0",
            "description": "Quarterly feature release",
            "owner_id": user.id,
            "current_environment": "DEV",
            "created_at": created_at,
            "updated_at": created_at,
        });
    }

    #[tokio::test]
    async fn duplicate_version() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;

        let mut service = crate::app_router(db.clone());

        let request = || {
            Request::builder()
                .method("POST")
                .uri("/releases")
                .header("Content-Type", "application/json")
                .body(Body::from_json(json!({
                    "version_number": "1.2.0",
                    "description": "Quarterly feature release",
                    "owner_id": user.id,
                })))
                .unwrap()
        };

        let response = service.call(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let response = service.call(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_json!(response.json().await, {
            "code": 409,
            "error": "release version already exists",
        });
        assert_eq!(ReleaseManager::new(db).list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_owner() {
        let db = create_database().await;

        let response = crate::app_router(db)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/releases")
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "version_number": "1.2.0",
                        "description": "Quarterly feature release",
                        "owner_id": 42,
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_version() {
        let db = create_database().await;
        let user = create_user(&db, "john.doe").await;

        let response = crate::app_router(db)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/releases")
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "version_number": "v1.2",
                        "description": "Quarterly feature release",
                        "owner_id": user.id,
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
