use std::sync::Arc;

use aide::{
    axum::{ApiRouter, IntoApiResponse},
    openapi::OpenApi,
    redoc::Redoc,
};
use axum::{response::IntoResponse, routing::get, Extension, Json};
use db::DatabaseConnection;

/// Serve the generated OpenAPI document.
async fn api_json(Extension(oapi): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
    Json(&*oapi).into_response()
}

/// Create an [`ApiRouter`] that provides an API server with documentation routes.
pub(crate) fn routes() -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .route("/", Redoc::new("/docs/api.json").axum_route())
        .route("/api.json", get(api_json))
}
