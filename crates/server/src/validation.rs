use aide::OperationIo;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest},
    http::{Request, StatusCode},
    Json,
};
use axum_derive_error::ErrorResponse;
use derive_more::{Display, Error};
use validator::{Validate, ValidationErrors};

/// Errors related to request body parsing and validation.
#[derive(ErrorResponse, Display, Error)]
pub enum ValidatedJsonRejection {
    /// Unable to parse a JSON value.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    JsonParsingError(JsonRejection),

    /// Unable to validate a JSON value.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    ValidationError(ValidationErrors),
}

/// JSON request body extractor with [`validator`] crate support.
///
/// Both malformed and invalid request bodies are rejected with
/// `422 Unprocessable Entity` before a handler is called. The generated
/// OAPI documentation is the same as for [`Json`].
#[derive(OperationIo)]
#[aide(input_with = "axum::Json<T>", json_schema)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S, B> FromRequest<S, B> for ValidatedJson<T>
where
    T: Validate,
    B: Send + 'static,
    S: Sync,
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonParsingError)?;

        match value.validate() {
            Ok(_) => Ok(ValidatedJson(value)),
            Err(err) => Err(ValidatedJsonRejection::ValidationError(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::RequestBodyExt;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use serde::Deserialize;
    use serde_json::json;
    use tower::ServiceExt;
    use validator::Validate;

    use super::ValidatedJson;

    #[derive(Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 1))]
        name: String,
    }

    async fn probe(ValidatedJson(probe): ValidatedJson<Probe>) -> String {
        probe.name
    }

    async fn status(body: serde_json::Value) -> StatusCode {
        Router::new()
            .route("/", post(probe))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(body))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn rejections() {
        assert_eq!(status(json!({ "name": "release" })).await, StatusCode::OK);
        assert_eq!(
            status(json!({ "name": "" })).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(json!({ "title": "release" })).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
