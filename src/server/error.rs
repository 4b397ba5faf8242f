use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::types::SiteError;

/// Handler error, rendered as a JSON body with an `error` field.
///
/// Domain errors map to fixed client-facing messages. Anything unexpected
/// becomes a 500 carrying `failure` as `error` and the underlying message
/// as `message`.
#[derive(Debug, thiserror::Error)]
#[error("{failure}: {source}")]
pub struct ApiError {
    #[source]
    source: SiteError,
    failure: &'static str,
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(source: SiteError, failure: &'static str) -> Self {
        Self { source, failure }
    }

    /// `map_err` adapter naming the operation that failed
    pub fn during(failure: &'static str) -> impl Fn(SiteError) -> Self {
        move |source| Self::new(source, failure)
    }
}

impl From<SiteError> for ApiError {
    fn from(source: SiteError) -> Self {
        Self::new(source, "Request failed")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.source {
            SiteError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            SiteError::ProjectNotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Project not found" }),
            ),
            SiteError::FileNotFound(_) => {
                (StatusCode::NOT_FOUND, json!({ "error": "File not found" }))
            }
            SiteError::AccessDenied(path) => {
                tracing::warn!(path = %path, "Rejected path outside project root");
                (StatusCode::FORBIDDEN, json!({ "error": "Access denied" }))
            }
            SiteError::IsDirectory(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Path is a directory" }),
            ),
            SiteError::RunInProgress(name) => (
                StatusCode::CONFLICT,
                json!({
                    "error": "Project generation already in progress",
                    "projectId": name,
                }),
            ),
            SiteError::NotReady {
                status, progress, ..
            } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Project not ready",
                    "status": status,
                    "progress": progress,
                }),
            ),
            other => {
                tracing::error!(error = %other, "{}", self.failure);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": self.failure,
                        "message": other.to_string(),
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_400_with_message() {
        let (status, body) =
            render(SiteError::Validation("Prompt is required".to_string()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Prompt is required" }));
    }

    #[tokio::test]
    async fn test_not_ready_carries_status_and_progress() {
        let err = SiteError::NotReady {
            name: "bakery-site".to_string(),
            status: "processing".to_string(),
            progress: 40,
        };
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Project not ready");
        assert_eq!(body["status"], "processing");
        assert_eq!(body["progress"], 40);
    }

    #[tokio::test]
    async fn test_path_errors() {
        let (status, body) = render(SiteError::AccessDenied("../x".into()).into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Access denied");

        let (status, _) = render(SiteError::IsDirectory("assets".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = render(SiteError::FileNotFound("x.html".into()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "File not found");
    }

    #[tokio::test]
    async fn test_run_in_progress_is_conflict() {
        let (status, body) = render(SiteError::RunInProgress("bakery-site".into()).into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["projectId"], "bakery-site");
    }

    #[tokio::test]
    async fn test_unexpected_error_names_the_operation() {
        let err = ApiError::new(SiteError::GenerationFailed, "Project generation failed");
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Project generation failed");
        assert_eq!(body["message"], "Failed to generate content");
    }
}
