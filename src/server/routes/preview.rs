use axum::extract::{Path, Request, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::server::AppState;
use crate::server::error::{ApiError, ApiResult};

pub fn router() -> Router<AppState> {
    Router::new().route("/preview/{project_id}/{filename}", get(preview))
}

/// GET /api/preview/{projectId}/{filename}
///
/// Serves the file as-is; the content type is guessed from the extension.
async fn preview(
    State(state): State<AppState>,
    Path((project_id, filename)): Path<(String, String)>,
    request: Request,
) -> ApiResult<Response> {
    let path = state
        .workspace
        .resolve_existing(&project_id, &filename)
        .await
        .map_err(ApiError::during("Preview failed"))?;

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}
