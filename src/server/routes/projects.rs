//! Project routes
//!
//! ```text
//! POST /api/generate                          accept a request, run in background
//! GET  /api/projects                          every stored record
//! GET  /api/status/{projectId}                progress snapshot
//! GET  /api/projects/{projectId}/files        on-disk listing (+ ?includeContent=true)
//! GET  /api/projects/{projectId}/files/{*p}   one file with content
//! GET  /api/download/{projectId}              manifest of a completed project
//! ```
//!
//! Status reads only the store; nothing here waits on a background run.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::server::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::storage::WorkspaceFile;
use crate::types::{FileKind, Project, ProjectStatus, SiteError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate))
        .route("/projects", get(list_projects))
        .route("/status/{project_id}", get(project_status))
        .route("/projects/{project_id}/files", get(list_files))
        .route("/projects/{project_id}/files/{*path}", get(read_file))
        .route("/download/{project_id}", get(download))
}

async fn find(state: &AppState, project_id: &str) -> crate::types::Result<Project> {
    state
        .store
        .get(project_id)
        .await?
        .ok_or_else(|| SiteError::ProjectNotFound(project_id.to_string()))
}

// =============================================================================
// Generate
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub project_id: String,
    pub status: ProjectStatus,
    pub progress: u8,
    pub message: &'static str,
    pub details: GenerateDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDetails {
    pub last_generated: String,
    pub files_generated: usize,
}

async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    // A body that is missing or does not decode carries no prompt
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Unreadable generate body: {}", rejection.body_text());
            GenerateRequest::default()
        }
    };
    let prompt = request.prompt.unwrap_or_default();
    let ticket = state
        .orchestrator
        .start(&prompt, request.style.as_deref())
        .await
        .map_err(ApiError::during("Project generation failed"))?;

    let project = ticket.project;
    Ok(Json(GenerateResponse {
        project_id: project.project_name,
        status: project.status,
        progress: project.progress,
        message: "Project generation started",
        details: GenerateDetails {
            last_generated: project.last_generated_file,
            files_generated: project.generated_files.len(),
        },
    }))
}

// =============================================================================
// List / Status
// =============================================================================

async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    let projects = state
        .store
        .list()
        .await
        .map_err(ApiError::during("Failed to fetch projects"))?;
    Ok(Json(projects))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub project_id: String,
    pub status: ProjectStatus,
    pub progress: u8,
    pub details: StatusDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetails {
    pub name: String,
    pub style: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_generated_file: String,
    pub files_generated: usize,
    pub pages: Vec<PageSummary>,
    pub assets: Vec<AssetSummary>,
}

#[derive(Debug, Serialize)]
pub struct PageSummary {
    pub name: String,
    pub file: String,
    pub generated: bool,
}

#[derive(Debug, Serialize)]
pub struct AssetSummary {
    pub name: String,
    /// Relative to the projects root
    pub path: String,
}

async fn project_status(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    let project = find(&state, &project_id)
        .await
        .map_err(ApiError::during("Failed to check status"))?;

    let assets = project
        .files_of_kind(FileKind::Asset)
        .map(|f| AssetSummary {
            name: f.name.clone(),
            path: state.workspace.relative_to_root(std::path::Path::new(&f.path)),
        })
        .collect();
    let pages = project
        .pages
        .iter()
        .map(|p| PageSummary {
            name: p.name.clone(),
            file: p.file_name.clone(),
            generated: p.generated,
        })
        .collect();

    Ok(Json(StatusResponse {
        project_id,
        status: project.status,
        progress: project.progress,
        details: StatusDetails {
            name: project.project_name,
            style: project.style,
            created_at: project.created_at,
            updated_at: project.updated_at,
            last_generated_file: project.last_generated_file,
            files_generated: project.generated_files.len(),
            pages,
            assets,
        },
    }))
}

// =============================================================================
// Files
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesQuery {
    #[serde(default)]
    pub include_content: Option<String>,
}

impl FilesQuery {
    fn wants_content(&self) -> bool {
        self.include_content.as_deref() == Some("true")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesResponse {
    pub project_id: String,
    pub project_name: String,
    pub files: Vec<WorkspaceFile>,
    pub generated_files: Vec<GeneratedFileSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFileSummary {
    pub name: String,
    /// Relative to the project root
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub generated_at: DateTime<Utc>,
}

async fn list_files(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(query): Query<FilesQuery>,
) -> ApiResult<Json<FilesResponse>> {
    let failure = ApiError::during("Failed to get project files");
    let project = find(&state, &project_id).await.map_err(&failure)?;
    let files = state
        .workspace
        .list_files(&project.project_name, query.wants_content())
        .await
        .map_err(&failure)?;

    let generated_files = project
        .generated_files
        .iter()
        .map(|f| GeneratedFileSummary {
            name: f.name.clone(),
            path: state
                .workspace
                .relative_to_project(&project.project_name, std::path::Path::new(&f.path)),
            kind: f.kind,
            generated_at: f.generated_at,
        })
        .collect();

    Ok(Json(FilesResponse {
        project_id,
        project_name: project.project_name,
        files,
        generated_files,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContentResponse {
    pub project_id: String,
    /// Path exactly as requested
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub content: String,
}

async fn read_file(
    State(state): State<AppState>,
    Path((project_id, path)): Path<(String, String)>,
) -> ApiResult<Json<FileContentResponse>> {
    let failure = ApiError::during("Failed to get file content");
    let project = find(&state, &project_id).await.map_err(&failure)?;
    let file = state
        .workspace
        .read_file(&project.project_name, &path)
        .await
        .map_err(&failure)?;

    Ok(Json(FileContentResponse {
        project_id,
        path,
        name: file.name,
        kind: file.kind,
        size: file.size,
        last_modified: file.last_modified,
        content: file.content.unwrap_or_default(),
    }))
}

// =============================================================================
// Download
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub project_id: String,
    pub download_url: String,
    pub project: DownloadManifest,
}

#[derive(Debug, Serialize)]
pub struct DownloadManifest {
    pub name: String,
    pub files: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Relative to the projects root
    pub path: String,
}

async fn download(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<DownloadResponse>> {
    let failure = ApiError::during("Download failed");
    let project = find(&state, &project_id).await.map_err(&failure)?;

    if project.status != ProjectStatus::Completed {
        return Err(failure(SiteError::NotReady {
            name: project.project_name,
            status: project.status.to_string(),
            progress: project.progress,
        }));
    }

    let files = project
        .generated_files
        .iter()
        .map(|f| ManifestEntry {
            name: f.name.clone(),
            kind: f.kind,
            path: state.workspace.relative_to_root(std::path::Path::new(&f.path)),
        })
        .collect();

    Ok(Json(DownloadResponse {
        download_url: format!("/api/projects/{}/download", project_id),
        project_id,
        project: DownloadManifest {
            name: project.project_name,
            files,
        },
    }))
}
