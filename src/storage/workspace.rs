//! Site Workspace
//!
//! The on-disk tree of generated projects: one directory per project under a
//! shared root. All caller-supplied relative paths go through [`SiteWorkspace::resolve`],
//! which refuses anything that would land outside the project directory.

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use ignore::WalkBuilder;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use crate::types::{Result, SiteError};

/// A file found in a project directory
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFile {
    pub name: String,
    /// Path relative to the project root, with a leading `/`
    pub path: String,
    /// File extension, or `unknown`
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SiteWorkspace {
    root: PathBuf,
}

impl SiteWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.root.join(project)
    }

    /// Create directories (relative to the project) and their parents
    pub async fn create_dirs(&self, project: &str, dirs: &[&str]) -> Result<()> {
        for dir in dirs {
            let path = self.resolve(project, dir)?;
            fs::create_dir_all(&path).await?;
        }
        Ok(())
    }

    /// Write a file inside the project, creating parents; returns its absolute path
    pub async fn write_file(&self, project: &str, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.resolve(project, relative)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content).await?;
        debug!(project, file = relative, bytes = content.len(), "File written");
        Ok(path)
    }

    /// Recursively list every file in the project directory.
    ///
    /// A project whose directory does not exist yet has no files.
    pub async fn list_files(&self, project: &str, include_content: bool) -> Result<Vec<WorkspaceFile>> {
        let dir = self.resolve(project, "")?;
        if !fs::try_exists(&dir).await? {
            return Ok(Vec::new());
        }

        let paths = tokio::task::spawn_blocking({
            let dir = dir.clone();
            move || walk_files(&dir)
        })
        .await
        .map_err(|e| SiteError::Storage(format!("File listing task failed: {}", e)))?;

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(describe(&dir, &path, include_content).await?);
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Read one file with its content
    pub async fn read_file(&self, project: &str, relative: &str) -> Result<WorkspaceFile> {
        let path = self.resolve_existing(project, relative).await?;
        let dir = self.resolve(project, "")?;
        describe(&dir, &path, true).await
    }

    /// Resolve an existing regular file for serving as-is
    pub async fn resolve_existing(&self, project: &str, relative: &str) -> Result<PathBuf> {
        let path = self.resolve(project, relative)?;

        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SiteError::FileNotFound(relative.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        // Symlinks may point anywhere; compare real locations
        let real = fs::canonicalize(&path).await?;
        let real_dir = fs::canonicalize(self.project_dir(project)).await?;
        if !real.starts_with(&real_dir) {
            return Err(SiteError::AccessDenied(relative.to_string()));
        }

        if metadata.is_dir() {
            return Err(SiteError::IsDirectory(relative.to_string()));
        }
        Ok(path)
    }

    /// Join `relative` onto the project directory without touching the
    /// filesystem. `..` may not climb above the project directory.
    pub fn resolve(&self, project: &str, relative: &str) -> Result<PathBuf> {
        let mut project_parts = Path::new(project).components();
        match (project_parts.next(), project_parts.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(SiteError::AccessDenied(project.to_string())),
        }

        let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => parts.push(part),
                Component::CurDir | Component::RootDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(SiteError::AccessDenied(relative.to_string()));
                    }
                }
                Component::Prefix(_) => {
                    return Err(SiteError::AccessDenied(relative.to_string()));
                }
            }
        }

        let mut path = self.project_dir(project);
        path.extend(parts);
        Ok(path)
    }

    /// Render an absolute path relative to the projects root (leading `/`)
    pub fn relative_to_root(&self, path: &Path) -> String {
        display_relative(&self.root, path)
    }

    /// Render an absolute path relative to a project directory (leading `/`)
    pub fn relative_to_project(&self, project: &str, path: &Path) -> String {
        display_relative(&self.project_dir(project), path)
    }
}

fn walk_files(dir: &Path) -> Vec<PathBuf> {
    WalkBuilder::new(dir)
        .hidden(false)
        .parents(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .follow_links(false)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Failed to read entry under {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.into_path())
        .collect()
}

async fn describe(dir: &Path, path: &Path, include_content: bool) -> Result<WorkspaceFile> {
    let metadata = fs::metadata(path).await?;
    let content = if include_content {
        let bytes = fs::read(path).await?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        None
    };

    let last_modified = metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    Ok(WorkspaceFile {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: display_relative(dir, path),
        kind: file_type(path),
        size: metadata.len(),
        content,
        last_modified,
    })
}

/// Extension without the dot, or `unknown`
pub fn file_type(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn display_relative(base: &Path, path: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) => {
            let parts: Vec<_> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            format!("/{}", parts.join("/"))
        }
        Err(_) => path.to_string_lossy().into_owned(),
    }
}
