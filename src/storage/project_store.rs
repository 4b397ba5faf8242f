//! JSON Project Store
//!
//! Flat-file persistence for project records keyed by `projectName`, backed by
//! a single `{ "projects": [...] }` document.
//!
//! - Every operation holds one store-wide async mutex across the whole
//!   load-merge-store cycle, so concurrent `put`s never lose updates
//! - Writes go to a sibling temp file which is renamed over the document
//! - An unparsable document is an error; it is never reset

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::types::{Project, Result, SiteError};

/// Shared store handle for the server and background runs.
pub type SharedStore = Arc<ProjectStore>;

/// On-disk document shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub projects: Vec<Project>,
}

pub struct ProjectStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl std::fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore")
            .field("path", &self.path)
            .finish()
    }
}

impl ProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn shared(path: impl Into<PathBuf>) -> SharedStore {
        Arc::new(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document, creating an empty one if it does not exist
    pub async fn load(&self) -> Result<StoreDocument> {
        let _guard = self.lock.lock().await;
        self.read_locked().await
    }

    pub async fn get(&self, name: &str) -> Result<Option<Project>> {
        let doc = self.load().await?;
        Ok(doc.projects.into_iter().find(|p| p.project_name == name))
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        Ok(self.load().await?.projects)
    }

    /// Upsert by `projectName` and return the record as stored.
    ///
    /// An existing record keeps its stored `createdAt`; `updatedAt` is always
    /// refreshed. New records get both timestamps set to now.
    pub async fn put(&self, project: &Project) -> Result<Project> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read_locked().await?;

        let now = Utc::now();
        let mut stored = project.clone();
        stored.updated_at = now;

        match doc
            .projects
            .iter_mut()
            .find(|p| p.project_name == project.project_name)
        {
            Some(existing) => {
                stored.created_at = existing.created_at;
                *existing = stored.clone();
            }
            None => {
                stored.created_at = now;
                doc.projects.push(stored.clone());
            }
        }

        self.write_locked(&doc).await?;
        debug!(
            project = %stored.project_name,
            status = %stored.status,
            progress = stored.progress,
            "Project saved"
        );
        Ok(stored)
    }

    // =========================================================================
    // Internal (caller holds the lock)
    // =========================================================================

    async fn read_locked(&self) -> Result<StoreDocument> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                SiteError::Storage(format!(
                    "Corrupt project store {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let doc = StoreDocument::default();
                self.write_locked(&doc).await?;
                info!("Initialized project store: {}", self.path.display());
                Ok(doc)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_locked(&self, doc: &StoreDocument) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(doc)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileKind, FileRecord, ProjectStatus};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ProjectStore {
        ProjectStore::new(dir.path().join("projects_db.json"))
    }

    #[tokio::test]
    async fn test_load_initializes_missing_document() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let doc = store.load().await.unwrap();
        assert!(doc.projects.is_empty());

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"projects": []}));
    }

    #[tokio::test]
    async fn test_corrupt_document_is_error_and_untouched() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load().await, Err(SiteError::Storage(_))));
        assert!(store.put(&Project::new("a", "b", "modern")).await.is_err());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_put_inserts_then_replaces() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let first = store
            .put(&Project::new("bakery-site", "a bakery", "modern"))
            .await
            .unwrap();
        assert_eq!(first.created_at, first.updated_at);

        let mut update = first.clone();
        update.created_at = Utc::now() + chrono::Duration::days(1);
        update.status = ProjectStatus::Completed;
        update.progress = 100;
        update.record_file(FileRecord::new("index.html", "/x/index.html", FileKind::Page));

        let second = store.put(&update).await.unwrap();
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, ProjectStatus::Completed);
        assert_eq!(all[0].generated_files.len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_puts_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_in(&dir));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .put(&Project::new(format!("site-{i}"), "p", "modern"))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.project_name)
            .collect();
        names.sort();
        assert_eq!(names.len(), 16);
        names.dedup();
        assert_eq!(names.len(), 16);
        assert!(!dir.path().join("projects_db.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::new(dir.path().join("nested/data/projects_db.json"));
        store.put(&Project::new("a", "b", "modern")).await.unwrap();
        assert!(store.path().exists());
    }
}
