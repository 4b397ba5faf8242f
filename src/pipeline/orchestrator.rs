//! Project Orchestrator
//!
//! Accepts a generation request, derives the project name, stores the initial
//! record and hands it to a detached background run. The caller gets a
//! [`RunTicket`] immediately; progress is observed through the store only.
//!
//! At most one run per project name is in flight. The registry entry is
//! released when the background task ends, including by panic.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use super::{CheckpointManager, SitePipeline, naming};
use crate::ai::{ContentGenerator, create_provider};
use crate::config::Config;
use crate::storage::{ProjectStore, SharedStore, SiteWorkspace};
use crate::types::{Project, Result, SiteError};

type RunRegistry = Arc<DashMap<String, Uuid>>;

/// Handle to an accepted request and its background run
pub struct RunTicket {
    /// Record as first stored (status `processing`, progress 5)
    pub project: Project,
    pub run_id: Uuid,
    handle: JoinHandle<Project>,
}

impl RunTicket {
    /// Wait for the background run and return the final record
    pub async fn wait(self) -> Result<Project> {
        self.handle
            .await
            .map_err(|e| SiteError::Storage(format!("Background run aborted: {}", e)))
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[derive(Clone)]
pub struct ProjectOrchestrator {
    generator: ContentGenerator,
    store: SharedStore,
    workspace: SiteWorkspace,
    default_style: String,
    runs: RunRegistry,
}

impl ProjectOrchestrator {
    pub fn new(
        generator: ContentGenerator,
        store: SharedStore,
        workspace: SiteWorkspace,
        default_style: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            store,
            workspace,
            default_style: default_style.into(),
            runs: Arc::new(DashMap::new()),
        }
    }

    /// Wire provider, store and workspace from configuration.
    ///
    /// Initializes the project document and the projects root so a corrupt
    /// store is reported at startup rather than on the first request.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let provider = create_provider(&config.llm)?;
        let generator = ContentGenerator::from_config(provider, &config.llm);

        let store = ProjectStore::shared(config.storage.db_path());
        store.load().await?;
        let workspace = SiteWorkspace::new(config.storage.projects_root());
        workspace.ensure_root().await?;

        info!(
            store = %store.path().display(),
            projects = %workspace.root().display(),
            provider = generator.provider().name(),
            model = generator.provider().model(),
            "Orchestrator ready"
        );
        Ok(Self::new(
            generator,
            store,
            workspace,
            config.generation.default_style.clone(),
        ))
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn workspace(&self) -> &SiteWorkspace {
        &self.workspace
    }

    /// Whether a background run for `name` is still in flight
    pub fn is_running(&self, name: &str) -> bool {
        self.runs.contains_key(name)
    }

    /// Validate, name, persist, and spawn the background run.
    ///
    /// Name derivation failures are returned here and no record is created.
    pub async fn start(&self, prompt: &str, style: Option<&str>) -> Result<RunTicket> {
        if prompt.trim().is_empty() {
            return Err(SiteError::Validation("Prompt is required".to_string()));
        }
        let style = style
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.default_style.as_str());

        let name = naming::derive_project_name(&self.generator, prompt).await?;
        let run_id = Uuid::new_v4();
        let guard = RunGuard::acquire(&self.runs, &name, run_id)?;

        let project = self.store.put(&Project::new(&name, prompt, style)).await?;
        info!(project = %name, run_id = %run_id, style, "Project generation started");

        let pipeline = SitePipeline::new(
            self.generator.clone(),
            self.workspace.clone(),
            CheckpointManager::new(self.store.clone()),
            run_id,
        );
        let initial = project.clone();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            pipeline.run_with_recovery(project).await
        });

        Ok(RunTicket {
            project: initial,
            run_id,
            handle,
        })
    }
}

/// Registry entry for one in-flight run, removed on drop
struct RunGuard {
    runs: RunRegistry,
    name: String,
    run_id: Uuid,
}

impl RunGuard {
    fn acquire(runs: &RunRegistry, name: &str, run_id: Uuid) -> Result<Self> {
        match runs.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                warn!(project = name, active_run = %entry.get(), "Run already in flight");
                Err(SiteError::RunInProgress(name.to_string()))
            }
            Entry::Vacant(entry) => {
                entry.insert(run_id);
                Ok(Self {
                    runs: Arc::clone(runs),
                    name: name.to_string(),
                    run_id,
                })
            }
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.runs.remove_if(&self.name, |_, id| *id == self.run_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::testing::ScriptedProvider;
    use crate::types::ProjectStatus;
    use std::time::Duration;
    use tempfile::TempDir;

    fn orchestrator(dir: &TempDir, provider: ScriptedProvider) -> ProjectOrchestrator {
        ProjectOrchestrator::new(
            ContentGenerator::new(Arc::new(provider), Duration::from_secs(5), 0),
            ProjectStore::shared(dir.path().join("projects_db.json")),
            SiteWorkspace::new(dir.path().join("Projects")),
            "modern",
        )
    }

    #[tokio::test]
    async fn test_from_config_initializes_storage() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = dir.path().to_path_buf();
        config.llm.api_key = Some(secrecy::SecretString::from("sk-test"));

        let orch = ProjectOrchestrator::from_config(&config).await.unwrap();
        assert!(dir.path().join("projects_db.json").exists());
        assert!(dir.path().join("Projects").is_dir());
        assert!(orch.store().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected() {
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(&dir, ScriptedProvider::bakery());

        let err = orch.start("   ", None).await.err().unwrap();
        assert!(matches!(err, SiteError::Validation(ref m) if m == "Prompt is required"));
        assert!(orch.store().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_name_failure_creates_no_record() {
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(&dir, ScriptedProvider::new());

        let err = orch.start("a bakery site", None).await.err().unwrap();
        assert!(matches!(err, SiteError::GenerationFailed));
        assert!(orch.store().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_returns_before_run_completes() {
        let dir = TempDir::new().unwrap();
        let (provider, gate) = ScriptedProvider::bakery().gated("list needed pages");
        let orch = orchestrator(&dir, provider);

        let ticket = orch.start("a bakery site", Some("  ")).await.unwrap();
        assert_eq!(ticket.project.project_name, "bakery-site");
        assert_eq!(ticket.project.style, "modern");

        let stored = orch.store().get("bakery-site").await.unwrap().unwrap();
        assert_eq!(stored.status, ProjectStatus::Processing);
        assert!(stored.progress >= 5 && stored.progress <= 10);
        assert!(orch.is_running("bakery-site"));

        gate.add_permits(64);
        let done = ticket.wait().await.unwrap();
        assert_eq!(done.status, ProjectStatus::Completed);
        assert!(!orch.is_running("bakery-site"));
    }

    #[tokio::test]
    async fn test_same_name_rejected_while_in_flight() {
        let dir = TempDir::new().unwrap();
        let (provider, gate) = ScriptedProvider::bakery().gated("list needed pages");
        let orch = orchestrator(&dir, provider);

        let first = orch.start("a bakery site", None).await.unwrap();
        let second = orch.start("a bakery site", None).await;
        assert!(matches!(second, Err(SiteError::RunInProgress(ref n)) if n == "bakery-site"));

        gate.add_permits(64);
        first.wait().await.unwrap();

        let again = orch.start("a bakery site", Some("retro")).await.unwrap();
        let done = again.wait().await.unwrap();
        assert_eq!(done.status, ProjectStatus::Completed);
        assert_eq!(done.style, "retro");
    }

    #[tokio::test]
    async fn test_failed_run_releases_registry() {
        let dir = TempDir::new().unwrap();
        let provider = ScriptedProvider::bakery().replace("generate detailed descriptions", "nope");
        let orch = orchestrator(&dir, provider);

        let ticket = orch.start("a bakery site", None).await.unwrap();
        let done = ticket.wait().await.unwrap();
        assert_eq!(done.status, ProjectStatus::Failed);
        assert!(!orch.is_running("bakery-site"));
    }
}
