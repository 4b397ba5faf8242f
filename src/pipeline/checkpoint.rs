//! Checkpoint Management
//!
//! Every stage boundary is a checkpoint: progress advances, the stage label
//! lands in `lastGeneratedFile`, and the record is persisted before the next
//! stage begins.

use tracing::{debug, info};

use crate::constants::{labels, progress};
use crate::storage::SharedStore;
use crate::types::{Project, ProjectStatus, Result};

/// Stage identifier for checkpoint tracking
///
/// Stages are numbered 1-7 to match the pipeline execution order:
/// - 1: Started - Run picked up the record
/// - 2: Planning - Page list and descriptions
/// - 3: Scaffold - Asset directories and placeholders
/// - 4: Index - Landing page
/// - 5: Pages - One file per planned page
/// - 6: Documentation - PROJECT_DOCS.md
/// - 7: Complete - Terminal success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Started = 1,
    Planning = 2,
    Scaffold = 3,
    Index = 4,
    Pages = 5,
    Documentation = 6,
    Complete = 7,
}

impl PipelineStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started => "Started",
            Self::Planning => "Page Planning",
            Self::Scaffold => "Structure Scaffolding",
            Self::Index => "Index Generation",
            Self::Pages => "Page Generation",
            Self::Documentation => "Documentation",
            Self::Complete => "Complete",
        }
    }

    /// Progress reached once this stage has been persisted
    pub fn progress(&self) -> u8 {
        match self {
            Self::Started => progress::STARTED,
            Self::Planning => progress::PAGES_PLANNED,
            Self::Scaffold => progress::SCAFFOLDED,
            Self::Index => progress::INDEX_GENERATED,
            Self::Pages => progress::PAGES_GENERATED,
            Self::Documentation => progress::DOCUMENTED,
            Self::Complete => progress::COMPLETE,
        }
    }
}

/// Persists project state at stage boundaries
#[derive(Clone)]
pub struct CheckpointManager {
    store: SharedStore,
}

impl CheckpointManager {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Persist the record and adopt the stored timestamps
    pub async fn save(&self, project: &mut Project) -> Result<()> {
        *project = self.store.put(project).await?;
        Ok(())
    }

    /// Mark a stage as completed and persist
    pub async fn complete_stage(
        &self,
        stage: PipelineStage,
        project: &mut Project,
        label: impl Into<String>,
    ) -> Result<()> {
        project.advance(stage.progress());
        project.last_generated_file = label.into();
        self.save(project).await?;

        info!(
            progress = project.progress,
            "Stage {} completed",
            stage.name()
        );
        Ok(())
    }

    /// Record one finished page inside the page stage
    pub async fn page_done(
        &self,
        project: &mut Project,
        checkpoint: u8,
        file_name: &str,
    ) -> Result<()> {
        project.advance(checkpoint);
        project.last_generated_file = file_name.to_string();
        self.save(project).await?;

        debug!(progress = project.progress, file = file_name, "Page saved");
        Ok(())
    }

    /// Move the record into the failed terminal state.
    ///
    /// Progress is left at the last successful checkpoint.
    pub async fn fail(&self, project: &mut Project) -> Result<()> {
        project.status = ProjectStatus::Failed;
        project.last_generated_file = labels::FAILED.to_string();
        project.touch();
        self.save(project).await
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }
}
