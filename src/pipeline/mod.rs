//! Site Generation Pipeline
//!
//! ```text
//! Name → Planning → Scaffold → Index → Pages (in order) → Documentation → Complete
//!  5       15         20        40       40..70               90             100
//! ```
//!
//! ## Stages
//!
//! 1. **Planning**: page names, then a strictly validated JSON page plan
//! 2. **Scaffold**: asset directories plus stylesheet and script placeholders
//! 3. **Index**: landing page linking every planned page
//! 4. **Pages**: one file per planned page, grounded on the landing page
//! 5. **Documentation**: Markdown overview of the project
//!
//! Name derivation runs in the orchestrator before the record exists.
//!
//! ## Guarantees
//!
//! - Every stage is persisted before the next one starts
//! - Progress never moves backwards within a run
//! - Any stage error leaves the record `failed` at its last checkpoint

pub mod checkpoint;
pub mod documentation;
pub mod naming;
pub mod orchestrator;
pub mod pages;
pub mod planning;
pub mod scaffold;

pub use checkpoint::{CheckpointManager, PipelineStage};
pub use orchestrator::{ProjectOrchestrator, RunTicket};

use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::ai::ContentGenerator;
use crate::constants::{labels, layout};
use crate::storage::SiteWorkspace;
use crate::types::{Project, ProjectStatus, Result, page_progress};

/// One background run over one project record
pub struct SitePipeline {
    generator: ContentGenerator,
    workspace: SiteWorkspace,
    checkpoints: CheckpointManager,
    run_id: Uuid,
}

impl SitePipeline {
    pub fn new(
        generator: ContentGenerator,
        workspace: SiteWorkspace,
        checkpoints: CheckpointManager,
        run_id: Uuid,
    ) -> Self {
        Self {
            generator,
            workspace,
            checkpoints,
            run_id,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Run every stage in order, persisting at each checkpoint
    #[instrument(
        skip(self, project),
        fields(project = %project.project_name, run_id = %self.run_id)
    )]
    pub async fn run(&self, project: &mut Project) -> Result<()> {
        let start_time = std::time::Instant::now();

        project.status = ProjectStatus::Processing;
        self.checkpoints
            .complete_stage(PipelineStage::Started, project, labels::STARTED)
            .await?;

        info!("Stage 1: Planning pages");
        project.pages = planning::plan_pages(&self.generator, &project.prompt).await?;
        info!("Planned {} pages", project.pages.len());
        self.checkpoints
            .complete_stage(PipelineStage::Planning, project, labels::PAGES_PLANNED)
            .await?;

        info!("Stage 2: Scaffolding project structure");
        scaffold::build(&self.workspace, project).await?;
        self.checkpoints
            .complete_stage(PipelineStage::Scaffold, project, labels::ASSETS)
            .await?;

        info!("Stage 3: Generating index.html");
        let index_html = pages::generate_index(&self.generator, &self.workspace, project).await?;
        self.checkpoints
            .complete_stage(PipelineStage::Index, project, layout::INDEX_FILE)
            .await?;

        let total = project.pages.len();
        info!("Stage 4: Generating {} pages", total);
        for i in 0..total {
            pages::generate_page(&self.generator, &self.workspace, project, &index_html, i)
                .await?;
            let file_name = project.pages[i].file_name.clone();
            if i + 1 == total {
                self.checkpoints
                    .complete_stage(PipelineStage::Pages, project, file_name)
                    .await?;
            } else {
                self.checkpoints
                    .page_done(project, page_progress(i + 1, total), &file_name)
                    .await?;
            }
        }

        info!("Stage 5: Writing project documentation");
        documentation::write(&self.workspace, project).await?;
        self.checkpoints
            .complete_stage(PipelineStage::Documentation, project, layout::DOCS_FILE)
            .await?;

        project.status = ProjectStatus::Completed;
        self.checkpoints
            .complete_stage(PipelineStage::Complete, project, labels::COMPLETE)
            .await?;

        info!(
            files = project.generated_files.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Site generation complete"
        );
        Ok(())
    }

    /// Run the pipeline and convert any failure into the `failed` state.
    ///
    /// Returns the final in-memory record.
    pub async fn run_with_recovery(&self, mut project: Project) -> Project {
        if let Err(e) = self.run(&mut project).await {
            error!(
                project = %project.project_name,
                run_id = %self.run_id,
                progress = project.progress,
                "Background processing error: {}",
                e
            );
            if let Err(save_err) = self.checkpoints.fail(&mut project).await {
                error!(
                    "Failed to mark project as failed: {}. Original error: {}",
                    save_err, e
                );
            }
        }
        project
    }
}
