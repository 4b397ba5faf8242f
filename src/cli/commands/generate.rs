//! Generate Command
//!
//! Foreground generation: starts a run exactly as the API does, then follows
//! it through the store and prints each checkpoint as it lands.

use std::time::Duration;

use crate::cli::{CommandContext, Output, runtime};
use crate::constants::cli::POLL_INTERVAL_MS;
use crate::pipeline::{ProjectOrchestrator, RunTicket};
use crate::storage::SharedStore;
use crate::types::{Project, ProjectStatus, Result, SiteError};

pub fn run(ctx: &CommandContext, prompt: &str, style: Option<&str>) -> Result<()> {
    let output = Output::new();
    let rt = runtime()?;

    let project = rt.block_on(async {
        let orchestrator = ProjectOrchestrator::from_config(&ctx.config).await?;
        let ticket = orchestrator.start(prompt, style).await?;

        output.header(&format!("Generating {}", ticket.project.project_name));
        output.field("Style", &ticket.project.style);
        println!();

        follow(orchestrator.store(), ticket, |progress, label| {
            output.checkpoint(progress, label)
        })
        .await
    })?;

    println!();
    match project.status {
        ProjectStatus::Completed => {
            let dir = ctx.workspace().project_dir(&project.project_name);
            output.success(&format!("Generated {}", project.project_name));
            output.field("Location", dir.display());
            output.field("Pages", project.pages.len() + 1);
            output.field("Files", project.generated_files.len());
            Ok(())
        }
        status => {
            output.error(&format!(
                "Generation {} at {}% (last: {})",
                status, project.progress, project.last_generated_file
            ));
            Err(SiteError::GenerationFailed)
        }
    }
}

/// Poll the store until the run finishes, reporting every new checkpoint.
///
/// The final record is always reported, so a checkpoint that landed
/// between the last poll and completion is not missed.
pub async fn follow(
    store: &SharedStore,
    ticket: RunTicket,
    mut on_checkpoint: impl FnMut(u8, &str),
) -> Result<Project> {
    let name = ticket.project.project_name.clone();
    let mut last = (ticket.project.progress, ticket.project.last_generated_file.clone());
    on_checkpoint(last.0, &last.1);

    let mut report = |project: &Project| {
        let current = (project.progress, project.last_generated_file.clone());
        if current != last {
            on_checkpoint(current.0, &current.1);
            last = current;
        }
    };

    let mut interval = tokio::time::interval(Duration::from_millis(POLL_INTERVAL_MS));
    while !ticket.is_finished() {
        interval.tick().await;
        if let Some(project) = store.get(&name).await? {
            report(&project);
        }
    }

    let project = ticket.wait().await?;
    report(&project);
    Ok(project)
}
