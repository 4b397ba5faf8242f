//! List Command
//!
//! Every project in the store, most recently updated first.

use crate::cli::{CommandContext, Output, runtime, wants_json};
use crate::types::Result;

pub fn run(ctx: &CommandContext, format: &str) -> Result<()> {
    let json_output = wants_json(format)?;
    let store = ctx.store();

    let rt = runtime()?;
    let mut projects = rt.block_on(store.list())?;
    projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    if json_output {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    let output = Output::new();
    if projects.is_empty() {
        output.info("No projects yet. Run 'sitewright generate \"<description>\"' to create one.");
        return Ok(());
    }

    output.section(&format!("Projects ({})", projects.len()));
    for project in &projects {
        output.project_row(project);
    }
    Ok(())
}
