//! Status Command
//!
//! Display one project's persisted state.

use console::style;

use crate::cli::{CommandContext, Output, runtime, wants_json};
use crate::types::{FileKind, Project, Result, SiteError};

pub fn run(ctx: &CommandContext, project_name: &str, format: &str) -> Result<()> {
    let json_output = wants_json(format)?;
    let store = ctx.store();

    let rt = runtime()?;
    let project = rt
        .block_on(store.get(project_name))?
        .ok_or_else(|| SiteError::ProjectNotFound(project_name.to_string()))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&project)?);
    } else {
        print_text(&Output::new(), &project);
    }
    Ok(())
}

fn print_text(output: &Output, project: &Project) {
    output.header(&format!("Project {}", project.project_name));
    output.field("Status", output.status_badge(project.status));
    output.field("Progress", format!("{}%", project.progress));
    output.field("Last", &project.last_generated_file);
    output.field("Style", &project.style);
    output.field("Created", project.created_at.to_rfc3339());
    output.field("Updated", project.updated_at.to_rfc3339());

    if !project.pages.is_empty() {
        output.section("Pages");
        for page in &project.pages {
            let mark = if page.generated {
                style("✓").green()
            } else {
                style("·").dim()
            };
            println!("  {} {:<24} {}", mark, page.name, style(&page.file_name).dim());
        }
    }

    output.section("Files");
    for kind in [FileKind::Page, FileKind::Asset, FileKind::Documentation] {
        output.field(kind_label(kind), project.files_of_kind(kind).count());
    }
}

fn kind_label(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Page => "Pages",
        FileKind::Asset => "Assets",
        FileKind::Documentation => "Docs",
    }
}
