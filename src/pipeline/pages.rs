//! Landing page and per-page generation.
//!
//! Subpages are generated strictly in plan order, each grounded on the
//! landing page markup so the site shares one look.

use tracing::info;

use crate::ai::{ContentGenerator, prompt};
use crate::constants::layout;
use crate::storage::SiteWorkspace;
use crate::types::{FileKind, FileRecord, Project, Result};

/// Generate and write `index.html`; returns its markup for later pages
pub async fn generate_index(
    generator: &ContentGenerator,
    workspace: &SiteWorkspace,
    project: &mut Project,
) -> Result<String> {
    let request = prompt::index_page(
        &project.prompt,
        &project.project_name,
        &project.style,
        &project.pages,
    );
    let html = generator.generate(&request, None).await?;

    let path = workspace
        .write_file(&project.project_name, layout::INDEX_FILE, &html)
        .await?;
    project.record_file(FileRecord::new(
        layout::INDEX_FILE,
        path.to_string_lossy(),
        FileKind::Page,
    ));
    Ok(html)
}

/// Generate and write the page at `index` in the plan, marking it generated
pub async fn generate_page(
    generator: &ContentGenerator,
    workspace: &SiteWorkspace,
    project: &mut Project,
    index_html: &str,
    index: usize,
) -> Result<()> {
    let page = &project.pages[index];
    let context = prompt::index_context(index_html);
    let html = generator
        .generate(&prompt::subpage(page), Some(&context))
        .await?;

    let path = workspace
        .write_file(&project.project_name, &page.file_name, &html)
        .await?;
    info!(page = %page.name, file = %page.file_name, "Page generated");

    let record = FileRecord::new(page.name.clone(), path.to_string_lossy(), FileKind::Page);
    project.pages[index].generated = true;
    project.record_file(record);
    Ok(())
}
