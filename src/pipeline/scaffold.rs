//! Structure scaffolding: asset directories plus placeholder stylesheet and script.

use futures::future::try_join_all;

use crate::constants::layout;
use crate::storage::SiteWorkspace;
use crate::types::{FileKind, FileRecord, Project, Result};

pub fn stylesheet(project_name: &str) -> String {
    format!(
        "/* Custom CSS for {project_name} */\n\n@tailwind base;\n@tailwind components;\n@tailwind utilities;"
    )
}

pub fn script(project_name: &str) -> String {
    format!(
        "// Custom JS for {project_name}\n\ndocument.addEventListener('alpine:init', () => {{\n  // Alpine.js initialization\n}});"
    )
}

/// Create the asset tree and append two `asset` records
pub async fn build(workspace: &SiteWorkspace, project: &mut Project) -> Result<()> {
    let name = project.project_name.as_str();

    try_join_all(
        [layout::CSS_DIR, layout::JS_DIR, layout::IMAGES_DIR]
            .into_iter()
            .map(|dir| async move { workspace.create_dirs(name, &[dir]).await }),
    )
    .await?;

    let css_rel = format!("{}/{}", layout::CSS_DIR, layout::STYLESHEET);
    let js_rel = format!("{}/{}", layout::JS_DIR, layout::SCRIPT);
    let css = stylesheet(name);
    let js = script(name);

    let (css_path, js_path) = futures::try_join!(
        workspace.write_file(name, &css_rel, &css),
        workspace.write_file(name, &js_rel, &js),
    )?;

    project.record_file(FileRecord::new(
        layout::STYLESHEET,
        css_path.to_string_lossy(),
        FileKind::Asset,
    ));
    project.record_file(FileRecord::new(
        layout::SCRIPT,
        js_path.to_string_lossy(),
        FileKind::Asset,
    ));
    Ok(())
}
