//! Project documentation (`PROJECT_DOCS.md`)

use crate::constants::layout;
use crate::storage::SiteWorkspace;
use crate::types::{FileKind, FileRecord, Project, Result};

const FOOTER: &str = "Generated by Professional Website Generator";

/// Render the Markdown overview of a project
pub fn render(project: &Project) -> String {
    let pages = project
        .pages
        .iter()
        .map(|p| format!("### {}\n**File:** {}\n\n{}", p.name, p.file_name, p.description))
        .collect::<Vec<_>>()
        .join("\n\n");

    let files = project
        .pages
        .iter()
        .map(|p| p.file_name.as_str())
        .collect::<Vec<_>>()
        .join("\n  - ");

    format!(
        r#"# {name}

## Description
{prompt}

## Style
{style}

## Pages
{pages}

## Structure
- /assets
  - /css
  - /js
  - /images
- /pages
  - {files}
- index.html

{FOOTER}"#,
        name = project.project_name,
        prompt = project.prompt,
        style = project.style,
    )
    .trim()
    .to_string()
}

/// Write the documentation file and append a `documentation` record
pub async fn write(workspace: &SiteWorkspace, project: &mut Project) -> Result<()> {
    let content = render(project);
    let path = workspace
        .write_file(&project.project_name, layout::DOCS_FILE, &content)
        .await?;
    project.record_file(FileRecord::new(
        layout::DOCS_FILE,
        path.to_string_lossy(),
        FileKind::Documentation,
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Page;

    #[test]
    fn test_render_template() {
        let mut project = Project::new("bakery-site", "A neighbourhood bakery", "rustic");
        project.pages = vec![
            Page {
                name: "Menu".to_string(),
                description: "Breads and cakes".to_string(),
                file_name: "menu.html".to_string(),
                generated: true,
            },
            Page {
                name: "Contact".to_string(),
                description: "Hours and map".to_string(),
                file_name: "contact.html".to_string(),
                generated: true,
            },
        ];

        let doc = render(&project);
        assert!(doc.starts_with("# bakery-site\n\n## Description\nA neighbourhood bakery"));
        assert!(doc.contains("## Style\nrustic"));
        assert!(doc.contains(
            "### Menu\n**File:** menu.html\n\nBreads and cakes\n\n### Contact\n**File:** contact.html\n\nHours and map"
        ));
        assert!(doc.contains("- /pages\n  - menu.html\n  - contact.html\n- index.html"));
        assert!(doc.ends_with("Generated by Professional Website Generator"));
    }
}
