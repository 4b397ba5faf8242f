//! Prompt Templates
//!
//! Every prompt the site pipeline sends. The system prompt is layered as
//! role, optional caller context, then the output-format rules; user prompts
//! carry the per-stage instruction.

use crate::types::Page;

/// Role given to the model on every call
pub const ROLE: &str =
    "You are a professional web developer. Generate clean, modern HTML with Tailwind CSS and Alpine.js.";

/// Output rules appended to every system prompt
pub const OUTPUT_RULES: &str = "IMPORTANT: Return ONLY the raw HTML code without any additional text, explanations, or markdown formatting. Do not include any introductory sentences or code block markers like ```html.";

/// Compose the system message: role, then context, then output rules
pub fn system_prompt(context: Option<&str>) -> String {
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!("{ROLE}\n\n{context}\n\n{OUTPUT_RULES}"),
        None => format!("{ROLE}\n\n{OUTPUT_RULES}"),
    }
}

pub fn project_name(prompt: &str) -> String {
    format!(
        "Based on this project description: \"{prompt}\", suggest a concise, professional project name as a single lowercase string with hyphens, no spaces. Only return the name, no other text."
    )
}

pub fn page_list(prompt: &str) -> String {
    format!("Based on: \"{prompt}\", list needed pages as comma-separated names.")
}

pub fn page_descriptions(prompt: &str, page_names: &[String]) -> String {
    format!(
        r#"For a website with this description: "{prompt}",
generate detailed descriptions for these pages: {pages}.

For each page, provide:
1. A 2-3 sentence description
2. Key elements to include
3. Appropriate tone/style

Return in this exact JSON format:
[
  {{
    "name": "Page Name",
    "description": "Page description",
    "fileName": "page-name.html",
    "generated": false
  }}
]
Only return the JSON array, no additional text."#,
        pages = page_names.join(", ")
    )
}

pub fn index_page(prompt: &str, project_name: &str, style: &str, pages: &[Page]) -> String {
    let pages_list = pages
        .iter()
        .map(|p| format!("- {}: {}", p.name, p.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Create a professional {style} HTML file using Tailwind CSS and Alpine.js based on:
Project: {project_name}
Description: {prompt}

Pages:
{pages_list}

Requirements:
- HTML5 semantic structure
- Responsive navigation
- Pages link is just pagename.html
- Tailwind CSS (CDN)
- Dark mode toggle
- Everything is interactive Using alpine Js
- No external links, use icons for previews
Return only raw HTML code."#
    )
}

pub fn subpage(page: &Page) -> String {
    format!(
        "Create a {} page matching the style of the provided index.html.\nPurpose: {}\nReturn ONLY raw HTML code.",
        page.name, page.description
    )
}

/// Context handed to every subpage call so pages match the landing page
pub fn index_context(index_html: &str) -> String {
    format!("The index.html content is: {index_html}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(name: &str, description: &str, file: &str) -> Page {
        Page {
            name: name.to_string(),
            description: description.to_string(),
            file_name: file.to_string(),
            generated: false,
        }
    }

    #[test]
    fn test_system_prompt_layering() {
        let bare = system_prompt(None);
        assert!(bare.starts_with(ROLE));
        assert!(bare.ends_with(OUTPUT_RULES));

        let with_context = system_prompt(Some("The index.html content is: <html/>"));
        let role_at = with_context.find(ROLE).unwrap();
        let context_at = with_context.find("The index.html content").unwrap();
        let rules_at = with_context.find(OUTPUT_RULES).unwrap();
        assert!(role_at < context_at && context_at < rules_at);
    }

    #[test]
    fn test_blank_context_is_ignored() {
        assert_eq!(system_prompt(Some("   ")), system_prompt(None));
    }

    #[test]
    fn test_index_prompt_lists_pages() {
        let pages = vec![
            page("Menu", "Breads and cakes", "menu.html"),
            page("Contact", "Hours and map", "contact.html"),
        ];
        let prompt = index_page("a bakery", "bakery-site", "rustic", &pages);

        assert!(prompt.starts_with("Create a professional rustic HTML file"));
        assert!(prompt.contains("Project: bakery-site"));
        assert!(prompt.contains("- Menu: Breads and cakes\n- Contact: Hours and map"));
        assert!(prompt.contains("- Pages link is just pagename.html"));
    }

    #[test]
    fn test_descriptions_prompt_names_pages() {
        let prompt = page_descriptions("a bakery", &["Menu".to_string(), "Contact".to_string()]);
        assert!(prompt.contains("these pages: Menu, Contact."));
        assert!(prompt.contains("\"fileName\": \"page-name.html\""));
    }
}
