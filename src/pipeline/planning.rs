//! Page planning
//!
//! Two calls: a comma-separated list of page names, then a JSON array of page
//! descriptors. The array is validated against a strict schema; any violation
//! is a `MalformedPlan` error and ends the run.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::ai::{ContentGenerator, prompt};
use crate::constants::layout;
use crate::types::{Page, PlanError, Result};

pub async fn plan_pages(generator: &ContentGenerator, request: &str) -> Result<Vec<Page>> {
    let listing = generator.generate(&prompt::page_list(request), None).await?;
    let names = parse_page_names(&listing);
    debug!(pages = ?names, "Page names planned");

    let response = generator
        .generate(&prompt::page_descriptions(request, &names), None)
        .await?;

    parse_page_plan(&response).map_err(|e| {
        warn!(error = %e, "Rejected page plan");
        e.into()
    })
}

/// Split on commas, trim, and drop empties
pub fn parse_page_names(listing: &str) -> Vec<String> {
    listing
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse the JSON array between the first `[` and the last `]`.
///
/// `generated` is always reset to `false` regardless of what the model sent.
pub fn parse_page_plan(response: &str) -> std::result::Result<Vec<Page>, PlanError> {
    let (start, end) = match (response.find('['), response.rfind(']')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(PlanError::NoArray),
    };

    let items: Vec<Value> =
        serde_json::from_str(&response[start..=end]).map_err(PlanError::InvalidJson)?;

    let mut seen = HashSet::new();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let page = parse_page(index, item)?;
            if !seen.insert(page.file_name.to_ascii_lowercase()) {
                return Err(PlanError::Schema {
                    index,
                    reason: format!("fileName '{}' appears more than once", page.file_name),
                });
            }
            Ok(page)
        })
        .collect()
}

fn parse_page(index: usize, item: &Value) -> std::result::Result<Page, PlanError> {
    let schema = |reason: &str| PlanError::Schema {
        index,
        reason: reason.to_string(),
    };

    let object = item.as_object().ok_or_else(|| schema("expected an object"))?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| schema("name must be a non-empty string"))?;

    let description = object
        .get("description")
        .and_then(Value::as_str)
        .ok_or_else(|| schema("description must be a string"))?;

    let file_name = object
        .get("fileName")
        .and_then(Value::as_str)
        .map(str::trim)
        .ok_or_else(|| schema("fileName must be a string"))?;

    if !is_plain_file_name(file_name) {
        return Err(schema(&format!(
            "fileName '{}' must be a plain file name",
            file_name
        )));
    }

    if [layout::INDEX_FILE, layout::DOCS_FILE]
        .iter()
        .any(|reserved| file_name.eq_ignore_ascii_case(reserved))
    {
        return Err(schema(&format!("fileName '{}' is reserved", file_name)));
    }

    if let Some(generated) = object.get("generated")
        && !generated.is_boolean()
    {
        return Err(schema("generated must be a boolean"));
    }

    Ok(Page {
        name: name.to_string(),
        description: description.to_string(),
        file_name: file_name.to_string(),
        generated: false,
    })
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\', '\0'])
        && !name.contains("..")
        && name != "."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_names() {
        assert_eq!(
            parse_page_names(" Menu, Contact ,, About Us,"),
            vec!["Menu", "Contact", "About Us"]
        );
        assert!(parse_page_names("  ").is_empty());
    }

    #[test]
    fn test_parse_plan_with_surrounding_prose() {
        let response = r#"Sure! [{"name":"Menu","description":"Breads","fileName":"menu.html","generated":true}] hope it helps"#;
        let pages = parse_page_plan(response).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "Menu");
        assert_eq!(pages[0].file_name, "menu.html");
        assert!(!pages[0].generated);
    }

    #[test]
    fn test_empty_array_is_accepted() {
        assert!(parse_page_plan("[]").unwrap().is_empty());
    }

    #[test]
    fn test_no_array() {
        assert!(matches!(
            parse_page_plan("I could not do that"),
            Err(PlanError::NoArray)
        ));
        assert!(matches!(parse_page_plan("] oops ["), Err(PlanError::NoArray)));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_page_plan("[{name: Menu}]"),
            Err(PlanError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_schema_violations() {
        let cases = [
            r#"["menu.html"]"#,
            r#"[{"description":"d","fileName":"a.html"}]"#,
            r#"[{"name":"  ","description":"d","fileName":"a.html"}]"#,
            r#"[{"name":"A","fileName":"a.html"}]"#,
            r#"[{"name":"A","description":"d"}]"#,
            r#"[{"name":"A","description":"d","fileName":""}]"#,
            r#"[{"name":"A","description":"d","fileName":"../a.html"}]"#,
            r#"[{"name":"A","description":"d","fileName":"sub/a.html"}]"#,
            r#"[{"name":"A","description":"d","fileName":"a.html","generated":"no"}]"#,
            r#"[{"name":"Home","description":"d","fileName":"index.html"}]"#,
            r#"[{"name":"Docs","description":"d","fileName":"PROJECT_DOCS.md"}]"#,
        ];
        for case in cases {
            assert!(
                matches!(parse_page_plan(case), Err(PlanError::Schema { index: 0, .. })),
                "expected schema error for {case}"
            );
        }
    }

    #[test]
    fn test_schema_error_reports_index() {
        let response = r#"[
            {"name":"Menu","description":"d","fileName":"menu.html"},
            {"name":"Contact","description":"d","fileName":"/etc/passwd"}
        ]"#;
        assert!(matches!(
            parse_page_plan(response),
            Err(PlanError::Schema { index: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_file_name_is_rejected() {
        let response = r#"[
            {"name":"Menu","description":"d","fileName":"menu.html"},
            {"name":"Specials","description":"d","fileName":"Menu.html"}
        ]"#;
        match parse_page_plan(response) {
            Err(PlanError::Schema { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("more than once"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }
}
