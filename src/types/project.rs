//! Project record types
//!
//! The persisted shape of a generation job. Field names serialize in
//! camelCase so the JSON document stays readable by the web client.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{labels, progress};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

/// Lifecycle status of a project run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Processing,
    Completed,
    Failed,
}

impl ProjectStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of artifact recorded in `generatedFiles`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Page,
    Asset,
    Documentation,
}

/// A planned page of the site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub name: String,
    pub description: String,
    pub file_name: String,
    #[serde(default)]
    pub generated: bool,
}

/// Append-only log entry for one artifact written to disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub generated_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: FileKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            generated_at: Utc::now(),
        }
    }
}

/// One website generation job and its persisted state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_name: String,
    pub prompt: String,
    pub style: String,
    pub status: ProjectStatus,
    pub progress: u8,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub generated_files: Vec<FileRecord>,
    pub last_generated_file: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create the initial record for a freshly accepted request
    pub fn new(
        project_name: impl Into<String>,
        prompt: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            project_name: project_name.into(),
            prompt: prompt.into(),
            style: style.into(),
            status: ProjectStatus::Processing,
            progress: progress::INITIAL,
            pages: Vec::new(),
            generated_files: Vec::new(),
            last_generated_file: labels::INITIALIZING.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Advance progress, never moving it backwards
    pub fn advance(&mut self, checkpoint: u8) {
        self.progress = self.progress.max(checkpoint.min(progress::COMPLETE));
    }

    pub fn record_file(&mut self, record: FileRecord) {
        self.generated_files.push(record);
    }

    pub fn files_of_kind(&self, kind: FileKind) -> impl Iterator<Item = &FileRecord> {
        self.generated_files.iter().filter(move |f| f.kind == kind)
    }
}

/// Progress after `completed` of `total` pages have been written.
///
/// Linear ramp from the index checkpoint to the pages checkpoint:
/// `floor(completed / total * 30) + 40`.
pub fn page_progress(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return progress::INDEX_GENERATED;
    }
    let span = usize::from(progress::PAGES_GENERATED - progress::INDEX_GENERATED);
    let step = completed.min(total) * span / total;
    progress::INDEX_GENERATED + step as u8
}

/// Normalize a raw model-suggested name into a project slug.
///
/// Trims, collapses whitespace runs to `-` and lowercases, then keeps only
/// characters that are safe in a directory name. Returns `None` when nothing
/// usable remains.
pub fn normalize_project_name(raw: &str) -> Option<String> {
    let hyphenated = WHITESPACE.replace_all(raw.trim(), "-").to_lowercase();
    let filtered: String = hyphenated
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let slug = HYPHEN_RUNS.replace_all(&filtered, "-");
    let slug = slug.trim_matches('-');
    (!slug.is_empty()).then(|| slug.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_project_defaults() {
        let project = Project::new("bakery-site", "a bakery", "modern");
        assert_eq!(project.status, ProjectStatus::Processing);
        assert_eq!(project.progress, 5);
        assert_eq!(project.last_generated_file, "Initializing project");
        assert!(project.pages.is_empty());
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut project = Project::new("bakery-site", "a bakery", "modern");
        project.record_file(FileRecord::new("app.js", "/tmp/app.js", FileKind::Asset));
        let json = serde_json::to_value(&project).unwrap();

        assert_eq!(json["projectName"], "bakery-site");
        assert_eq!(json["status"], "processing");
        assert_eq!(json["lastGeneratedFile"], "Initializing project");
        assert_eq!(json["generatedFiles"][0]["type"], "asset");
        assert!(json["generatedFiles"][0]["generatedAt"].is_string());
    }

    #[test]
    fn test_page_generated_defaults_false() {
        let page: Page =
            serde_json::from_str(r#"{"name":"Menu","description":"d","fileName":"menu.html"}"#)
                .unwrap();
        assert!(!page.generated);
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut project = Project::new("p", "x", "modern");
        project.advance(40);
        project.advance(20);
        assert_eq!(project.progress, 40);
        project.advance(250);
        assert_eq!(project.progress, 100);
    }

    #[test]
    fn test_page_progress_ramp() {
        assert_eq!(page_progress(1, 2), 55);
        assert_eq!(page_progress(2, 2), 70);
        assert_eq!(page_progress(1, 3), 50);
        assert_eq!(page_progress(2, 3), 60);
        assert_eq!(page_progress(3, 3), 70);
        assert_eq!(page_progress(0, 0), 40);
    }

    #[test]
    fn test_normalize_project_name() {
        assert_eq!(
            normalize_project_name("  Bakery Site \n").as_deref(),
            Some("bakery-site")
        );
        assert_eq!(
            normalize_project_name("\"sweet-crumbs\"").as_deref(),
            Some("sweet-crumbs")
        );
        assert_eq!(
            normalize_project_name("../../etc").as_deref(),
            Some("etc")
        );
        assert_eq!(normalize_project_name("   "), None);
        assert_eq!(normalize_project_name("!!!"), None);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!ProjectStatus::Processing.is_terminal());
        assert!(ProjectStatus::Completed.is_terminal());
        assert!(ProjectStatus::Failed.is_terminal());
    }

    proptest! {
        #[test]
        fn prop_slug_is_directory_safe(raw in ".{0,64}") {
            if let Some(slug) = normalize_project_name(&raw) {
                prop_assert!(!slug.is_empty());
                prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
                prop_assert!(!slug.contains("--"));
                prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase()
                    || c.is_ascii_digit() || c == '-' || c == '_'));
            }
        }

        #[test]
        fn prop_page_progress_non_decreasing(total in 1usize..64) {
            let mut last = page_progress(0, total);
            for done in 1..=total {
                let next = page_progress(done, total);
                prop_assert!(next >= last);
                prop_assert!((40..=70).contains(&next));
                last = next;
            }
            prop_assert_eq!(last, 70);
        }
    }
}
