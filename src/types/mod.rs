pub mod error;
pub mod project;

pub use error::{
    ErrorCategory, ErrorClassifier, LlmError, PlanError, Result, SiteError,
};
pub use project::{
    FileKind, FileRecord, Page, Project, ProjectStatus, normalize_project_name, page_progress,
};
