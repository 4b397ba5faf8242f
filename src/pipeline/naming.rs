//! Project name derivation
//!
//! Runs before any record exists; a failure here is reported to the caller
//! synchronously.

use tracing::{debug, warn};

use crate::ai::{ContentGenerator, prompt};
use crate::types::{Result, SiteError, normalize_project_name};

/// Ask the model for a name and reduce it to a directory-safe slug
pub async fn derive_project_name(generator: &ContentGenerator, request: &str) -> Result<String> {
    let raw = generator
        .generate(&prompt::project_name(request), None)
        .await?;

    match normalize_project_name(&raw) {
        Some(name) => {
            debug!(raw = %raw, name = %name, "Project name derived");
            Ok(name)
        }
        None => {
            warn!(raw = %raw, "Model returned no usable project name");
            Err(SiteError::GenerationFailed)
        }
    }
}
