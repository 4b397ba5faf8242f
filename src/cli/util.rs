//! CLI Common Utilities
//!
//! Shared initialization for command handlers.

use std::path::{Path, PathBuf};

use tokio::runtime::Runtime;

use crate::config::{Config, ConfigLoader};
use crate::storage::{ProjectStore, SharedStore, SiteWorkspace};
use crate::types::{Result, SiteError};

/// Command execution context
///
/// Commands that touch project data load this once; config-only commands
/// go through [`ConfigLoader`] directly.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    /// Explicit `--config` file, if one was given
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = ConfigLoader::load(config_path)?;
        Ok(Self {
            config,
            config_path: config_path.map(Path::to_path_buf),
        })
    }

    /// Store over `{data_dir}/{db_file}`
    pub fn store(&self) -> SharedStore {
        ProjectStore::shared(self.config.storage.db_path())
    }

    pub fn workspace(&self) -> SiteWorkspace {
        SiteWorkspace::new(self.config.storage.projects_root())
    }
}

/// Multi-threaded runtime for commands that need async work
pub fn runtime() -> Result<Runtime> {
    Runtime::new().map_err(|e| SiteError::Config(format!("Failed to start async runtime: {}", e)))
}

/// Parse an output format flag
pub fn wants_json(format: &str) -> Result<bool> {
    match format.to_lowercase().as_str() {
        "json" => Ok(true),
        "text" => Ok(false),
        other => Err(SiteError::Validation(format!(
            "Invalid format '{}'. Valid values: text, json",
            other
        ))),
    }
}
