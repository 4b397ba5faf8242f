//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/sitewright/config.toml)
//! 3. Project config (.sitewright/config.toml)
//! 4. Explicit `--config` file
//! 5. Environment variables (SITEWRIGHT_* prefix, `__` between sections)
//! 6. `PORT` (hosting-platform convention, maps to server.port)

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{Result, SiteError};

const ENV_PREFIX: &str = "SITEWRIGHT_";

/// Provider-specific key variables consulted when `llm.api_key` is unset
const API_KEY_FALLBACKS: &[&str] = &["DEEPSEEK_API_KEY", "OPENAI_API_KEY"];

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → explicit file → env vars
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit
            && !path.exists()
        {
            return Err(SiteError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let mut config: Config = Self::figment(explicit)
            .extract()
            .map_err(|e| SiteError::Config(format!("Configuration error: {}", e)))?;

        if config.llm.api_key.is_none() {
            config.llm.api_key = API_KEY_FALLBACKS
                .iter()
                .find_map(|var| env::var(var).ok().filter(|v| !v.is_empty()))
                .map(SecretString::from);
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| SiteError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = explicit {
            debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // SITEWRIGHT_LLM__API_BASE -> llm.api_base
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        figment.merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/sitewright/)
    pub fn global_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "sitewright").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".sitewright/config.toml")
    }

    /// Get project config directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".sitewright")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(explicit: Option<&Path>, as_json: bool) -> Result<()> {
        let config = Self::load(explicit)?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config).map_err(|e| SiteError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            SiteError::Config("Cannot determine global config directory".to_string())
        })?;
        Self::write_config(&global_dir, force)?;
        Ok(global_dir)
    }

    /// Initialize project configuration in the current directory
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let project_dir = Self::project_dir();
        Self::write_config(&project_dir, force)?;
        Ok(project_dir)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn write_config(dir: &Path, force: bool) -> Result<()> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_config())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }
        Ok(())
    }

    /// Generate default config content (TOML)
    fn default_config() -> String {
        r#"# Sitewright Configuration
# Project settings in .sitewright/config.toml override the global file.
# Environment variables override both, e.g. SITEWRIGHT_LLM__MODEL=deepseek-chat

version = "1.0"

[server]
host = "0.0.0.0"
port = 5000
request_timeout_secs = 60
cors_origins = []

[storage]
data_dir = "."
db_file = "projects_db.json"
projects_dir = "Projects"

# Any OpenAI-compatible chat-completions endpoint.
# api_key falls back to DEEPSEEK_API_KEY, then OPENAI_API_KEY.
[llm]
provider = "openai"
model = "deepseek-chat"
api_base = "https://api.deepseek.com/v1"
temperature = 0.7
max_tokens = 8000
timeout_secs = 300
max_retries = 0

[generation]
default_style = "modern"
"#
        .to_string()
    }
}
