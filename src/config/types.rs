//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/sitewright/) and project (.sitewright/) level configuration.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{generation, network, storage};
use crate::types::{Result, SiteError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Where project records and generated sites live
    pub storage: StorageConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Pipeline settings
    pub generation: GenerationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            llm: LlmConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `SiteError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(SiteError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(SiteError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(SiteError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        url::Url::parse(&self.llm.api_base).map_err(|e| {
            SiteError::Config(format!("Invalid LLM api_base '{}': {}", self.llm.api_base, e))
        })?;

        if self.server.request_timeout_secs == 0 {
            return Err(SiteError::Config(
                "Server request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.generation.default_style.trim().is_empty() {
            return Err(SiteError::Config(
                "Generation default_style must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout; generation runs in the background and is not bound by it
    pub request_timeout_secs: u64,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: network::DEFAULT_PORT,
            request_timeout_secs: network::REQUEST_TIMEOUT_SECS,
            cors_origins: Vec::new(),
        }
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for the project document and generated sites
    pub data_dir: PathBuf,
    /// Project document file name (relative to data_dir)
    pub db_file: PathBuf,
    /// Generated sites root (relative to data_dir)
    pub projects_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            db_file: PathBuf::from(storage::DB_FILE),
            projects_dir: PathBuf::from(storage::PROJECTS_DIR),
        }
    }
}

impl StorageConfig {
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }

    pub fn projects_root(&self) -> PathBuf {
        self.data_dir.join(&self.projects_dir)
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (OpenAI-compatible chat completions)
    pub provider: String,

    /// Model name
    pub model: String,

    /// Chat-completion API base URL
    pub api_base: String,

    /// API key; falls back to DEEPSEEK_API_KEY / OPENAI_API_KEY.
    /// Never serialized to output.
    #[serde(skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate per call
    pub max_tokens: usize,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Extra attempts for retryable failures (0 = single attempt)
    pub max_retries: usize,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: generation::DEFAULT_MODEL.to_string(),
            api_base: generation::DEFAULT_API_BASE.to_string(),
            api_key: None,
            temperature: generation::TEMPERATURE,
            max_tokens: generation::MAX_TOKENS,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
        }
    }
}

// =============================================================================
// Generation Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Style applied when a request omits one
    pub default_style: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_style: generation::DEFAULT_STYLE.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.model, "deepseek-chat");
        assert_eq!(config.llm.max_tokens, 8000);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.generation.default_style, "modern");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_storage_paths() {
        let storage = StorageConfig {
            data_dir: PathBuf::from("/srv/site"),
            ..Default::default()
        };
        assert_eq!(storage.db_path(), PathBuf::from("/srv/site/projects_db.json"));
        assert_eq!(storage.projects_root(), PathBuf::from("/srv/site/Projects"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.api_base = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_redacted_and_not_serialized() {
        let mut config = Config::default();
        config.llm.api_key = Some(SecretString::from("sk-secret"));

        assert!(!format!("{:?}", config.llm).contains("sk-secret"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }
}
