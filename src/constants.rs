//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Progress checkpoints a run passes through, in order
pub mod progress {
    /// Record created, background run not yet started
    pub const INITIAL: u8 = 5;
    /// Background run picked up the record
    pub const STARTED: u8 = 10;
    /// Page plan parsed and stored
    pub const PAGES_PLANNED: u8 = 15;
    /// Asset directories and placeholder files written
    pub const SCAFFOLDED: u8 = 20;
    /// Landing page written
    pub const INDEX_GENERATED: u8 = 40;
    /// Every planned page written (end of the per-page ramp)
    pub const PAGES_GENERATED: u8 = 70;
    /// Project documentation written
    pub const DOCUMENTED: u8 = 90;
    pub const COMPLETE: u8 = 100;
}

/// Labels written to `lastGeneratedFile`
pub mod labels {
    pub const INITIALIZING: &str = "Initializing project";
    pub const STARTED: &str = "Starting generation";
    pub const PAGES_PLANNED: &str = "Page descriptions";
    pub const ASSETS: &str = "assets";
    pub const COMPLETE: &str = "All files generated";
    pub const FAILED: &str = "Error during generation";
}

/// On-disk layout of a generated project
pub mod layout {
    pub const INDEX_FILE: &str = "index.html";
    pub const DOCS_FILE: &str = "PROJECT_DOCS.md";
    pub const CSS_DIR: &str = "assets/css";
    pub const JS_DIR: &str = "assets/js";
    pub const IMAGES_DIR: &str = "assets/images";
    pub const STYLESHEET: &str = "styles.css";
    pub const SCRIPT: &str = "app.js";
}

/// Generation defaults
pub mod generation {
    /// Style used when a request does not name one
    pub const DEFAULT_STYLE: &str = "modern";

    /// Sampling temperature for every completion
    pub const TEMPERATURE: f32 = 0.7;

    /// Output-token ceiling, sized for full-page markup
    pub const MAX_TOKENS: usize = 8000;

    pub const DEFAULT_API_BASE: &str = "https://api.deepseek.com/v1";
    pub const DEFAULT_MODEL: &str = "deepseek-chat";
}

/// Storage defaults
pub mod storage {
    pub const DB_FILE: &str = "projects_db.json";
    pub const PROJECTS_DIR: &str = "Projects";
}

/// HTTP/Network constants
pub mod network {
    /// Default LLM request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Default HTTP request timeout for the API server (seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    pub const DEFAULT_PORT: u16 = 5000;

    /// Base delay for exponential backoff (milliseconds)
    pub const RETRY_BASE_DELAY_MS: u64 = 500;

    /// Maximum delay between retries (seconds)
    pub const RETRY_MAX_DELAY_SECS: u64 = 30;
}

/// Terminal client constants
pub mod cli {
    /// How often `generate` polls the store for new checkpoints (milliseconds)
    pub const POLL_INTERVAL_MS: u64 = 250;
}
