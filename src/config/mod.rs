//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/sitewright/config.toml)
//! 3. Project config (.sitewright/config.toml)
//! 4. `--config` file
//! 5. Environment variables (SITEWRIGHT_*, plus PORT)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
