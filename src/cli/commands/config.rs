//! Config Command
//!
//! Manage Sitewright configuration.
//!
//! Usage:
//!   sitewright config show [-g] [-f json]
//!   sitewright config path
//!   sitewright config init [-g] [--force]

use std::path::Path;

use crate::cli::{Output, wants_json};
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show configuration
pub fn show(explicit: Option<&Path>, global: bool, format: &str) -> Result<()> {
    let as_json = wants_json(format)?;

    if !global {
        // Merged effective config
        return ConfigLoader::show_config(explicit, as_json);
    }

    match ConfigLoader::global_config_path() {
        Some(global_path) if global_path.exists() => {
            let content = std::fs::read_to_string(&global_path)?;
            println!("# Global Config: {}\n", global_path.display());
            println!("{}", content);
        }
        Some(_) => {
            println!("No global config found.");
            println!("Run 'sitewright config init --global' to create one.");
        }
        None => println!("Cannot determine global config directory."),
    }
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize global configuration
pub fn init_global(force: bool) -> Result<()> {
    let dir = ConfigLoader::init_global(force)?;
    let output = Output::new();
    output.success("Initialized global configuration");
    output.field("Directory", dir.display());
    if let Some(config_path) = ConfigLoader::global_config_path() {
        output.field("Config", config_path.display());
    }
    Ok(())
}

/// Initialize project configuration
pub fn init_project(force: bool) -> Result<()> {
    let dir = ConfigLoader::init_project(force)?;
    let output = Output::new();
    output.success("Initialized project configuration");
    output.field("Directory", dir.display());
    output.field("Config", ConfigLoader::project_config_path().display());
    Ok(())
}
