//! Config Command
//!
//! Manage repolyze configuration.
//!
//! Usage:
//!   repolyze config show [-f json]
//!   repolyze config path
//!   repolyze config init [--force]

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged effective configuration (secrets are never included)
pub fn show(config_path: &Path, format: &str) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    ConfigLoader::show_config(&config, format == "json")
}

pub fn path(config_path: &Path) -> Result<()> {
    ConfigLoader::show_path(config_path);
    Ok(())
}

pub fn init(out: &Output, config_path: &Path, force: bool) -> Result<()> {
    let path = ConfigLoader::init(config_path, force)?;
    out.success("Initialized configuration");
    out.field("Config", &path.display().to_string());
    out.info("Set GITHUB_TOKEN and OPENAI_API_KEY in the environment or a .env file.");
    Ok(())
}
