//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. YAML config file (config/config.yaml or --config)
//! 3. Environment variables (REPOLYZE_* prefix, `__` separates sections)
//!
//! Credentials come from `GITHUB_TOKEN` / `OPENAI_API_KEY` (optionally via
//! a `.env` file) and are resolved separately into [`Secrets`].

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::types::{Config, Secrets};
use crate::types::{RepolyzeError, Result};

/// Default config file location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Environment variable prefix for config overrides
pub const ENV_PREFIX: &str = "REPOLYZE_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → YAML file → env vars
    ///
    /// A missing file is not an error; defaults are used.
    pub fn load(path: &Path) -> Result<Config> {
        let (config, file_found) = Self::load_with_status(path)?;
        if !file_found {
            Self::warn_missing(path);
        }
        Ok(config)
    }

    /// Same as [`load`](Self::load), but reports whether the file existed
    /// instead of logging it, for callers whose logging depends on the result.
    pub fn load_with_status(path: &Path) -> Result<(Config, bool)> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let file_found = path.exists();
        if file_found {
            debug!("Loading config from: {}", path.display());
            figment = figment.merge(Yaml::file(path));
        }

        // e.g. REPOLYZE_LLM__MODEL -> llm.model
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| RepolyzeError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok((config, file_found))
    }

    pub fn warn_missing(path: &Path) {
        warn!(
            "Configuration file not found at {}. Using default settings.",
            path.display()
        );
    }

    /// Load configuration from a specific file only (no env overrides)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
            .map_err(|e| RepolyzeError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve API credentials from the process environment.
    ///
    /// A `.env` file in the working directory is honored first.
    pub fn load_secrets() -> Secrets {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring unreadable .env file: {}", e),
        }

        Secrets::new(
            env::var("GITHUB_TOKEN").ok(),
            env::var("OPENAI_API_KEY").ok(),
        )
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file path
    pub fn show_path(path: &Path) {
        println!("Configuration paths:");
        println!();
        let exists = if path.exists() { "✓" } else { "✗" };
        println!("  Config:  {} {}", exists, path.display());
        let dotenv = PathBuf::from(".env");
        let exists = if dotenv.exists() { "✓" } else { "✗" };
        println!("  Dotenv:  {} {}", exists, dotenv.display());
    }

    /// Show current effective configuration
    pub fn show_config(config: &Config, as_json: bool) -> Result<()> {
        if as_json {
            println!("{}", serde_json::to_string_pretty(config)?);
        } else {
            println!("{}", serde_yaml::to_string(config)?);
        }
        Ok(())
    }

    /// Write the default configuration file
    pub fn init(path: &Path, force: bool) -> Result<PathBuf> {
        if path.exists() && !force {
            return Err(RepolyzeError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, Self::default_config_yaml())?;
        info!("Created config: {}", path.display());
        Ok(path.to_path_buf())
    }

    /// Generate default config content (YAML)
    fn default_config_yaml() -> String {
        r#"# repolyze configuration
# Credentials are read from GITHUB_TOKEN and OPENAI_API_KEY, never from this file.

version: "1.0"

github:
  api_base: https://api.github.com
  max_file_size: 1048576
  timeout_secs: 30
  max_retries: 2

analysis:
  extensions: [py]
  radon_bin: radon
  pylint_bin: pylint
  tool_timeout_secs: 60
  agent_max_files: 3
  max_files: 0

llm:
  provider: openai
  model: gpt-3.5-turbo
  temperature: 0.7
  timeout_secs: 120
  max_tokens: 1024

report:
  output_dir: repository_analysis
  output_formats: [markdown, html]
  include_sections: [complexity, halstead, lint, insights]

logging:
  level: info
  dir: logs
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigLoader::load(&temp_dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_init_then_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config").join("config.yaml");

        ConfigLoader::init(&path, false).unwrap();
        assert!(path.exists());
        assert!(ConfigLoader::init(&path, false).is_err());
        assert!(ConfigLoader::init(&path, true).is_ok());

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.analysis.agent_max_files, 3);
        assert_eq!(config.report.output_formats.len(), 2);
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "llm:\n  model: gpt-4o-mini\n").unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.github.max_retries, 2);
    }

    #[test]
    fn test_load_with_status_reports_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent.yaml");
        let (config, found) = ConfigLoader::load_with_status(&missing).unwrap();
        assert!(!found);
        assert_eq!(config.version, "1.0");

        let present = ConfigLoader::init(&temp_dir.path().join("config.yaml"), false).unwrap();
        let (_, found) = ConfigLoader::load_with_status(&present).unwrap();
        assert!(found);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "llm:\n  temperature: 9.0\n").unwrap();

        assert!(matches!(
            ConfigLoader::load_from_file(&path),
            Err(RepolyzeError::Config(_))
        ));
    }
}
