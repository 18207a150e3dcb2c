//! Configuration Management
//!
//! Configuration is resolved once at process start and passed by reference
//! to every component:
//! 1. Built-in defaults
//! 2. YAML config file (config/config.yaml)
//! 3. Environment variables (REPOLYZE_*)
//! 4. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_PATH, ENV_PREFIX};
pub use types::*;
