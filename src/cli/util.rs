//! CLI Common Utilities
//!
//! Shared initialization for command handlers: configuration, credentials
//! and the collaborators built from them.

use std::path::{Path, PathBuf};

use crate::agent::Agent;
use crate::ai::{ProviderConfig, SharedProvider, create_provider};
use crate::config::{Config, ConfigLoader, Secrets};
use crate::github::GitHubClient;
use crate::types::{RepolyzeError, Result};

/// Command execution context
///
/// Built once per process from `--config` and the environment.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config_path: PathBuf,
    pub config: Config,
    /// Whether `config_path` existed; defaults were used otherwise
    pub config_found: bool,
    pub secrets: Secrets,
}

impl CommandContext {
    /// Does not log a missing config file; see [`config_found`](Self::config_found)
    pub fn load(config_path: &Path) -> Result<Self> {
        let (config, config_found) = ConfigLoader::load_with_status(config_path)?;
        Ok(Self {
            config_path: config_path.to_path_buf(),
            config,
            config_found,
            secrets: ConfigLoader::load_secrets(),
        })
    }

    pub fn github(&self) -> Result<GitHubClient> {
        GitHubClient::new(&self.config.github, self.secrets.github_token.clone())
    }

    /// LLM provider, `None` when no API key is configured
    pub fn provider(&self) -> Result<Option<SharedProvider>> {
        if self.secrets.openai_api_key.is_none() {
            return Ok(None);
        }
        let config = ProviderConfig::from_config(&self.config.llm, &self.secrets);
        create_provider(&config).map(Some)
    }

    /// LLM provider, failing when no API key is configured
    pub fn require_provider(&self) -> Result<SharedProvider> {
        self.provider()?
            .ok_or_else(|| RepolyzeError::auth("openai", "OPENAI_API_KEY is not set"))
    }

    pub fn agent(&self) -> Result<Agent> {
        Agent::new(&self.config, &self.secrets)
    }
}
