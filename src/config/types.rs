//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Secrets are kept apart from the serializable config so that
//! `config show` can never leak them.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants;
use crate::types::{RepolyzeError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// GitHub API settings
    pub github: GithubConfig,

    /// Static-analysis tool settings
    pub analysis: AnalysisConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Report output settings
    pub report: ReportConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            github: GithubConfig::default(),
            analysis: AnalysisConfig::default(),
            llm: LlmConfig::default(),
            report: ReportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `RepolyzeError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(RepolyzeError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(RepolyzeError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.github.timeout_secs == 0 {
            return Err(RepolyzeError::Config(
                "github.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.analysis.tool_timeout_secs == 0 {
            return Err(RepolyzeError::Config(
                "analysis.tool_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.analysis.extensions.is_empty() {
            return Err(RepolyzeError::Config(
                "analysis.extensions must list at least one extension".to_string(),
            ));
        }

        if self.report.output_formats.is_empty() {
            return Err(RepolyzeError::Config(
                "report.output_formats must list at least one format".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// GitHub Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// REST API base URL
    pub api_base: String,

    /// Files above this size (bytes) are not downloaded
    pub max_file_size: u64,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Retries for transient failures (5xx, connection errors)
    pub max_retries: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: constants::github::DEFAULT_API_BASE.to_string(),
            max_file_size: constants::github::MAX_FILE_SIZE,
            timeout_secs: 30,
            max_retries: constants::github::DEFAULT_MAX_RETRIES,
        }
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// File extensions (without dot) the tools can analyze
    pub extensions: Vec<String>,

    /// radon executable
    pub radon_bin: String,

    /// pylint executable
    pub pylint_bin: String,

    /// Timeout per tool invocation in seconds
    pub tool_timeout_secs: u64,

    /// Files analyzed when the agent analyzes a whole repository
    pub agent_max_files: usize,

    /// Upper bound for `analyze` runs (0 = unlimited)
    pub max_files: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["py".to_string()],
            radon_bin: "radon".to_string(),
            pylint_bin: "pylint".to_string(),
            tool_timeout_secs: 60,
            agent_max_files: 3,
            max_files: 0,
        }
    }
}

impl AnalysisConfig {
    pub fn supports(&self, extension: Option<&str>) -> bool {
        extension.is_some_and(|ext| {
            self.extensions
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("openai" or any OpenAI-compatible endpoint)
    pub provider: String,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// API base URL for compatible endpoints
    pub api_base: Option<String>,

    /// Maximum tokens to generate
    pub max_tokens: usize,

    /// Source code is truncated to this many characters in prompts
    pub max_prompt_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: 120,
            temperature: 0.7,
            api_base: None,
            max_tokens: 1024,
            max_prompt_chars: 12_000,
        }
    }
}

// =============================================================================
// Report Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Markdown,
    Html,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    Complexity,
    Halstead,
    Lint,
    Insights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory reports are written to
    pub output_dir: PathBuf,

    /// Formats to emit for each report
    pub output_formats: Vec<ReportFormat>,

    /// Sections included per file
    pub include_sections: Vec<ReportSection>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("repository_analysis"),
            output_formats: vec![ReportFormat::Markdown, ReportFormat::Html],
            include_sections: vec![
                ReportSection::Complexity,
                ReportSection::Halstead,
                ReportSection::Lint,
                ReportSection::Insights,
            ],
        }
    }
}

impl ReportConfig {
    pub fn includes(&self, section: ReportSection) -> bool {
        self.include_sections.contains(&section)
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,

    /// Directory for per-run log files (None disables file logging)
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: Some(PathBuf::from("logs")),
        }
    }
}

// =============================================================================
// Secrets
// =============================================================================

/// API credentials resolved once at startup.
///
/// Never serialized; redacted in debug output.
#[derive(Clone, Default)]
pub struct Secrets {
    pub github_token: Option<SecretString>,
    pub openai_api_key: Option<SecretString>,
}

impl Secrets {
    /// Build from raw values, treating blank strings as absent
    pub fn new(github_token: Option<String>, openai_api_key: Option<String>) -> Self {
        let non_blank = |v: Option<String>| {
            v.filter(|s| !s.trim().is_empty())
                .map(|s| SecretString::from(s.trim().to_string()))
        };
        Self {
            github_token: non_blank(github_token),
            openai_api_key: non_blank(openai_api_key),
        }
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("github_token", &self.github_token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
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
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.github.max_file_size, 1_048_576);
        assert_eq!(config.report.output_dir, PathBuf::from("repository_analysis"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.extensions.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.github.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_supports_extension() {
        let analysis = AnalysisConfig::default();
        assert!(analysis.supports(Some("py")));
        assert!(analysis.supports(Some("PY")));
        assert!(!analysis.supports(Some("rs")));
        assert!(!analysis.supports(None));
    }

    #[test]
    fn test_secrets_blank_is_absent() {
        let secrets = Secrets::new(Some("  ".to_string()), Some("sk-test".to_string()));
        assert!(secrets.github_token.is_none());
        assert!(secrets.openai_api_key.is_some());
        assert!(!format!("{:?}", secrets).contains("sk-test"));
    }

    #[test]
    fn test_report_format_yaml() {
        let formats: Vec<ReportFormat> = serde_yaml::from_str("[markdown, html]").unwrap();
        assert_eq!(formats, vec![ReportFormat::Markdown, ReportFormat::Html]);
        assert_eq!(ReportFormat::Html.extension(), "html");
    }
}
