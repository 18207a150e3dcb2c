//! repolyze - Conversational GitHub Repository Analyzer
//!
//! Fetches source files from a GitHub repository, runs external static
//! analysis tools over them and asks a language model for improvement
//! suggestions, all behind a chat-style agent.
//!
//! ## Core Features
//!
//! - **Repository Fetcher**: GitHub REST contents API with retry and rate-limit handling
//! - **Metrics Runner**: radon (cyclomatic complexity, Halstead) and pylint
//! - **Insight Generator**: OpenAI-compatible chat completions
//! - **Reports**: markdown and HTML, written atomically
//! - **Agent**: slash-command grammar plus LLM intent routing
//!
//! ## Quick Start
//!
//! ```ignore
//! use repolyze::{Agent, ConfigLoader};
//!
//! let config = ConfigLoader::load("config/config.yaml".as_ref())?;
//! let agent = Agent::new(&config, &ConfigLoader::load_secrets())?;
//! let reply = agent.handle("/analyze octocat/hello main.py").await?;
//! println!("{reply}");
//! ```
//!
//! ## Modules
//!
//! - [`github`]: Repository fetcher
//! - [`analyzer`]: External metric tools and syntax pre-check
//! - [`ai`]: LLM provider abstraction and prompts
//! - [`insight`]: Improvement suggestions and summaries
//! - [`pipeline`]: Whole-repository analysis runs
//! - [`report`]: Report rendering and writing
//! - [`agent`]: Conversational front-end

pub mod agent;
pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod github;
pub mod insight;
pub mod pipeline;
pub mod report;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, Secrets};

// Error Types
pub use types::error::{ErrorCategory, RepolyzeError, Result, ResultExt};

// Domain Types
pub use types::{
    FileOutcome, FileSnapshot, Insight, MetricsResult, RepoIdentifier, RepositoryAnalysis,
    RepositoryInfo,
};

// =============================================================================
// Component Re-exports
// =============================================================================

pub use agent::{Agent, AgentCommand, AgentReply, IntentRouter};
pub use ai::{LlmProvider, LlmResponse, SharedProvider, with_timeout};
pub use analyzer::MetricsRunner;
pub use github::GitHubClient;
pub use insight::InsightGenerator;
pub use pipeline::{AnalysisOptions, RepositoryAnalyzer};
pub use report::ReportWriter;
