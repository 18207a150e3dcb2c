//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! Every failure surfaced by the fetcher, the metrics runner, the insight
//! generator or the agent is a `RepolyzeError`.
//!
//! ## Error Categories
//!
//! - **Auth**: Missing, invalid or expired credentials (fail fast)
//! - **NotFound**: Repository, path or identifier does not resolve
//! - **RateLimit**: Upstream API throttled the request
//! - **Analysis**: A static-analysis tool could not process the file
//! - **Upstream**: Remote service unavailable or returned an error
//! - **Network**: Connectivity issues (retry with backoff)

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories used for retry decisions and user-facing labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Authentication failed - fail fast, don't retry
    Auth,
    /// Target does not exist
    NotFound,
    /// Rate limited - surface reset time to the user
    RateLimit,
    /// Static-analysis tool failure
    Analysis,
    /// Remote service error (5xx, malformed response)
    Upstream,
    /// Connectivity issues - retry with backoff
    Network,
    /// Invalid configuration or request
    Config,
    /// Local I/O, serialization and other internal failures
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth => write!(f, "AUTH"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Analysis => write!(f, "ANALYSIS"),
            Self::Upstream => write!(f, "UPSTREAM"),
            Self::Network => write!(f, "NETWORK"),
            Self::Config => write!(f, "CONFIG"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is worth retrying against the same service
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream | Self::Network)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum RepolyzeError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Service Errors
    // -------------------------------------------------------------------------
    #[error("Authentication failed for {service}: {message}")]
    Auth { service: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid repository identifier '{input}': {reason}")]
    InvalidIdentifier { input: String, reason: String },

    #[error("Rate limited by {service}: {message}{}", reset_hint(.reset_at))]
    RateLimit {
        service: String,
        message: String,
        reset_at: Option<DateTime<Utc>>,
    },

    #[error("{service} error: {message}")]
    Upstream { service: String, message: String },

    #[error("Network error talking to {service}: {message}")]
    Network { service: String, message: String },

    #[error("Operation timed out after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Analysis failed for {path}: {message}")]
    Analysis { path: String, message: String },

    #[error("File {path} is {size} bytes, above the {limit} byte limit")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Usage(String),
}

fn reset_hint(reset_at: &Option<DateTime<Utc>>) -> String {
    match reset_at {
        Some(at) => format!(" (resets at {})", at.format("%H:%M:%S UTC")),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, RepolyzeError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl RepolyzeError {
    pub fn auth(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn network(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn analysis(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analysis {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Category used for retry decisions and user-facing labels.
    ///
    /// Invalid identifiers resolve to `NotFound`: a malformed address names
    /// no repository.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Auth { .. } => ErrorCategory::Auth,
            Self::NotFound(_) | Self::InvalidIdentifier { .. } => ErrorCategory::NotFound,
            Self::RateLimit { .. } => ErrorCategory::RateLimit,
            Self::Analysis { .. } | Self::FileTooLarge { .. } => ErrorCategory::Analysis,
            Self::Upstream { .. } => ErrorCategory::Upstream,
            Self::Network { .. } | Self::Timeout { .. } => ErrorCategory::Network,
            Self::Config(_) | Self::Usage(_) => ErrorCategory::Config,
            Self::Io(_) | Self::Json(_) | Self::Yaml(_) => ErrorCategory::Internal,
        }
    }

    /// Check if this error is worth retrying
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Classify an HTTP status code returned by a remote service.
    ///
    /// Rate limits are detected by the caller because GitHub reports them
    /// as 403 with a zero remaining-quota header.
    pub fn from_http_status(service: &str, status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::auth(service, message),
            404 => Self::NotFound(message),
            429 => Self::RateLimit {
                service: service.to_string(),
                message,
                reset_at: None,
            },
            _ => Self::upstream(service, format!("HTTP {}: {}", status, message)),
        }
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Attach the file path an analysis step was working on
    fn analysis_context(self, path: &str) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn analysis_context(self, path: &str) -> Result<T> {
        self.map_err(|e| RepolyzeError::analysis(path, e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
