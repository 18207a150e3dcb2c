//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// GitHub REST API constants
pub mod github {
    /// Public GitHub REST endpoint
    pub const DEFAULT_API_BASE: &str = "https://api.github.com";

    /// Media type requested from the API
    pub const ACCEPT: &str = "application/vnd.github+json";

    /// Pinned REST API version
    pub const API_VERSION: &str = "2022-11-28";

    /// Files above this size are not downloaded (1 MiB)
    pub const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Default retries for transient failures
    pub const DEFAULT_MAX_RETRIES: usize = 2;

    /// First backoff delay between retries (milliseconds)
    pub const BASE_DELAY_MS: u64 = 500;

    /// Maximum delay between retries (seconds)
    pub const MAX_DELAY_SECS: u64 = 10;
}

/// LLM provider constants
pub mod llm {
    /// OpenAI chat completions endpoint base
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

    /// Marker appended when source code is cut to fit a prompt
    pub const TRUNCATION_MARKER: &str = "\n# ... (truncated)\n";
}

/// Agent constants
pub mod agent {
    /// File name fragments that mark a likely entry point
    pub const MAIN_FILE_HINTS: &[&str] = &["main", "core", "app", "__init__", "base"];

    /// Characters of file content shown by the read command
    pub const PREVIEW_CHARS: usize = 500;
}

/// Pylint exit status bit signalling a usage error
pub const PYLINT_USAGE_ERROR: i32 = 32;
