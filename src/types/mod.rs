//! Core domain types shared by the fetcher, analyzer, insight generator and agent.

pub mod error;
pub mod insight;
pub mod metrics;
pub mod repository;
pub mod utils;

pub use error::{ErrorCategory, RepolyzeError, Result, ResultExt};
pub use insight::{Insight, InsightKind, RepositoryAnalysis};
pub use metrics::{
    FileOutcome, FunctionComplexity, HalsteadMetrics, LintMessage, LintOutcome, MetricsResult,
};
pub use repository::{
    ContentEntry, EntryKind, FileSnapshot, RepoIdentifier, RepositoryInfo, unique_files,
};
