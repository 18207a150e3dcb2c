use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metrics::FileOutcome;
use super::repository::RepositoryInfo;
use crate::ai::TokenUsage;

/// What an insight was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Improvements,
    RepositorySummary,
    Answer,
}

/// Free-text output produced by a language-model call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    /// Repository full name or file path the insight is about
    pub subject: String,
    pub kind: InsightKind,
    pub text: String,
    pub model: String,
    pub usage: TokenUsage,
    pub generated_at: DateTime<Utc>,
}

/// Everything one repository analysis run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryAnalysis {
    pub info: RepositoryInfo,
    /// Per-file outcomes in listing order
    pub files: Vec<(String, FileOutcome)>,
    pub insight: Option<Insight>,
    pub analyzed_at: DateTime<Utc>,
}

impl RepositoryAnalysis {
    pub fn analyzed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|(_, o)| matches!(o, FileOutcome::Analyzed(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|(_, o)| matches!(o, FileOutcome::Failed(_)))
            .count()
    }
}
