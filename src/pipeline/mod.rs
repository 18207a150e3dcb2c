//! Repository analysis pipeline
//!
//! Fetcher -> Metrics Runner -> (optional) Insight Generator, one file at a
//! time. A failing file is recorded and the run continues; only failures
//! that doom every later request (auth, rate limit) abort the run.

use chrono::Utc;
use tracing::{info, warn};

use crate::analyzer::MetricsRunner;
use crate::constants::agent::MAIN_FILE_HINTS;
use crate::github::GitHubClient;
use crate::insight::InsightGenerator;
use crate::types::{
    ContentEntry, ErrorCategory, FileOutcome, Insight, RepoIdentifier, RepolyzeError,
    RepositoryAnalysis, Result, unique_files,
};

/// Knobs for one analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Directory (or single file) to analyze instead of the repository root
    pub path_filter: Option<String>,
    /// Upper bound on analyzed files (0 = unlimited)
    pub max_files: usize,
    /// Ask the LLM for a repository-level summary
    pub with_insight: bool,
}

pub struct RepositoryAnalyzer<'a> {
    github: &'a GitHubClient,
    runner: &'a MetricsRunner,
    insights: Option<&'a InsightGenerator>,
}

impl<'a> RepositoryAnalyzer<'a> {
    pub fn new(github: &'a GitHubClient, runner: &'a MetricsRunner) -> Self {
        Self {
            github,
            runner,
            insights: None,
        }
    }

    pub fn with_insights(mut self, insights: &'a InsightGenerator) -> Self {
        self.insights = Some(insights);
        self
    }

    pub async fn analyze(
        &self,
        repo: &RepoIdentifier,
        options: &AnalysisOptions,
    ) -> Result<RepositoryAnalysis> {
        let info = self.github.fetch_repository(repo).await?;

        let listed = match options.path_filter.as_deref() {
            Some(path) => self.github.list_files(repo, Some(path)).await?,
            None => info.files().cloned().collect(),
        };
        let targets = analyzable_files(&listed, self.runner, options.max_files);
        info!("Analyzing {} file(s) in {}", targets.len(), repo);

        let mut files = Vec::with_capacity(targets.len());
        for entry in targets {
            let outcome = self.analyze_entry(repo, entry).await?;
            files.push((entry.path.clone(), outcome));
        }

        let mut analysis = RepositoryAnalysis {
            info,
            files,
            insight: None,
            analyzed_at: Utc::now(),
        };

        if options.with_insight {
            analysis.insight = self.summarize(&analysis).await;
        }

        info!(
            "Finished {}: {} analyzed, {} failed",
            repo,
            analysis.analyzed_count(),
            analysis.failed_count()
        );
        Ok(analysis)
    }

    async fn analyze_entry(
        &self,
        repo: &RepoIdentifier,
        entry: &ContentEntry,
    ) -> Result<FileOutcome> {
        let snapshot = match self.github.fetch_file(repo, &entry.path).await {
            Ok(snapshot) => snapshot,
            Err(e) if is_fatal(&e) => return Err(e),
            Err(e @ RepolyzeError::FileTooLarge { .. }) => {
                return Ok(FileOutcome::Skipped(e.to_string()));
            }
            Err(e) => {
                warn!("Fetching {} failed: {}", entry.path, e);
                return Ok(FileOutcome::Failed(e.to_string()));
            }
        };

        Ok(match self.runner.analyze(&snapshot).await {
            Ok(metrics) => FileOutcome::Analyzed(metrics),
            Err(e) => {
                warn!("Analysis of {} failed: {}", entry.path, e);
                FileOutcome::Failed(e.to_string())
            }
        })
    }

    async fn summarize(&self, analysis: &RepositoryAnalysis) -> Option<Insight> {
        let generator = self.insights?;
        if analysis.analyzed_count() == 0 {
            info!("No analyzed files, skipping repository summary");
            return None;
        }
        match generator.summarize_repository(analysis).await {
            Ok(insight) => Some(insight),
            Err(e) => {
                warn!("Repository summary unavailable: {}", e);
                None
            }
        }
    }
}

fn is_fatal(error: &RepolyzeError) -> bool {
    matches!(error.category(), ErrorCategory::Auth | ErrorCategory::RateLimit)
}

/// Analyzable files in listing order, unique by path, capped at `limit` (0 = all)
pub fn analyzable_files<'e>(
    entries: &'e [ContentEntry],
    runner: &MetricsRunner,
    limit: usize,
) -> Vec<&'e ContentEntry> {
    let files = unique_files(entries, |e| runner.supports(&e.path));

    if limit == 0 {
        files.collect()
    } else {
        files.take(limit).collect()
    }
}

/// Entry-point-looking file: the first name containing one of
/// `main`, `core`, `app`, `__init__`, `base` (in that priority), else the
/// first analyzable file.
pub fn pick_main_file<'e>(
    entries: &'e [ContentEntry],
    runner: &MetricsRunner,
) -> Option<&'e ContentEntry> {
    let candidates = analyzable_files(entries, runner, 0);

    MAIN_FILE_HINTS
        .iter()
        .find_map(|hint| {
            candidates
                .iter()
                .find(|e| e.name.to_ascii_lowercase().contains(hint))
                .copied()
        })
        .or_else(|| candidates.first().copied())
}
