//! Analyze Command
//!
//! Best-effort analysis of every analyzable file in a repository. Prints
//! per-file metrics and writes the configured reports.
//!
//! Usage:
//!   repolyze analyze <owner/name> [--path P] [--max-files N] [--no-report] [--insights]

use crate::analyzer::MetricsRunner;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::insight::InsightGenerator;
use crate::pipeline::{AnalysisOptions, RepositoryAnalyzer};
use crate::report::ReportWriter;
use crate::types::{FileOutcome, LintOutcome, RepoIdentifier, Result};

/// Flags of `repolyze analyze`
#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    pub path: Option<String>,
    /// Overrides `analysis.max_files`
    pub max_files: Option<usize>,
    pub no_report: bool,
    pub insights: bool,
}

pub async fn run(
    ctx: &CommandContext,
    out: &Output,
    repo: &str,
    args: AnalyzeArgs,
) -> Result<()> {
    let repo = RepoIdentifier::parse(repo)?;
    let github = ctx.github()?;
    let runner = MetricsRunner::new(ctx.config.analysis.clone());

    let insights = if args.insights {
        Some(InsightGenerator::new(
            ctx.require_provider()?,
            &ctx.config.llm,
        ))
    } else {
        None
    };

    let options = AnalysisOptions {
        path_filter: args.path,
        max_files: args.max_files.unwrap_or(ctx.config.analysis.max_files),
        with_insight: insights.is_some(),
    };

    out.info(&format!("Analyzing {}...", repo));

    let mut analyzer = RepositoryAnalyzer::new(&github, &runner);
    if let Some(insights) = &insights {
        analyzer = analyzer.with_insights(insights);
    }
    let analysis = analyzer.analyze(&repo, &options).await?;

    out.header(&format!(
        "{} ({} file(s))",
        analysis.info.full_name,
        analysis.files.len()
    ));
    for (path, outcome) in &analysis.files {
        match outcome {
            FileOutcome::Analyzed(metrics) => {
                out.section(path);
                for f in &metrics.functions {
                    out.result(&format!("  {:<40} {:>3} [{}]", f.name, f.complexity, f.rank));
                }
                if metrics.functions.is_empty() {
                    out.result("  no functions or classes");
                }
                out.field("Volume", &format!("{:.2}", metrics.halstead.volume));
                out.field("Difficulty", &format!("{:.2}", metrics.halstead.difficulty));
                out.field("Effort", &format!("{:.2}", metrics.halstead.effort));
                match &metrics.lint {
                    LintOutcome::Messages(messages) => {
                        out.field("Lint issues", &messages.len().to_string());
                    }
                    LintOutcome::Unavailable(reason) => {
                        out.warning(&format!("Lint unavailable: {}", reason));
                    }
                }
            }
            FileOutcome::Skipped(reason) => {
                out.warning(&format!("{}: skipped ({})", path, reason));
            }
            FileOutcome::Failed(reason) => {
                out.error(&format!("{}: {}", path, reason));
            }
        }
    }

    if let Some(insight) = &analysis.insight {
        out.section("Insights");
        out.result(&insight.text);
    }

    out.success(&format!(
        "{} analyzed, {} failed",
        analysis.analyzed_count(),
        analysis.failed_count()
    ));

    if args.no_report {
        return Ok(());
    }

    let paths = ReportWriter::new(ctx.config.report.clone()).write(&analysis)?;
    for path in paths {
        out.success(&format!("Report written to {}", path.display()));
    }
    Ok(())
}
