//! Improve Command
//!
//! LLM improvement suggestions for one file, informed by its metrics.
//!
//! Usage:
//!   repolyze improve <owner/name> <path>

use tracing::warn;

use crate::analyzer::MetricsRunner;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::insight::InsightGenerator;
use crate::types::{RepoIdentifier, Result};

pub async fn run(ctx: &CommandContext, out: &Output, repo: &str, path: &str) -> Result<()> {
    let repo = RepoIdentifier::parse(repo)?;
    let insights = InsightGenerator::new(ctx.require_provider()?, &ctx.config.llm);

    let snapshot = ctx.github()?.fetch_file(&repo, path).await?;
    out.info(&format!(
        "Fetched {} ({} lines)",
        snapshot.path,
        snapshot.line_count()
    ));

    let metrics = match MetricsRunner::new(ctx.config.analysis.clone())
        .analyze(&snapshot)
        .await
    {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!("Metrics unavailable for {}: {}", snapshot.path, e);
            out.warning(&format!("Metrics unavailable: {}", e));
            None
        }
    };

    let insight = insights
        .suggest_improvements(&snapshot, metrics.as_ref())
        .await?;

    out.section(&format!("Suggestions for {}", snapshot.path));
    out.result(&insight.text);
    out.info(&format!(
        "{} ({} tokens)",
        insight.model,
        insight.usage.total()
    ));
    Ok(())
}
