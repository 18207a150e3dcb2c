//! Terminal rendering of agent results

use std::fmt;
use std::path::PathBuf;

use super::command::HELP_TEXT;
use crate::insight::metrics_digest;
use crate::types::{
    ContentEntry, FileOutcome, Insight, MetricsResult, RepositoryAnalysis, RepositoryInfo,
};

/// Result of one executed [`AgentCommand`](super::AgentCommand)
#[derive(Debug, Clone)]
pub enum AgentReply {
    Repository(RepositoryInfo),
    Files {
        repo: String,
        path: Option<String>,
        entries: Vec<ContentEntry>,
    },
    FileContent {
        path: String,
        preview: String,
        lines: usize,
    },
    Metrics(MetricsResult),
    Analysis(RepositoryAnalysis),
    Insight(Insight),
    Report {
        repo: String,
        paths: Vec<PathBuf>,
        analyzed: usize,
        failed: usize,
    },
    Help,
    Goodbye,
}

impl AgentReply {
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Goodbye)
    }
}

impl fmt::Display for AgentReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repository(info) => {
                writeln!(f, "{}", info.full_name)?;
                if let Some(description) = &info.description {
                    writeln!(f, "  {}", description)?;
                }
                writeln!(
                    f,
                    "  Language: {}  Stars: {}  Default branch: {}",
                    info.language.as_deref().unwrap_or("Unknown"),
                    info.stars,
                    info.default_branch
                )?;
                write!(f, "  {} top-level entries", info.contents.len())?;
                for entry in &info.contents {
                    write!(f, "\n    {}{}", entry.name, dir_marker(entry))?;
                }
                Ok(())
            }
            Self::Files {
                repo,
                path,
                entries,
            } => {
                let location = match path {
                    Some(p) => format!("{}/{}", repo, p),
                    None => repo.clone(),
                };
                if entries.is_empty() {
                    return write!(f, "No files in {}", location);
                }
                write!(f, "{} file(s) in {}:", entries.len(), location)?;
                for entry in entries {
                    write!(f, "\n  {} ({} bytes)", entry.path, entry.size)?;
                }
                Ok(())
            }
            Self::FileContent {
                path,
                preview,
                lines,
            } => write!(f, "{} ({} lines)\n\n{}", path, lines, preview),
            Self::Metrics(metrics) => {
                let digest = metrics_digest(metrics);
                write!(f, "Metrics for {}\n{}", metrics.path, digest.trim_end())
            }
            Self::Analysis(analysis) => {
                write!(
                    f,
                    "{}: {} analyzed, {} failed",
                    analysis.info.full_name,
                    analysis.analyzed_count(),
                    analysis.failed_count()
                )?;
                for (path, outcome) in &analysis.files {
                    match outcome {
                        FileOutcome::Analyzed(metrics) => write!(
                            f,
                            "\n  {}: {} block(s), max complexity {}, {} lint issue(s)",
                            path,
                            metrics.functions.len(),
                            metrics.max_complexity().map_or(0, |c| c.complexity),
                            metrics.lint.messages().len()
                        )?,
                        FileOutcome::Skipped(reason) => {
                            write!(f, "\n  {}: skipped ({})", path, reason)?
                        }
                        FileOutcome::Failed(reason) => {
                            write!(f, "\n  {}: failed ({})", path, reason)?
                        }
                    }
                }
                if let Some(insight) = &analysis.insight {
                    write!(f, "\n\n{}", insight.text)?;
                }
                Ok(())
            }
            Self::Insight(insight) => write!(f, "{}", insight.text),
            Self::Report {
                repo,
                paths,
                analyzed,
                failed,
            } => {
                write!(
                    f,
                    "Report for {} ({} analyzed, {} failed):",
                    repo, analyzed, failed
                )?;
                for path in paths {
                    write!(f, "\n  {}", path.display())?;
                }
                Ok(())
            }
            Self::Help => f.write_str(HELP_TEXT),
            Self::Goodbye => f.write_str("Goodbye!"),
        }
    }
}

fn dir_marker(entry: &ContentEntry) -> &'static str {
    if entry.is_file() { "" } else { "/" }
}
