//! Analysis reports
//!
//! Renders a [`RepositoryAnalysis`] as markdown and, optionally, as a
//! standalone HTML page. Files are written through a temp file in the
//! target directory and renamed into place without replacing anything.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use pulldown_cmark::{Event, Options, Parser, html};
use tempfile::NamedTempFile;
use tracing::info;

use crate::config::{ReportConfig, ReportFormat, ReportSection};
use crate::types::{
    FileOutcome, LintOutcome, MetricsResult, RepolyzeError, RepositoryAnalysis, Result,
};

/// Suffixes tried before giving up on a free file name
const MAX_NAME_ATTEMPTS: usize = 1000;

pub struct ReportWriter {
    config: ReportConfig,
}

impl ReportWriter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Write every configured format; returns the created paths
    pub fn write(&self, analysis: &RepositoryAnalysis) -> Result<Vec<PathBuf>> {
        let dir = &self.config.output_dir;
        std::fs::create_dir_all(dir)?;

        let stem = format!(
            "{}_analysis_{}",
            analysis.info.repo.name(),
            analysis.analyzed_at.format("%Y%m%d_%H%M%S")
        );

        let markdown = self.render_markdown(analysis);
        let mut written = Vec::new();

        for format in &self.config.output_formats {
            let content = match format {
                ReportFormat::Markdown => markdown.clone(),
                ReportFormat::Html => render_html(&analysis.info.name, &markdown),
            };
            let path = write_new_file(dir, &stem, format.extension(), &content)?;
            info!("Report written to {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    pub fn render_markdown(&self, analysis: &RepositoryAnalysis) -> String {
        let info = &analysis.info;
        let mut out = String::new();

        out.push_str(&format!("# Repository Analysis Report: {}\n\n", info.name));

        out.push_str("## Repository Overview\n\n");
        out.push_str(&format!("- **Full Name**: {}\n", info.full_name));
        out.push_str(&format!(
            "- **Description**: {}\n",
            info.description.as_deref().unwrap_or("No description")
        ));
        out.push_str(&format!(
            "- **Primary Language**: {}\n",
            info.language.as_deref().unwrap_or("Unknown")
        ));
        out.push_str(&format!("- **Stars**: {}\n", info.stars));
        out.push_str(&format!(
            "- **Analysis Date**: {}\n\n",
            analysis.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        let skipped = analysis.files.len() - analysis.analyzed_count() - analysis.failed_count();
        out.push_str("## Summary\n\n");
        out.push_str(&format!("- **Files analyzed**: {}\n", analysis.analyzed_count()));
        out.push_str(&format!("- **Files failed**: {}\n", analysis.failed_count()));
        out.push_str(&format!("- **Files skipped**: {}\n\n", skipped));

        out.push_str("## File Analysis\n\n");
        if analysis.files.is_empty() {
            out.push_str("No analyzable files found.\n\n");
        }
        for (path, outcome) in &analysis.files {
            out.push_str(&format!("### {}\n\n", path));
            match outcome {
                FileOutcome::Analyzed(metrics) => self.render_metrics(&mut out, metrics),
                FileOutcome::Skipped(reason) => {
                    out.push_str(&format!("- Skipped: {}\n\n", reason));
                }
                FileOutcome::Failed(reason) => {
                    out.push_str(&format!("- **Analysis failed**: {}\n\n", reason));
                }
            }
        }

        if self.config.includes(ReportSection::Insights)
            && let Some(insight) = &analysis.insight
        {
            out.push_str("## Insights\n\n");
            out.push_str(insight.text.trim());
            out.push_str(&format!("\n\n*Generated by {}*\n", insight.model));
        }

        out.trim_end().to_string() + "\n"
    }

    fn render_metrics(&self, out: &mut String, metrics: &MetricsResult) {
        if self.config.includes(ReportSection::Complexity) {
            out.push_str("#### Cyclomatic Complexity\n\n");
            if metrics.functions.is_empty() {
                out.push_str("- No functions or classes found\n");
            }
            for f in &metrics.functions {
                out.push_str(&format!("- **{}**: {} complexity\n", f.name, f.complexity));
            }
            out.push('\n');
        }

        if self.config.includes(ReportSection::Halstead) {
            let h = &metrics.halstead;
            out.push_str("#### Halstead Metrics\n\n");
            out.push_str(&format!("- **Volume**: {:.2}\n", h.volume));
            out.push_str(&format!("- **Difficulty**: {:.2}\n", h.difficulty));
            out.push_str(&format!("- **Effort**: {:.2}\n\n", h.effort));
        }

        if self.config.includes(ReportSection::Lint) {
            out.push_str("#### Code Quality Issues\n\n");
            match &metrics.lint {
                LintOutcome::Messages(messages) if messages.is_empty() => {
                    out.push_str("- No significant issues detected\n\n");
                }
                LintOutcome::Messages(messages) => {
                    out.push_str("```\n");
                    for m in messages {
                        out.push_str(&format!("{}\n", m));
                    }
                    out.push_str("```\n\n");
                }
                LintOutcome::Unavailable(reason) => {
                    out.push_str(&format!("- Lint unavailable: {}\n\n", reason));
                }
            }
        }
    }
}

/// Markdown body wrapped in a styled standalone page.
///
/// Raw HTML inside the markdown is escaped, not passed through.
pub fn render_html(title: &str, markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut body = String::new();
    html::push_html(&mut body, parser);

    let mut title_escaped = String::new();
    html::push_html(&mut title_escaped, std::iter::once(Event::Text(title.into())));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Repository Analysis Report: {title}</title>
<style>
body {{ font-family: Arial, sans-serif; line-height: 1.6; max-width: 800px; margin: 0 auto; padding: 20px; color: #333; }}
h1 {{ border-bottom: 2px solid #eee; padding-bottom: 8px; }}
h2 {{ color: #555; margin-top: 32px; }}
h3 {{ color: #666; }}
pre {{ background: #f4f4f4; padding: 10px; overflow-x: auto; }}
code {{ font-family: Menlo, Consolas, monospace; }}
</style>
</head>
<body>
{body}</body>
</html>
"#,
        title = title_escaped,
        body = body
    )
}

/// Persist `content` as `<stem>.<ext>`, or `<stem>-N.<ext>` if taken
fn write_new_file(dir: &Path, stem: &str, extension: &str, content: &str) -> Result<PathBuf> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = match attempt {
            0 => format!("{}.{}", stem, extension),
            n => format!("{}-{}.{}", stem, n, extension),
        };
        let target = dir.join(name);

        match tmp.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => tmp = e.file,
            Err(e) => return Err(e.error.into()),
        }
    }

    Err(RepolyzeError::Io(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free report name for {} in {}", stem, dir.display()),
    )))
}
