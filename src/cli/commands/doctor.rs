//! Doctor Command
//!
//! Checks external tools, credentials and LLM reachability.
//!
//! Usage:
//!   repolyze doctor

use crate::analyzer::MetricsRunner;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::{RepolyzeError, Result};

pub async fn run(ctx: &CommandContext, out: &Output) -> Result<()> {
    let mut problems = 0;

    out.section("Tools");
    for status in MetricsRunner::new(ctx.config.analysis.clone()).check_tools().await {
        match &status.version {
            Some(version) => out.success(&format!("{}: {}", status.name, version)),
            None => {
                problems += 1;
                out.error(&format!(
                    "{}: '{}' not found (pip install {})",
                    status.name, status.program, status.name
                ));
            }
        }
    }

    out.section("Credentials");
    if ctx.secrets.github_token.is_some() {
        out.success("GITHUB_TOKEN is set");
    } else {
        problems += 1;
        out.error("GITHUB_TOKEN is not set: repository commands will fail");
    }

    match ctx.provider()? {
        Some(provider) => {
            out.success("OPENAI_API_KEY is set");
            out.section("LLM");
            match provider.health_check().await {
                Ok(true) => out.success(&format!(
                    "{} reachable ({})",
                    provider.name(),
                    provider.model()
                )),
                Ok(false) => {
                    problems += 1;
                    out.error(&format!("{} rejected the health check", provider.name()));
                }
                Err(e) => {
                    problems += 1;
                    out.error(&format!("{}: {}", provider.name(), e));
                }
            }
        }
        None => out.warning("OPENAI_API_KEY is not set: chat routing and suggestions disabled"),
    }

    if problems > 0 {
        return Err(RepolyzeError::Config(format!(
            "{} problem(s) found",
            problems
        )));
    }
    out.success("All checks passed");
    Ok(())
}
