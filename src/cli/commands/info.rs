//! Info Command
//!
//! Repository metadata and top-level listing.
//!
//! Usage:
//!   repolyze info <owner/name>

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::{RepoIdentifier, Result};

pub async fn run(ctx: &CommandContext, out: &Output, repo: &str) -> Result<()> {
    let repo = RepoIdentifier::parse(repo)?;
    let info = ctx.github()?.fetch_repository(&repo).await?;

    out.header(&info.full_name);
    if let Some(description) = &info.description {
        out.result(description);
    }
    out.field("Language", info.language.as_deref().unwrap_or("Unknown"));
    out.field("Stars", &info.stars.to_string());
    out.field("Default branch", &info.default_branch);
    out.field("URL", &repo.html_url());

    out.section(&format!("Contents ({})", info.contents.len()));
    for entry in &info.contents {
        if entry.is_file() {
            out.result(&format!("  {} ({} bytes)", entry.path, entry.size));
        } else {
            out.result(&format!("  {}/", entry.path));
        }
    }
    Ok(())
}
