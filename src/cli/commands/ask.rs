//! Ask Command
//!
//! One agent turn without entering the interactive session.
//!
//! Usage:
//!   repolyze ask "<query>"

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::Result;

pub async fn run(ctx: &CommandContext, out: &Output, query: &str) -> Result<()> {
    let reply = ctx.agent()?.handle(query).await?;
    out.result(&reply.to_string());
    Ok(())
}
