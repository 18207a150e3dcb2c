//! Chat Command
//!
//! Interactive agent session.
//!
//! Usage:
//!   repolyze chat

use std::io::Write;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::Result;

pub async fn run(ctx: &CommandContext, out: &Output) -> Result<()> {
    let agent = ctx.agent()?;

    out.header("repolyze");
    out.info("Ask about a GitHub repository, or type /help for commands and exit to quit.");
    if !agent.has_llm() {
        out.warning("OPENAI_API_KEY is not set: only slash commands are available.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\n{} ", style("you>").cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            debug!("stdin closed, ending session");
            println!();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match agent.handle(&line).await {
            Ok(reply) => {
                println!("{}\n{}", style("agent>").green().bold(), reply);
                if reply.is_exit() {
                    break;
                }
            }
            Err(e) => out.error(&format!("[{}] {}", e.category(), e)),
        }
    }

    Ok(())
}
