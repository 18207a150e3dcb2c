//! Agent commands and the slash-command grammar

use serde::{Deserialize, Serialize};

use crate::types::{RepolyzeError, Result};

/// One unit of work the agent can perform
///
/// The serde shape doubles as the JSON contract for LLM intent routing:
/// `{"command": "read_file", "repo": "owner/name", "path": "app.py"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    FetchRepository {
        repo: String,
    },
    ListFiles {
        repo: String,
        #[serde(default)]
        path: Option<String>,
    },
    ReadFile {
        repo: String,
        path: String,
    },
    AnalyzeFile {
        repo: String,
        #[serde(default)]
        path: Option<String>,
    },
    AnalyzeRepository {
        repo: String,
    },
    SuggestImprovements {
        repo: String,
        #[serde(default)]
        path: Option<String>,
    },
    GenerateReport {
        repo: String,
    },
    Ask {
        question: String,
    },
    Help,
    Exit,
}

pub const HELP_TEXT: &str = "\
Commands:
  /info <repo>              Repository metadata and top-level files
  /files <repo> [path]      List files (optionally under a directory)
  /read <repo> <path>       Show the beginning of a file
  /analyze <repo> [path]    Metrics for one file (main-like file when omitted)
  /analyze-all <repo>       Metrics for the first few analyzable files
  /improve <repo> [path]    LLM improvement suggestions for one file
  /report <repo>            Analyze the repository and write reports
  /help                     Show this help
  exit | quit               Leave the session

Anything else is interpreted as a question or a plain-language request.
<repo> is owner/name or a github.com URL.";

impl AgentCommand {
    /// Parse the deterministic grammar
    ///
    /// Returns `None` when `input` is not a command (free text), and a
    /// `Usage` error when it is a command with bad arguments.
    pub fn parse(input: &str) -> Option<Result<Self>> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            return Some(Ok(Self::Exit));
        }

        let rest = input.strip_prefix('/')?;
        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<String> = words.map(str::to_string).collect();

        Some(Self::from_words(&name, args))
    }

    fn from_words(name: &str, args: Vec<String>) -> Result<Self> {
        let mut args = args.into_iter();
        let mut next = || args.next();

        let command = match name {
            "info" => Self::FetchRepository {
                repo: required(next(), "/info <repo>")?,
            },
            "files" | "ls" => Self::ListFiles {
                repo: required(next(), "/files <repo> [path]")?,
                path: next(),
            },
            "read" | "cat" => {
                let usage = "/read <repo> <path>";
                Self::ReadFile {
                    repo: required(next(), usage)?,
                    path: required(next(), usage)?,
                }
            }
            "analyze" => Self::AnalyzeFile {
                repo: required(next(), "/analyze <repo> [path]")?,
                path: next(),
            },
            "analyze-all" => Self::AnalyzeRepository {
                repo: required(next(), "/analyze-all <repo>")?,
            },
            "improve" => Self::SuggestImprovements {
                repo: required(next(), "/improve <repo> [path]")?,
                path: next(),
            },
            "report" => Self::GenerateReport {
                repo: required(next(), "/report <repo>")?,
            },
            "help" | "?" => Self::Help,
            "exit" | "quit" => Self::Exit,
            other => {
                return Err(RepolyzeError::Usage(format!(
                    "Unknown command: /{} (type /help for the list)",
                    other
                )));
            }
        };

        if let Some(extra) = next() {
            return Err(RepolyzeError::Usage(format!(
                "Unexpected argument '{}' for /{}",
                extra, name
            )));
        }
        Ok(command)
    }

    /// Short label for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchRepository { .. } => "fetch_repository",
            Self::ListFiles { .. } => "list_files",
            Self::ReadFile { .. } => "read_file",
            Self::AnalyzeFile { .. } => "analyze_file",
            Self::AnalyzeRepository { .. } => "analyze_repository",
            Self::SuggestImprovements { .. } => "suggest_improvements",
            Self::GenerateReport { .. } => "generate_report",
            Self::Ask { .. } => "ask",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }
}

fn required(arg: Option<String>, usage: &str) -> Result<String> {
    arg.ok_or_else(|| RepolyzeError::Usage(format!("Usage: {}", usage)))
}
