use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use repolyze::cli::commands::analyze::AnalyzeArgs;
use repolyze::cli::{CommandContext, Output};
use repolyze::config::{ConfigLoader, DEFAULT_CONFIG_PATH, LoggingConfig};

#[derive(Parser)]
#[command(name = "repolyze")]
#[command(
    version,
    about = "Conversational GitHub repository analyzer: code metrics plus LLM suggestions"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(
        long,
        short,
        global = true,
        env = "REPOLYZE_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive agent session (default)
    Chat,

    /// Show repository metadata and top-level files
    Info {
        #[arg(help = "Repository as owner/name or github.com URL")]
        repo: String,
    },

    /// Compute metrics for every analyzable file and write reports
    Analyze {
        #[arg(help = "Repository as owner/name or github.com URL")]
        repo: String,
        #[arg(long, help = "Directory or file to analyze instead of the root")]
        path: Option<String>,
        #[arg(long, help = "Maximum number of files (0 = unlimited)")]
        max_files: Option<usize>,
        #[arg(long, help = "Print results without writing report files")]
        no_report: bool,
        #[arg(long, help = "Add an LLM summary of the results")]
        insights: bool,
    },

    /// Ask the LLM for improvement suggestions on one file
    Improve {
        #[arg(help = "Repository as owner/name or github.com URL")]
        repo: String,
        #[arg(help = "File path inside the repository")]
        path: String,
    },

    /// Run a single agent turn
    Ask {
        #[arg(help = "Question or request, e.g. \"/analyze octocat/hello\"")]
        query: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check tools, credentials and LLM connectivity
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "yaml",
            help = "Output format: yaml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Write a default configuration file
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mrepolyze encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr layer and, when `logging.dir` is set, a per-run file
///
/// The returned guard flushes the file writer on drop.
fn init_logging(cli: &Cli, logging: &LoggingConfig) -> Option<WorkerGuard> {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        logging.level.as_str()
    };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match logging.dir.as_deref().map(open_log_file) {
        Some(Ok(file)) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("Warning: file logging disabled: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter()),
        )
        .with(file_layer)
        .init();

    guard
}

fn open_log_file(dir: &Path) -> std::io::Result<std::fs::File> {
    std::fs::create_dir_all(dir)?;
    let name = format!(
        "repolyze_{}.log",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    std::fs::File::create(dir.join(name))
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let out = Output::new(cli.quiet);

    // These never need the network or credentials
    if let Some(Commands::Config { action }) = &cli.command {
        match action {
            ConfigAction::Show { format } => {
                repolyze::cli::commands::config::show(&cli.config, format)?;
            }
            ConfigAction::Path => repolyze::cli::commands::config::path(&cli.config)?,
            ConfigAction::Init { force } => {
                repolyze::cli::commands::config::init(&out, &cli.config, *force)?;
            }
        }
        return Ok(());
    }

    let ctx = CommandContext::load(&cli.config)?;
    let _guard = init_logging(&cli, &ctx.config.logging);
    if ctx.config_found {
        tracing::debug!("Configuration loaded from {}", cli.config.display());
    } else {
        ConfigLoader::warn_missing(&cli.config);
    }

    let rt = Runtime::new()?;

    match cli.command {
        None | Some(Commands::Chat) => {
            rt.block_on(repolyze::cli::commands::chat::run(&ctx, &out))?;
        }
        Some(Commands::Info { repo }) => {
            rt.block_on(repolyze::cli::commands::info::run(&ctx, &out, &repo))?;
        }
        Some(Commands::Analyze {
            repo,
            path,
            max_files,
            no_report,
            insights,
        }) => {
            let args = AnalyzeArgs {
                path,
                max_files,
                no_report,
                insights,
            };
            rt.block_on(repolyze::cli::commands::analyze::run(&ctx, &out, &repo, args))?;
        }
        Some(Commands::Improve { repo, path }) => {
            rt.block_on(repolyze::cli::commands::improve::run(&ctx, &out, &repo, &path))?;
        }
        Some(Commands::Ask { query }) => {
            rt.block_on(repolyze::cli::commands::ask::run(&ctx, &out, &query))?;
        }
        Some(Commands::Doctor) => {
            rt.block_on(repolyze::cli::commands::doctor::run(&ctx, &out))?;
        }
        Some(Commands::Config { .. }) => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["repolyze", "analyze", "x/y", "--config", "c.yaml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("c.yaml"));
        assert!(matches!(cli.command, Some(Commands::Analyze { ref repo, .. }) if repo == "x/y"));
    }

    #[test]
    fn test_config_flag_before_subcommand() {
        let cli = Cli::try_parse_from(["repolyze", "-c", "c.yaml", "--quiet", "doctor"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("c.yaml"));
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Doctor)));
    }
}
