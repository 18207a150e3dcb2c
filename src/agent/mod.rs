//! Conversational front-end
//!
//! A query is routed to an [`AgentCommand`] and executed against the
//! fetcher, metrics runner, insight generator and report writer. Each turn
//! is independent; a failed turn leaves the agent usable.

mod command;
mod reply;
mod router;

pub use command::{AgentCommand, HELP_TEXT};
pub use reply::AgentReply;
pub use router::IntentRouter;

use std::time::Duration;

use tracing::info;

use crate::ai::{ProviderConfig, SharedProvider, create_provider};
use crate::analyzer::MetricsRunner;
use crate::config::{Config, Secrets};
use crate::constants::agent::PREVIEW_CHARS;
use crate::github::GitHubClient;
use crate::insight::InsightGenerator;
use crate::pipeline::{AnalysisOptions, RepositoryAnalyzer, pick_main_file};
use crate::report::ReportWriter;
use crate::types::utils::{log_filter_warn, preview};
use crate::types::{FileSnapshot, RepoIdentifier, RepolyzeError, Result};

pub struct Agent {
    github: GitHubClient,
    runner: MetricsRunner,
    insights: Option<InsightGenerator>,
    router: IntentRouter,
    reports: ReportWriter,
    agent_max_files: usize,
    report_max_files: usize,
}

impl Agent {
    /// Build every collaborator from configuration
    ///
    /// Without an OpenAI key the agent still serves the slash commands;
    /// LLM-backed commands then fail with an auth error.
    pub fn new(config: &Config, secrets: &Secrets) -> Result<Self> {
        let github = GitHubClient::new(&config.github, secrets.github_token.clone())?;

        let provider = match &secrets.openai_api_key {
            Some(_) => Some(create_provider(&ProviderConfig::from_config(
                &config.llm,
                secrets,
            ))?),
            None => {
                info!("OPENAI_API_KEY not set, LLM features disabled");
                None
            }
        };

        Ok(Self::from_parts(config, github, provider))
    }

    pub fn from_parts(
        config: &Config,
        github: GitHubClient,
        provider: Option<SharedProvider>,
    ) -> Self {
        let router = IntentRouter::new(
            provider.clone(),
            Duration::from_secs(config.llm.timeout_secs),
        );
        let insights = provider.map(|p| InsightGenerator::new(p, &config.llm));

        Self {
            github,
            runner: MetricsRunner::new(config.analysis.clone()),
            insights,
            router,
            reports: ReportWriter::new(config.report.clone()),
            agent_max_files: config.analysis.agent_max_files,
            report_max_files: config.analysis.max_files,
        }
    }

    pub fn has_llm(&self) -> bool {
        self.insights.is_some()
    }

    /// Route and execute one user query
    pub async fn handle(&self, query: &str) -> Result<AgentReply> {
        let command = self.router.route(query).await?;
        self.execute(command).await
    }

    pub async fn execute(&self, command: AgentCommand) -> Result<AgentReply> {
        info!("Executing {}", command.name());

        match command {
            AgentCommand::FetchRepository { repo } => {
                let repo = RepoIdentifier::parse(&repo)?;
                Ok(AgentReply::Repository(
                    self.github.fetch_repository(&repo).await?,
                ))
            }
            AgentCommand::ListFiles { repo, path } => {
                let id = RepoIdentifier::parse(&repo)?;
                let entries = self.github.list_files(&id, path.as_deref()).await?;
                Ok(AgentReply::Files {
                    repo: id.full_name(),
                    path,
                    entries,
                })
            }
            AgentCommand::ReadFile { repo, path } => {
                let repo = RepoIdentifier::parse(&repo)?;
                let snapshot = self.github.fetch_file(&repo, &path).await?;
                Ok(AgentReply::FileContent {
                    preview: preview(&snapshot.content, PREVIEW_CHARS),
                    lines: snapshot.line_count(),
                    path: snapshot.path,
                })
            }
            AgentCommand::AnalyzeFile { repo, path } => {
                let repo = RepoIdentifier::parse(&repo)?;
                let snapshot = self.resolve_file(&repo, path.as_deref()).await?;
                Ok(AgentReply::Metrics(self.runner.analyze(&snapshot).await?))
            }
            AgentCommand::AnalyzeRepository { repo } => {
                let repo = RepoIdentifier::parse(&repo)?;
                let options = AnalysisOptions {
                    path_filter: None,
                    max_files: self.agent_max_files,
                    with_insight: false,
                };
                let analysis = RepositoryAnalyzer::new(&self.github, &self.runner)
                    .analyze(&repo, &options)
                    .await?;
                Ok(AgentReply::Analysis(analysis))
            }
            AgentCommand::SuggestImprovements { repo, path } => {
                let insights = self.insights()?;
                let repo = RepoIdentifier::parse(&repo)?;
                let snapshot = self.resolve_file(&repo, path.as_deref()).await?;

                let metrics = log_filter_warn(
                    self.runner.analyze(&snapshot).await,
                    "Suggesting without metrics",
                );

                let insight = insights
                    .suggest_improvements(&snapshot, metrics.as_ref())
                    .await?;
                Ok(AgentReply::Insight(insight))
            }
            AgentCommand::GenerateReport { repo } => {
                let repo = RepoIdentifier::parse(&repo)?;
                let options = AnalysisOptions {
                    path_filter: None,
                    max_files: self.report_max_files,
                    with_insight: self.insights.is_some(),
                };

                let mut analyzer = RepositoryAnalyzer::new(&self.github, &self.runner);
                if let Some(insights) = &self.insights {
                    analyzer = analyzer.with_insights(insights);
                }
                let analysis = analyzer.analyze(&repo, &options).await?;
                let paths = self.reports.write(&analysis)?;

                Ok(AgentReply::Report {
                    repo: repo.full_name(),
                    paths,
                    analyzed: analysis.analyzed_count(),
                    failed: analysis.failed_count(),
                })
            }
            AgentCommand::Ask { question } => {
                let insight = self.insights()?.answer(&question).await?;
                Ok(AgentReply::Insight(insight))
            }
            AgentCommand::Help => Ok(AgentReply::Help),
            AgentCommand::Exit => Ok(AgentReply::Goodbye),
        }
    }

    fn insights(&self) -> Result<&InsightGenerator> {
        self.insights
            .as_ref()
            .ok_or_else(|| RepolyzeError::auth("openai", "OPENAI_API_KEY is not set"))
    }

    /// Fetch `path`, or the most entry-point-looking file at the root
    async fn resolve_file(
        &self,
        repo: &RepoIdentifier,
        path: Option<&str>,
    ) -> Result<FileSnapshot> {
        if let Some(path) = path {
            return self.github.fetch_file(repo, path).await;
        }

        let entries = self.github.list_files(repo, None).await?;
        let entry = pick_main_file(&entries, &self.runner).ok_or_else(|| {
            RepolyzeError::NotFound(format!("no analyzable files in {}", repo))
        })?;
        info!("No file named, using {}", entry.path);
        self.github.fetch_file(repo, &entry.path).await
    }
}
