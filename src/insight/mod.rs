//! Insight Generator
//!
//! Builds prompts from fetched code and metrics, forwards them to the
//! configured [`LlmProvider`](crate::ai::LlmProvider) and wraps the reply as
//! an [`Insight`]. Upstream failures propagate unchanged; there is no
//! canned fallback text.

use std::fmt::Write as _;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use crate::ai::{CompletionRequest, PromptTemplates, SharedProvider, generate_with_timeout};
use crate::config::LlmConfig;
use crate::types::utils::truncate_code;
use crate::types::{
    FileOutcome, FileSnapshot, Insight, InsightKind, LintOutcome, MetricsResult,
    RepositoryAnalysis, Result,
};

/// Lint messages quoted per file in prompts
const MAX_LINT_IN_PROMPT: usize = 15;

pub struct InsightGenerator {
    provider: SharedProvider,
    timeout: Duration,
    max_prompt_chars: usize,
}

impl InsightGenerator {
    pub fn new(provider: SharedProvider, config: &LlmConfig) -> Self {
        Self {
            provider,
            timeout: Duration::from_secs(config.timeout_secs),
            max_prompt_chars: config.max_prompt_chars,
        }
    }

    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    /// Improvement suggestions for one file, informed by its metrics when known
    pub async fn suggest_improvements(
        &self,
        snapshot: &FileSnapshot,
        metrics: Option<&MetricsResult>,
    ) -> Result<Insight> {
        let mut builder = PromptTemplates::improvements(&snapshot.path)
            .context_item("File", &snapshot.path)
            .context_item("Lines", &snapshot.line_count().to_string());

        if let Some(metrics) = metrics {
            builder = builder.section("Metrics", &metrics_digest(metrics));
        }

        let prompt = builder
            .code("python", &truncate_code(&snapshot.content, self.max_prompt_chars))
            .build();

        self.complete(
            &snapshot.path,
            InsightKind::Improvements,
            CompletionRequest::text(PromptTemplates::SYSTEM, prompt),
        )
        .await
    }

    /// Repository-level commentary over every analyzed file
    pub async fn summarize_repository(&self, analysis: &RepositoryAnalysis) -> Result<Insight> {
        let info = &analysis.info;
        let mut builder = PromptTemplates::repository_summary(&info.full_name)
            .context_item("Repository", &info.full_name)
            .context_item(
                "Description",
                info.description.as_deref().unwrap_or("No description"),
            )
            .context_item("Language", info.language.as_deref().unwrap_or("Unknown"))
            .context_item("Stars", &info.stars.to_string());

        let mut table = String::new();
        for (path, outcome) in &analysis.files {
            match outcome {
                FileOutcome::Analyzed(metrics) => {
                    let _ = writeln!(table, "## {}\n{}", path, metrics_digest(metrics));
                }
                FileOutcome::Skipped(reason) => {
                    let _ = writeln!(table, "## {}\nskipped: {}\n", path, reason);
                }
                FileOutcome::Failed(reason) => {
                    let _ = writeln!(table, "## {}\nfailed: {}\n", path, reason);
                }
            }
        }
        builder = builder.section(
            "Metrics",
            &truncate_code(table.trim_end(), self.max_prompt_chars),
        );

        self.complete(
            &info.full_name,
            InsightKind::RepositorySummary,
            CompletionRequest::text(PromptTemplates::SYSTEM, builder.build()),
        )
        .await
    }

    /// Free-form answer to a user question
    pub async fn answer(&self, question: &str) -> Result<Insight> {
        self.complete(
            "chat",
            InsightKind::Answer,
            CompletionRequest::text(
                PromptTemplates::SYSTEM,
                PromptTemplates::answer(question).build(),
            ),
        )
        .await
    }

    async fn complete(
        &self,
        subject: &str,
        kind: InsightKind,
        request: CompletionRequest,
    ) -> Result<Insight> {
        debug!(
            "Requesting {:?} insight for {} ({} prompt chars)",
            kind,
            subject,
            request.prompt.len()
        );

        let response = generate_with_timeout(
            self.provider.as_ref(),
            &request,
            self.timeout,
            "LLM request",
        )
        .await?;

        info!(
            "Insight for {} generated by {} ({} tokens, {}ms)",
            subject,
            self.provider.name(),
            response.usage.total(),
            response.timing.total_ms
        );

        let model = if response.metadata.model.is_empty() {
            self.provider.model().to_string()
        } else {
            response.metadata.model
        };

        Ok(Insight {
            subject: subject.to_string(),
            kind,
            text: response.content.trim().to_string(),
            model,
            usage: response.usage,
            generated_at: Utc::now(),
        })
    }
}

/// Compact text rendering of a file's metrics for prompts
pub fn metrics_digest(metrics: &MetricsResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Cyclomatic complexity: {} block(s), average {:.1}",
        metrics.functions.len(),
        metrics.average_complexity()
    );
    for f in &metrics.functions {
        let _ = writeln!(
            out,
            "- {} {} (line {}): {} [{}]",
            f.kind, f.name, f.line, f.complexity, f.rank
        );
    }

    let h = &metrics.halstead;
    let _ = writeln!(
        out,
        "Halstead: volume {:.2}, difficulty {:.2}, effort {:.2}, estimated bugs {:.3}",
        h.volume, h.difficulty, h.effort, h.bugs
    );

    match &metrics.lint {
        LintOutcome::Messages(messages) if messages.is_empty() => {
            out.push_str("Lint: no issues\n");
        }
        LintOutcome::Messages(messages) => {
            let _ = writeln!(out, "Lint: {} issue(s)", messages.len());
            for m in messages.iter().take(MAX_LINT_IN_PROMPT) {
                let _ = writeln!(out, "- {}", m);
            }
            if messages.len() > MAX_LINT_IN_PROMPT {
                let _ = writeln!(out, "- ... {} more", messages.len() - MAX_LINT_IN_PROMPT);
            }
        }
        LintOutcome::Unavailable(reason) => {
            let _ = writeln!(out, "Lint: unavailable ({})", reason);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::mock::MockProvider;
    use crate::types::{
        ErrorCategory, FunctionComplexity, HalsteadMetrics, LintMessage, RepoIdentifier,
        RepolyzeError, RepositoryInfo,
    };

    fn metrics() -> MetricsResult {
        MetricsResult {
            path: "app/main.py".to_string(),
            functions: vec![FunctionComplexity {
                name: "run".to_string(),
                kind: "function".to_string(),
                line: 3,
                complexity: 9,
                rank: "B".to_string(),
            }],
            halstead: HalsteadMetrics {
                volume: 120.5,
                difficulty: 6.25,
                effort: 753.125,
                bugs: 0.04,
                time: 41.8,
            },
            lint: LintOutcome::Messages(vec![LintMessage {
                kind: "warning".to_string(),
                symbol: "unused-import".to_string(),
                message_id: "W0611".to_string(),
                message: "Unused import os".to_string(),
                line: 1,
                column: 0,
            }]),
        }
    }

    fn generator(mock: &std::sync::Arc<MockProvider>) -> InsightGenerator {
        InsightGenerator::new(mock.shared(), &LlmConfig::default())
    }

    #[test]
    fn test_metrics_digest() {
        let digest = metrics_digest(&metrics());
        assert!(digest.contains("function run (line 3): 9 [B]"));
        assert!(digest.contains("volume 120.50"));
        assert!(digest.contains("W0611 (unused-import)"));

        let mut unavailable = metrics();
        unavailable.lint = LintOutcome::Unavailable("pylint missing".to_string());
        assert!(metrics_digest(&unavailable).contains("unavailable (pylint missing)"));
    }

    #[tokio::test]
    async fn test_suggest_improvements() {
        let mock = MockProvider::with_replies(&["  1. Split `run` into smaller functions.\n"]);
        let snapshot = FileSnapshot::new("app/main.py", "import os\n\ndef run():\n    pass\n");

        let insight = generator(&mock)
            .suggest_improvements(&snapshot, Some(&metrics()))
            .await
            .unwrap();

        assert_eq!(insight.kind, InsightKind::Improvements);
        assert_eq!(insight.subject, "app/main.py");
        assert_eq!(insight.text, "1. Split `run` into smaller functions.");
        assert_eq!(insight.model, "mock-model");
        assert_eq!(insight.usage.total(), 15);

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let prompt = &requests[0].prompt;
        assert!(prompt.contains("def run():"));
        assert!(prompt.contains("Code readability"));
        assert!(prompt.contains("9 [B]"));
        assert!(!requests[0].json_output);
    }

    #[tokio::test]
    async fn test_long_source_is_truncated() {
        let mock = MockProvider::with_replies(&["ok"]);
        let config = LlmConfig {
            max_prompt_chars: 100,
            ..LlmConfig::default()
        };
        let generator = InsightGenerator::new(mock.shared(), &config);
        let source = "x = 1\n".repeat(1000);

        generator
            .suggest_improvements(&FileSnapshot::new("big.py", source), None)
            .await
            .unwrap();

        let prompt = &mock.requests()[0].prompt;
        assert!(prompt.contains("(truncated)"));
        assert!(prompt.len() < 2000);
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let mock = MockProvider::new();
        mock.push_error(RepolyzeError::upstream("openai", "HTTP 500: overloaded"));

        let err = generator(&mock)
            .answer("What does this repo do?")
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Upstream);
    }

    #[tokio::test]
    async fn test_summarize_repository() {
        let mock = MockProvider::with_replies(&["Healthy codebase."]);
        let analysis = RepositoryAnalysis {
            info: RepositoryInfo {
                repo: RepoIdentifier::parse("octocat/hello").unwrap(),
                name: "hello".to_string(),
                full_name: "octocat/hello".to_string(),
                description: Some("Demo".to_string()),
                language: Some("Python".to_string()),
                stars: 7,
                default_branch: "main".to_string(),
                contents: vec![],
            },
            files: vec![
                ("app/main.py".to_string(), FileOutcome::Analyzed(metrics())),
                (
                    "broken.py".to_string(),
                    FileOutcome::Failed("syntax error at line 2".to_string()),
                ),
            ],
            insight: None,
            analyzed_at: Utc::now(),
        };

        let insight = generator(&mock)
            .summarize_repository(&analysis)
            .await
            .unwrap();
        assert_eq!(insight.kind, InsightKind::RepositorySummary);
        assert_eq!(insight.subject, "octocat/hello");

        let prompt = &mock.requests()[0].prompt;
        assert!(prompt.contains("**Stars**: 7"));
        assert!(prompt.contains("## app/main.py"));
        assert!(prompt.contains("failed: syntax error at line 2"));
    }

    #[tokio::test]
    async fn test_answer() {
        let mock = MockProvider::with_replies(&["It prints hello."]);
        let insight = generator(&mock).answer("What does it do?").await.unwrap();
        assert_eq!(insight.kind, InsightKind::Answer);
        assert_eq!(insight.subject, "chat");
        assert_eq!(insight.text, "It prints hello.");
        assert!(mock.requests()[0].prompt.contains("What does it do?"));
    }

    #[tokio::test]
    async fn test_unresponsive_model_is_upstream() {
        let mock = MockProvider::with_replies(&["too late"]);
        mock.set_delay(Duration::from_secs(5));
        let config = LlmConfig {
            timeout_secs: 1,
            ..LlmConfig::default()
        };

        let err = InsightGenerator::new(mock.shared(), &config)
            .answer("What does this repo do?")
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Upstream);
    }
}
