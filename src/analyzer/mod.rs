//! Metrics Runner
//!
//! Runs radon and pylint over one fetched file and collects their output
//! into a [`MetricsResult`]. The crate computes no metrics itself.
//!
//! ## Flow
//!
//! 1. Reject unsupported extensions
//! 2. Short-circuit empty files
//! 3. tree-sitter syntax pre-check (Python)
//! 4. Write the content to a private temp dir under its basename
//! 5. `radon cc`, `radon hal`, `pylint` (lint is best-effort)

pub mod pylint;
pub mod radon;
pub mod syntax;
pub mod tool;

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::types::{FileSnapshot, MetricsResult, RepolyzeError, Result, ResultExt};

const FALLBACK_FILE_NAME: &str = "source.py";

/// Installation status of one external tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: String,
    pub program: String,
    pub version: Option<String>,
}

impl ToolStatus {
    pub fn installed(&self) -> bool {
        self.version.is_some()
    }
}

/// Runs the external metric tools over file snapshots
#[derive(Debug, Clone)]
pub struct MetricsRunner {
    config: AnalysisConfig,
}

impl MetricsRunner {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Whether `path` has an extension the tools can analyze
    pub fn supports(&self, path: &str) -> bool {
        self.config.supports(extension_of(path).as_deref())
    }

    pub async fn analyze(&self, snapshot: &FileSnapshot) -> Result<MetricsResult> {
        let path = snapshot.path.as_str();
        let extension = snapshot.extension();

        if !self.config.supports(extension.as_deref()) {
            return Err(RepolyzeError::analysis(
                path,
                format!(
                    "unsupported file type (supported: {})",
                    self.config.extensions.join(", ")
                ),
            ));
        }

        if snapshot.content.trim().is_empty() {
            debug!("{} is empty, skipping tools", path);
            return Ok(MetricsResult::empty(path));
        }

        if extension.as_deref() == Some("py") {
            syntax::check_python(path, &snapshot.content)?;
        }

        let dir = tempfile::Builder::new()
            .prefix("repolyze-")
            .tempdir()
            .analysis_context(path)?;
        let file_name = safe_file_name(snapshot.file_name());
        tokio::fs::write(dir.path().join(&file_name), &snapshot.content)
            .await
            .analysis_context(path)?;

        let limit = Duration::from_secs(self.config.tool_timeout_secs);
        let cwd = dir.path();
        let radon_bin = self.config.radon_bin.as_str();

        let functions = radon::cyclomatic_complexity(radon_bin, &file_name, cwd, limit, path).await?;
        let halstead = radon::halstead(radon_bin, &file_name, cwd, limit, path).await?;
        let lint = pylint::lint(&self.config.pylint_bin, &file_name, cwd, limit, path).await;

        info!(
            "Analyzed {}: {} block(s), {} lint message(s)",
            path,
            functions.len(),
            lint.messages().len()
        );

        Ok(MetricsResult {
            path: path.to_string(),
            functions,
            halstead,
            lint,
        })
    }

    /// Probe each configured tool with `--version`
    pub async fn check_tools(&self) -> Vec<ToolStatus> {
        let mut statuses = Vec::new();
        for (name, program) in [
            ("radon", &self.config.radon_bin),
            ("pylint", &self.config.pylint_bin),
        ] {
            statuses.push(ToolStatus {
                name: name.to_string(),
                program: program.clone(),
                version: tool::tool_version(program).await,
            });
        }
        statuses
    }
}

fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Basename usable inside the temp dir
fn safe_file_name(name: &str) -> String {
    match Path::new(name).file_name().and_then(|n| n.to_str()) {
        Some(n) if !n.starts_with('-') => n.to_string(),
        _ => FALLBACK_FILE_NAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErrorCategory, LintOutcome};

    fn runner_with(radon: &str, pylint: &str) -> MetricsRunner {
        MetricsRunner::new(AnalysisConfig {
            radon_bin: radon.to_string(),
            pylint_bin: pylint.to_string(),
            tool_timeout_secs: 10,
            ..AnalysisConfig::default()
        })
    }

    #[test]
    fn test_supports() {
        let runner = MetricsRunner::new(AnalysisConfig::default());
        assert!(runner.supports("pkg/main.py"));
        assert!(runner.supports("MAIN.PY"));
        assert!(!runner.supports("README.md"));
        assert!(!runner.supports("Makefile"));
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("main.py"), "main.py");
        assert_eq!(safe_file_name("--help"), FALLBACK_FILE_NAME);
        assert_eq!(safe_file_name(".."), FALLBACK_FILE_NAME);
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let runner = MetricsRunner::new(AnalysisConfig::default());
        let err = runner
            .analyze(&FileSnapshot::new("docs/guide.md", "# Guide"))
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Analysis);
        assert!(err.to_string().contains("unsupported"));
    }

    #[tokio::test]
    async fn test_empty_file_needs_no_tools() {
        let runner = runner_with("repolyze-no-such-radon", "repolyze-no-such-pylint");
        let result = runner
            .analyze(&FileSnapshot::new("pkg/__init__.py", "\n  \n"))
            .await
            .unwrap();
        assert_eq!(result, MetricsResult::empty("pkg/__init__.py"));
    }

    #[tokio::test]
    async fn test_syntax_error_stops_before_tools() {
        // With missing tools any tool run would report "tool not installed"
        let runner = runner_with("repolyze-no-such-radon", "repolyze-no-such-pylint");
        let err = runner
            .analyze(&FileSnapshot::new("bad.py", "def f(:\n    pass\n"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("syntax error"));
        assert!(!err.to_string().contains("not installed"));
    }

    #[tokio::test]
    async fn test_missing_radon() {
        let runner = runner_with("repolyze-no-such-radon", "repolyze-no-such-pylint");
        let err = runner
            .analyze(&FileSnapshot::new("ok.py", "x = 1\n"))
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Analysis);
        assert!(err.to_string().contains("tool not installed"));
    }

    #[tokio::test]
    async fn test_check_tools_reports_missing() {
        let runner = runner_with("repolyze-no-such-radon", "repolyze-no-such-pylint");
        let statuses = runner.check_tools().await;
        assert_eq!(statuses.len(), 2);
        assert!(statuses.iter().all(|s| !s.installed()));
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_collects_tool_output() {
        let bin = tempfile::tempdir().unwrap();
        let radon = write_script(
            bin.path(),
            "fake-radon",
            r#"case "$1" in
  cc) echo '{"main.py": [{"type": "function", "name": "main", "lineno": 1, "complexity": 4, "rank": "A"}]}' ;;
  hal) echo '{"main.py": {"total": {"volume": 12.5, "difficulty": 1.5, "effort": 18.75, "time": 1.04, "bugs": 0.004}}}' ;;
esac"#,
        );
        let pylint = write_script(
            bin.path(),
            "fake-pylint",
            r#"echo '[{"type": "convention", "symbol": "missing-module-docstring", "message": "Missing module docstring", "message-id": "C0114", "line": 1, "column": 0}]'
exit 16"#,
        );

        let result = runner_with(&radon, &pylint)
            .analyze(&FileSnapshot::new("src/main.py", "def main():\n    return 1\n"))
            .await
            .unwrap();

        assert_eq!(result.path, "src/main.py");
        assert_eq!(result.functions[0].complexity, 4);
        assert_eq!(result.halstead.effort, 18.75);
        assert_eq!(result.lint.messages()[0].message_id, "C0114");
    }

    #[tokio::test]
    #[ignore = "requires radon and pylint installed"]
    async fn test_real_tools() {
        let runner = MetricsRunner::new(AnalysisConfig::default());
        let code = r#"
def classify(n):
    if n < 0:
        return "negative"
    elif n == 0:
        return "zero"
    return "positive"


class Counter:
    def __init__(self):
        self.count = 0

    def bump(self, by=1):
        for _ in range(by):
            self.count += 1
"#;
        let result = runner
            .analyze(&FileSnapshot::new("pkg/demo.py", code))
            .await
            .unwrap();

        let classify = result.functions.iter().find(|f| f.name == "classify").unwrap();
        assert_eq!(classify.complexity, 3);
        assert!(result.functions.iter().any(|f| f.name == "Counter.bump"));
        assert!(result.halstead.volume > 0.0);
        assert!(matches!(result.lint, LintOutcome::Messages(_)));
    }
}
