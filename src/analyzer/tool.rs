//! External tool invocation

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::types::{RepolyzeError, Result};

/// Captured output of one tool run
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Last non-empty stderr line, for error messages
    pub fn stderr_tail(&self) -> &str {
        self.stderr
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("")
            .trim()
    }
}

/// Run `program args..` in `cwd`, killing it after `limit`
///
/// `subject` is the repository path being analyzed and ends up in errors.
pub async fn run_tool(
    program: &str,
    args: &[&str],
    cwd: &Path,
    limit: Duration,
    subject: &str,
) -> Result<ToolOutput> {
    debug!("Running {} {}", program, args.join(" "));

    let child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                RepolyzeError::analysis(subject, format!("tool not installed: {}", program))
            }
            _ => RepolyzeError::analysis(subject, format!("failed to start {}: {}", program, e)),
        })?;

    let output = timeout(limit, child.wait_with_output())
        .await
        .map_err(|_| {
            RepolyzeError::analysis(
                subject,
                format!("{} timed out after {}s", program, limit.as_secs()),
            )
        })?
        .map_err(|e| RepolyzeError::analysis(subject, format!("{} failed: {}", program, e)))?;

    Ok(ToolOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// First line of `program --version`, or `None` when it cannot run
pub async fn tool_version(program: &str) -> Option<String> {
    let mut cmd = Command::new(program);
    cmd.arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    match timeout(Duration::from_secs(10), cmd.output()).await {
        Ok(Ok(out)) if out.status.success() => String::from_utf8_lossy(&out.stdout)
            .lines()
            .next()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .or_else(|| Some("unknown version".to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorCategory;

    #[tokio::test]
    async fn test_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_tool(
            "repolyze-no-such-tool",
            &["--help"],
            dir.path(),
            Duration::from_secs(5),
            "app.py",
        )
        .await
        .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Analysis);
        assert!(err.to_string().contains("tool not installed"));
        assert!(err.to_string().contains("app.py"));
    }

    #[tokio::test]
    async fn test_missing_binary_has_no_version() {
        assert_eq!(tool_version("repolyze-no-such-tool").await, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_output_and_code() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_tool(
            "sh",
            &["-c", "echo out; echo err >&2; exit 3"],
            dir.path(),
            Duration::from_secs(5),
            "x.py",
        )
        .await
        .unwrap();

        assert_eq!(out.code, Some(3));
        assert!(!out.success());
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr_tail(), "err");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_tool() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_tool(
            "sh",
            &["-c", "sleep 5"],
            dir.path(),
            Duration::from_millis(200),
            "slow.py",
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("timed out"));
    }
}
