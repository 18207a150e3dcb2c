//! pylint: lint messages
//!
//! pylint's exit status is a bit mask (1 fatal, 2 error, 4 warning,
//! 8 refactor, 16 convention, 32 usage error). Any combination of the lower
//! bits just means messages were emitted.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use super::tool::run_tool;
use crate::constants::PYLINT_USAGE_ERROR;
use crate::types::{LintMessage, LintOutcome};

/// `pylint --output-format=json --score=n <file>`
///
/// Never fails: problems running pylint become `LintOutcome::Unavailable`.
pub async fn lint(
    pylint: &str,
    file_name: &str,
    cwd: &Path,
    limit: Duration,
    subject: &str,
) -> LintOutcome {
    let output = match run_tool(
        pylint,
        &["--output-format=json", "--score=n", file_name],
        cwd,
        limit,
        subject,
    )
    .await
    {
        Ok(output) => output,
        Err(e) => {
            warn!("Lint unavailable for {}: {}", subject, e);
            return LintOutcome::Unavailable(e.to_string());
        }
    };

    let outcome = interpret(output.code, &output.stdout, output.stderr_tail());
    if let LintOutcome::Unavailable(reason) = &outcome {
        warn!("Lint unavailable for {}: {}", subject, reason);
    }
    outcome
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    symbol: String,
    #[serde(rename = "message-id", default)]
    message_id: String,
    message: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    column: Option<u32>,
}

/// Map a finished pylint run onto a lint outcome
pub fn interpret(code: Option<i32>, stdout: &str, stderr_tail: &str) -> LintOutcome {
    let Some(code) = code else {
        return LintOutcome::Unavailable("pylint was terminated by a signal".to_string());
    };

    if code & PYLINT_USAGE_ERROR != 0 {
        return LintOutcome::Unavailable(format!("pylint usage error: {}", stderr_tail));
    }

    let stdout = stdout.trim();
    if stdout.is_empty() {
        return LintOutcome::Messages(Vec::new());
    }

    match serde_json::from_str::<Vec<RawMessage>>(stdout) {
        Ok(raw) => LintOutcome::Messages(
            raw.into_iter()
                .map(|m| LintMessage {
                    kind: m.kind,
                    symbol: m.symbol,
                    message_id: m.message_id,
                    message: m.message,
                    line: m.line.unwrap_or_default(),
                    column: m.column.unwrap_or_default(),
                })
                .collect(),
        ),
        Err(e) => LintOutcome::Unavailable(format!("unreadable pylint output: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const OUTPUT: &str = r#"[
        {"type": "convention", "module": "app", "obj": "", "line": 1, "column": 0,
         "endLine": null, "endColumn": null, "path": "app.py",
         "symbol": "missing-module-docstring", "message": "Missing module docstring",
         "message-id": "C0114"},
        {"type": "warning", "module": "app", "obj": "main", "line": 4, "column": 4,
         "endLine": 4, "endColumn": 10, "path": "app.py",
         "symbol": "unused-variable", "message": "Unused variable 'result'",
         "message-id": "W0612"}
    ]"#;

    #[test]
    fn test_messages_with_bitmask_exit() {
        // 4 | 16: warnings and conventions were emitted
        let outcome = interpret(Some(20), OUTPUT, "");
        let messages = outcome.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].symbol, "unused-variable");
        assert_eq!(messages[1].message_id, "W0612");
        assert_eq!(
            messages[1].to_string(),
            "4:4: W0612 (unused-variable) Unused variable 'result'"
        );
    }

    #[test]
    fn test_clean_file() {
        assert_eq!(interpret(Some(0), "[]", ""), LintOutcome::Messages(vec![]));
        assert_eq!(interpret(Some(0), "", ""), LintOutcome::Messages(vec![]));
    }

    #[test]
    fn test_usage_error_is_unavailable() {
        let outcome = interpret(Some(32), "", "pylint: error: unrecognized arguments");
        match outcome {
            LintOutcome::Unavailable(reason) => assert!(reason.contains("unrecognized")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_output_is_unavailable() {
        assert!(matches!(
            interpret(Some(2), "************* Module app", ""),
            LintOutcome::Unavailable(_)
        ));
        assert!(matches!(interpret(None, OUTPUT, ""), LintOutcome::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_pylint_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = lint(
            "repolyze-no-such-pylint",
            "app.py",
            dir.path(),
            Duration::from_secs(5),
            "app.py",
        )
        .await;
        match outcome {
            LintOutcome::Unavailable(reason) => assert!(reason.contains("tool not installed")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
