//! radon: cyclomatic complexity and Halstead metrics
//!
//! Both subcommands emit a JSON object keyed by file name. A file radon
//! could not process maps to `{"error": "..."}` instead of results.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use super::tool::run_tool;
use crate::types::{FunctionComplexity, HalsteadMetrics, RepolyzeError, Result};

/// `radon cc -j -s <file>`
pub async fn cyclomatic_complexity(
    radon: &str,
    file_name: &str,
    cwd: &Path,
    limit: Duration,
    subject: &str,
) -> Result<Vec<FunctionComplexity>> {
    let output = run_tool(radon, &["cc", "-j", "-s", file_name], cwd, limit, subject).await?;
    if !output.success() {
        return Err(RepolyzeError::analysis(
            subject,
            format!("radon cc failed: {}", output.stderr_tail()),
        ));
    }
    parse_cc(&output.stdout, subject)
}

/// `radon hal -j <file>`
pub async fn halstead(
    radon: &str,
    file_name: &str,
    cwd: &Path,
    limit: Duration,
    subject: &str,
) -> Result<HalsteadMetrics> {
    let output = run_tool(radon, &["hal", "-j", file_name], cwd, limit, subject).await?;
    if !output.success() {
        return Err(RepolyzeError::analysis(
            subject,
            format!("radon hal failed: {}", output.stderr_tail()),
        ));
    }
    parse_hal(&output.stdout, subject)
}

// =============================================================================
// Parsing
// =============================================================================

#[derive(Debug, Deserialize)]
struct CcBlock {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    #[serde(default)]
    classname: Option<String>,
    #[serde(default)]
    lineno: u32,
    complexity: u32,
    #[serde(default)]
    rank: String,
}

/// Payload for the single file radon was given
fn file_payload(stdout: &str, subject: &str) -> Result<Value> {
    let report: BTreeMap<String, Value> = serde_json::from_str(stdout.trim()).map_err(|e| {
        RepolyzeError::analysis(subject, format!("unreadable radon output: {}", e))
    })?;

    let payload = report
        .into_values()
        .next()
        .ok_or_else(|| RepolyzeError::analysis(subject, "radon produced no results"))?;

    if let Some(error) = payload.get("error").and_then(Value::as_str) {
        return Err(RepolyzeError::analysis(
            subject,
            format!("radon could not parse file: {}", error),
        ));
    }
    Ok(payload)
}

/// Flat list of functions, classes and methods; methods are named `Class.method`
pub fn parse_cc(stdout: &str, subject: &str) -> Result<Vec<FunctionComplexity>> {
    let payload = file_payload(stdout, subject)?;
    let blocks: Vec<CcBlock> = serde_json::from_value(payload).map_err(|e| {
        RepolyzeError::analysis(subject, format!("unexpected radon cc output: {}", e))
    })?;

    Ok(blocks
        .into_iter()
        .map(|b| FunctionComplexity {
            name: match b.classname {
                Some(class) if b.kind == "method" => format!("{}.{}", class, b.name),
                _ => b.name,
            },
            kind: b.kind,
            line: b.lineno,
            complexity: b.complexity,
            rank: b.rank,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HalTotal {
    Named {
        #[serde(default)]
        volume: f64,
        #[serde(default)]
        difficulty: f64,
        #[serde(default)]
        effort: f64,
        #[serde(default)]
        bugs: f64,
        #[serde(default)]
        time: f64,
    },
    /// Older radon releases emit the report as a positional list:
    /// h1, h2, N1, N2, vocabulary, length, calculated_length, volume,
    /// difficulty, effort, time, bugs
    Positional(Vec<f64>),
}

/// File-level Halstead totals
pub fn parse_hal(stdout: &str, subject: &str) -> Result<HalsteadMetrics> {
    let payload = file_payload(stdout, subject)?;
    let total = payload
        .get("total")
        .cloned()
        .ok_or_else(|| RepolyzeError::analysis(subject, "radon hal output has no total"))?;

    let total: HalTotal = serde_json::from_value(total).map_err(|e| {
        RepolyzeError::analysis(subject, format!("unexpected radon hal output: {}", e))
    })?;

    Ok(match total {
        HalTotal::Named {
            volume,
            difficulty,
            effort,
            bugs,
            time,
        } => HalsteadMetrics {
            volume,
            difficulty,
            effort,
            bugs,
            time,
        },
        HalTotal::Positional(values) => {
            let at = |i: usize| values.get(i).copied().unwrap_or_default();
            HalsteadMetrics {
                volume: at(7),
                difficulty: at(8),
                effort: at(9),
                time: at(10),
                bugs: at(11),
            }
        }
    })
}
