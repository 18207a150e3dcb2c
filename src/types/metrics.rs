use serde::{Deserialize, Serialize};

/// Cyclomatic complexity of a single function, method or class block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionComplexity {
    pub name: String,
    /// "function", "method" or "class" as reported by radon
    pub kind: String,
    pub line: u32,
    pub complexity: u32,
    /// Letter rank A-F
    pub rank: String,
}

/// Halstead totals for a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HalsteadMetrics {
    pub volume: f64,
    pub difficulty: f64,
    pub effort: f64,
    pub bugs: f64,
    pub time: f64,
}

/// One lint finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintMessage {
    /// convention, refactor, warning, error, fatal
    pub kind: String,
    pub symbol: String,
    pub message_id: String,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for LintMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} ({}) {}",
            self.line, self.column, self.message_id, self.symbol, self.message
        )
    }
}

/// Lint results are best-effort: a linter failure must not sink the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum LintOutcome {
    Messages(Vec<LintMessage>),
    Unavailable(String),
}

impl Default for LintOutcome {
    fn default() -> Self {
        Self::Messages(Vec::new())
    }
}

impl LintOutcome {
    pub fn messages(&self) -> &[LintMessage] {
        match self {
            Self::Messages(m) => m,
            Self::Unavailable(_) => &[],
        }
    }
}

/// Structured static-analysis output for one file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    pub path: String,
    pub functions: Vec<FunctionComplexity>,
    pub halstead: HalsteadMetrics,
    pub lint: LintOutcome,
}

impl MetricsResult {
    pub fn empty(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn average_complexity(&self) -> f64 {
        if self.functions.is_empty() {
            return 0.0;
        }
        let total: u32 = self.functions.iter().map(|f| f.complexity).sum();
        total as f64 / self.functions.len() as f64
    }

    pub fn max_complexity(&self) -> Option<&FunctionComplexity> {
        self.functions.iter().max_by_key(|f| f.complexity)
    }
}

/// Result of analyzing one file during a repository run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum FileOutcome {
    Analyzed(MetricsResult),
    Skipped(String),
    Failed(String),
}

impl FileOutcome {
    pub fn metrics(&self) -> Option<&MetricsResult> {
        match self {
            Self::Analyzed(m) => Some(m),
            _ => None,
        }
    }
}
