use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{RepolyzeError, Result};

/// Owner/name pair addressing a hosted repository.
///
/// Accepts `owner/name`, `github.com/owner/name` and full
/// `https://github.com/owner/name(.git)` URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoIdentifier {
    owner: String,
    name: String,
}

impl RepoIdentifier {
    pub fn new(owner: &str, name: &str) -> Result<Self> {
        let input = format!("{}/{}", owner, name);
        validate_segment(owner, &input, "owner")?;
        validate_segment(name, &input, "name")?;
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| RepolyzeError::InvalidIdentifier {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty identifier"));
        }

        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);

        let path = match without_scheme
            .strip_prefix("www.github.com/")
            .or_else(|| without_scheme.strip_prefix("github.com/"))
        {
            Some(rest) => rest,
            None if without_scheme.contains("://") || without_scheme.starts_with("www.") => {
                return Err(invalid("only github.com URLs are supported"));
            }
            None if without_scheme != trimmed => {
                return Err(invalid("only github.com URLs are supported"));
            }
            None => without_scheme,
        };

        let path = path.trim_end_matches('/');
        let mut parts = path.split('/');
        let owner = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        if parts.next().is_some() {
            return Err(invalid("expected exactly owner/name"));
        }
        let name = name.strip_suffix(".git").unwrap_or(name);

        validate_segment(owner, input, "owner")?;
        validate_segment(name, input, "name")?;

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

fn validate_segment(segment: &str, input: &str, label: &str) -> Result<()> {
    let invalid = |reason: String| RepolyzeError::InvalidIdentifier {
        input: input.to_string(),
        reason,
    };

    if segment.is_empty() {
        return Err(invalid(format!("missing {}", label)));
    }
    if segment == "." || segment == ".." {
        return Err(invalid(format!("{} cannot be '{}'", label, segment)));
    }
    if let Some(bad) = segment
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid(format!("invalid character '{}' in {}", bad, label)));
    }
    Ok(())
}

impl fmt::Display for RepoIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoIdentifier {
    type Err = RepolyzeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Kind of an entry in a repository directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One entry of a repository directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: u64,
}

impl ContentEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Lowercased extension of the entry name, if any
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

/// File entries accepted by `wanted`, in listing order, first occurrence per path
pub fn unique_files<'e>(
    entries: &'e [ContentEntry],
    mut wanted: impl FnMut(&ContentEntry) -> bool,
) -> impl Iterator<Item = &'e ContentEntry> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(move |e| e.is_file() && wanted(e) && seen.insert(e.path.as_str()))
}

/// Repository metadata plus its top-level listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub repo: RepoIdentifier,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub default_branch: String,
    pub contents: Vec<ContentEntry>,
}

impl RepositoryInfo {
    /// Top-level file entries (directories excluded)
    pub fn files(&self) -> impl Iterator<Item = &ContentEntry> {
        self.contents.iter().filter(|e| e.is_file())
    }
}

/// Immutable capture of one file's content at fetch time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSnapshot {
    pub path: String,
    pub content: String,
    pub size: u64,
    pub sha: String,
    pub fetched_at: DateTime<Utc>,
}

impl FileSnapshot {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            size: content.len() as u64,
            content,
            sha: String::new(),
            fetched_at: Utc::now(),
        }
    }

    /// Final path component
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(self.file_name())
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}
