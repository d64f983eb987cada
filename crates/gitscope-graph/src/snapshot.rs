//! Repository snapshot: the immutable input to a graph build.
//!
//! A snapshot is read from the JSON document produced by the repository
//! scanner (`repository_info`, `branches`, `safety_audit`). Only `branches`
//! drives the graph; `repository_info` is kept for display and
//! `safety_audit` is ignored.
//!
//! Parsing is lenient at the document level: a missing, `null`, or
//! non-list `branches` field yields an empty snapshot ("no data yet"), and
//! individual malformed branches are skipped with a warning so that one
//! bad entry cannot blank the whole graph.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from reading a repository document.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The document is not valid JSON at all.
    #[error("repository document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Commit / Branch
// ---------------------------------------------------------------------------

/// A single commit as it appears in one branch's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash. Unique within a branch, may recur across branches.
    pub hash: String,
    /// Hash of the preceding commit. `None` marks the branch root.
    ///
    /// `null`, a missing field, and `""` all read as `None`.
    #[serde(
        default,
        deserialize_with = "de_parent",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<String>,
    #[serde(default, deserialize_with = "de_display_string")]
    pub message: String,
    #[serde(default, deserialize_with = "de_display_string")]
    pub author: String,
    #[serde(default, deserialize_with = "de_display_string")]
    pub date: String,
}

impl Commit {
    /// A root commit with empty display fields.
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            parent: None,
            message: String::new(),
            author: String::new(),
            date: String::new(),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        self.parent = (!parent.is_empty()).then_some(parent);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>, date: impl Into<String>) -> Self {
        self.author = author.into();
        self.date = date.into();
        self
    }
}

/// A named branch with its commits, oldest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    /// Head hash as exported by the scanner. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

impl Branch {
    pub fn new(name: impl Into<String>, commits: Vec<Commit>) -> Self {
        Self {
            name: name.into(),
            head: None,
            commits,
        }
    }
}

// ---------------------------------------------------------------------------
// Repository info
// ---------------------------------------------------------------------------

/// Descriptive repository metadata. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub license: Option<String>,
    pub default_branch: Option<String>,
    pub stars: Option<u64>,
    pub forks: Option<u64>,
    pub watchers: Option<u64>,
}

impl RepositoryInfo {
    /// One-line summary, e.g. `gitscope (Rust) ★12 ⑂3`.
    pub fn headline(&self) -> String {
        let mut out = self.name.clone().unwrap_or_else(|| "repository".to_owned());
        if let Some(lang) = self.language.as_deref().filter(|l| !l.is_empty()) {
            out.push_str(&format!(" ({lang})"));
        }
        if let Some(stars) = self.stars {
            out.push_str(&format!(" ★{stars}"));
        }
        if let Some(forks) = self.forks {
            out.push_str(&format!(" ⑂{forks}"));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// An immutable repository snapshot for one render cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    info: Option<RepositoryInfo>,
    branches: Vec<Branch>,
}

impl Snapshot {
    /// Snapshot from already-typed branches (no metadata).
    pub const fn from_branches(branches: Vec<Branch>) -> Self {
        Self {
            info: None,
            branches,
        }
    }

    /// Parse a repository document.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if `text` is not valid JSON. A valid
    /// document with a missing or malformed `branches` field is *not* an
    /// error; it yields an empty snapshot.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    /// Read a snapshot out of an arbitrary JSON value, skipping whatever
    /// cannot be understood.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut doc) = value else {
            tracing::warn!(kind = value_kind(&value), "repository document is not an object");
            return Self::default();
        };

        let info = doc
            .remove("repository_info")
            .filter(|v| !v.is_null())
            .and_then(|v| match serde_json::from_value::<RepositoryInfo>(v) {
                Ok(info) => Some(info),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed repository_info");
                    None
                }
            });

        let branches = match doc.remove("branches") {
            Some(Value::Array(items)) => read_branches(items),
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                tracing::warn!(kind = value_kind(&other), "`branches` is not a list, treating as empty");
                Vec::new()
            }
        };

        Self { info, branches }
    }

    pub const fn info(&self) -> Option<&RepositoryInfo> {
        self.info.as_ref()
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// `true` when there is nothing to draw.
    pub const fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn commit_count(&self) -> usize {
        self.branches.iter().map(|b| b.commits.len()).sum()
    }
}

fn read_branches(items: Vec<Value>) -> Vec<Branch> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut branches = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let branch = match serde_json::from_value::<Branch>(item) {
            Ok(branch) => branch,
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed branch");
                continue;
            }
        };
        if !seen.insert(branch.name.clone()) {
            tracing::warn!(branch = %branch.name, "skipping duplicate branch name");
            continue;
        }
        branches.push(branch);
    }
    branches
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn de_parent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let parent = Option::<String>::deserialize(deserializer)?;
    Ok(parent.filter(|p| !p.is_empty()))
}

fn de_display_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
