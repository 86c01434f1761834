// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Domain and wire types of the hosting API.
//!
//! # Key Types
//!
//! | Type              | Purpose                                  |
//! |-------------------|------------------------------------------|
//! | `RepositoryRef`   | `owner/name` of the active repository    |
//! | `Branch`          | branch listing entry                     |
//! | `TreeEntry`       | one path of a recursive tree snapshot    |
//! | `FileContent`     | decoded file text with its blob sha      |
//! | `FileChange`      | one file of a multi-file commit          |
//! | `RateLimitStatus` | advisory quota, `Unknown` on failure     |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PadError, ValidationError};

/// Identifies a repository as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryRef {
    type Err = PadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidRepository(s.to_string());
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        let valid = |part: &str| {
            !part.is_empty() && !part.contains(['/', ':']) && !part.chars().any(char::is_whitespace)
        };
        if valid(owner) && valid(name) {
            Ok(Self::new(owner, name))
        } else {
            Err(invalid().into())
        }
    }
}

/// Branch as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub sha: String,
    pub protected: bool,
}

/// Kind of object a tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Tree,
    Blob,
    /// Submodule pointer.
    Commit,
}

/// One path of a recursive tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub sha: String,
    /// Blob size in bytes; absent for trees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl TreeEntry {
    /// Last path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Decoded file text at a ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub path: String,
    pub content: String,
    pub sha: String,
    pub size: u64,
}

/// New content of one file in a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub content: String,
}

impl FileChange {
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Repository listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub default_branch: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Branch comparison summary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comparison {
    /// `ahead`, `behind`, `diverged` or `identical`.
    pub status: String,
    pub ahead_by: u64,
    pub behind_by: u64,
    pub total_commits: u64,
}

/// Core API request quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset_at: DateTime<Utc>,
}

/// Advisory quota; lookups never fail, they degrade to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitStatus {
    Known(RateLimit),
    Unknown,
}

impl fmt::Display for RateLimitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(rate) => write!(
                f,
                "{}/{} requests left, resets {}",
                rate.remaining,
                rate.limit,
                rate.reset_at.format("%H:%M:%S UTC")
            ),
            Self::Unknown => f.write_str("rate limit unknown"),
        }
    }
}

// --- wire formats ---

#[derive(Debug, Deserialize)]
pub(crate) struct RepoResponse {
    pub default_branch: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BranchResponse {
    pub name: String,
    pub commit: ShaObject,
    #[serde(default)]
    pub protected: bool,
}

impl From<BranchResponse> for Branch {
    fn from(wire: BranchResponse) -> Self {
        Self {
            name: wire.name,
            sha: wire.commit.sha,
            protected: wire.protected,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShaObject {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefResponse {
    pub object: ShaObject,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitCommitResponse {
    pub sha: String,
    pub tree: ShaObject,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TreeResponse {
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    pub path: String,
    pub sha: String,
    pub size: u64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RateLimitResponse {
    pub rate: RateWire,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RateWire {
    pub limit: u64,
    pub remaining: u64,
    pub reset: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewTreeEntry<'a> {
    pub path: &'a str,
    pub mode: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub sha: &'a str,
}
