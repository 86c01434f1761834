// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Short-lived response cache.
//!
//! ```text
//! CacheKey::Branches{repo}        "branches:{owner}:{repo}"
//! CacheKey::Tree{repo, branch}    "tree:{owner}:{repo}:{branch}"
//! CacheKey::Repositories          "repos"
//!
//! get(key)  hit && age < ttl  --> value
//!           stale             --> dropped, None
//! invalidate_touching(repo, branch)
//!           Branches{repo}         always
//!           Tree{repo, branch}     same branch only
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::types::{Branch, Repository, RepositoryRef, TreeEntry};

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Structured request identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Branches { repo: RepositoryRef },
    Tree { repo: RepositoryRef, branch: String },
    Repositories,
}

impl CacheKey {
    #[must_use]
    pub fn branches(repo: &RepositoryRef) -> Self {
        Self::Branches { repo: repo.clone() }
    }

    #[must_use]
    pub fn tree(repo: &RepositoryRef, branch: &str) -> Self {
        Self::Tree {
            repo: repo.clone(),
            branch: branch.to_string(),
        }
    }

    /// Whether a change to `branch` of `repo` makes this entry outdated.
    #[must_use]
    pub fn touches(&self, repo: &RepositoryRef, branch: &str) -> bool {
        match self {
            Self::Branches { repo: r } => r == repo,
            Self::Tree { repo: r, branch: b } => r == repo && b == branch,
            Self::Repositories => false,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branches { repo } => write!(f, "branches:{}:{}", repo.owner(), repo.name()),
            Self::Tree { repo, branch } => {
                write!(f, "tree:{}:{}:{branch}", repo.owner(), repo.name())
            }
            Self::Repositories => f.write_str("repos"),
        }
    }
}

/// Cached payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    Branches(Vec<Branch>),
    Tree(Vec<TreeEntry>),
    Repositories(Vec<Repository>),
}

#[derive(Debug)]
struct CacheEntry {
    value: CachedValue,
    stored_at: Instant,
}

/// Response cache owned by the client.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::default(),
            ttl,
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fresh value for `key`; stale entries are removed.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        let mut entries = self.lock();
        let fresh = entries
            .get(key)
            .map(|entry| entry.stored_at.elapsed() < self.ttl)?;
        if fresh {
            entries.get(key).map(|entry| entry.value.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    pub fn insert(&self, key: CacheKey, value: CachedValue) {
        self.lock().insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Remove one entry; returns whether it existed.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Remove every entry a change to `branch` of `repo` affects.
    pub fn invalidate_touching(&self, repo: &RepositoryRef, branch: &str) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.touches(repo, branch));
        before - entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
