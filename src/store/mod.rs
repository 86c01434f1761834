// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scoped persistent key-value storage.
//!
//! ```text
//!  Storage (typed, namespaced)
//!     |  StoreKey -> "{ns}:edit:{owner}/{repo}:{path}"
//!     v
//!  dyn KvStore ──> MemoryStore (tests, quota)
//!              └─> FileStore   (one JSON document, atomic rewrite)
//!
//! Keys
//!   {ns}:token                       credential
//!   {ns}:user                        cached profile
//!   {ns}:active-repo                 last selected repository
//!   {ns}:pinned:{owner}/{repo}       ordered path list
//!   {ns}:branch:{owner}/{repo}       last used branch
//!   {ns}:edit:{owner}/{repo}:{path}  FileEditRecord
//! ```
//!
//! Reads are synchronous, so a record written by `save` is visible to the very
//! next `commit_all`.

pub mod file;
pub mod memory;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::Credential;
use crate::error::{PadResult, StorageError};
use crate::github::{RepositoryRef, User};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Raw string key-value backend.
///
/// Implementations use interior mutability so one backend can be shared
/// between the tracker and the sync engine.
pub trait KvStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> PadResult<Option<String>>;

    /// Insert or overwrite a value.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the write fails or exceeds the quota.
    fn set(&self, key: &str, value: &str) -> PadResult<()>;

    /// Remove a value; removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be written.
    fn delete(&self, key: &str) -> PadResult<()>;

    /// List keys starting with `prefix`, in key order.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    fn keys(&self, prefix: &str) -> PadResult<Vec<String>>;
}

/// A saved, not yet committed edit of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEditRecord {
    pub path: String,
    pub content: String,
    pub saved_at: DateTime<Utc>,
}

impl FileEditRecord {
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            saved_at: Utc::now(),
        }
    }
}

/// Structured identity of a stored value.
#[derive(Debug, Clone, Copy)]
enum StoreKey<'a> {
    Token,
    User,
    ActiveRepo,
    Pinned(&'a RepositoryRef),
    LastBranch(&'a RepositoryRef),
    Edit(&'a RepositoryRef, &'a str),
    EditPrefix(&'a RepositoryRef),
}

impl fmt::Display for StoreKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => f.write_str("token"),
            Self::User => f.write_str("user"),
            Self::ActiveRepo => f.write_str("active-repo"),
            Self::Pinned(repo) => write!(f, "pinned:{repo}"),
            Self::LastBranch(repo) => write!(f, "branch:{repo}"),
            Self::Edit(repo, path) => write!(f, "edit:{repo}:{path}"),
            Self::EditPrefix(repo) => write!(f, "edit:{repo}:"),
        }
    }
}

/// Namespaced, typed view over a [`KvStore`].
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KvStore>,
    namespace: String,
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl Storage {
    #[must_use]
    pub fn new(backend: Arc<dyn KvStore>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    /// Storage over a fresh in-memory backend.
    #[must_use]
    pub fn in_memory(namespace: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryStore::new()), namespace)
    }

    fn key(&self, key: StoreKey<'_>) -> String {
        format!("{}:{key}", self.namespace)
    }

    fn get_json<T: DeserializeOwned>(&self, key: StoreKey<'_>) -> PadResult<Option<T>> {
        let key = self.key(key);
        let Some(raw) = self.backend.get(&key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Serialize { key, source }.into())
    }

    fn set_json<T: Serialize>(&self, key: StoreKey<'_>, value: &T) -> PadResult<()> {
        let key = self.key(key);
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.clone(),
            source,
        })?;
        self.backend.set(&key, &raw)
    }

    fn delete(&self, key: StoreKey<'_>) -> PadResult<()> {
        self.backend.delete(&self.key(key))
    }

    // --- credential and profile ---

    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    pub fn credential(&self) -> PadResult<Option<Credential>> {
        Ok(self
            .backend
            .get(&self.key(StoreKey::Token))?
            .map(Credential::new))
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the write fails.
    pub fn set_credential(&self, credential: &Credential) -> PadResult<()> {
        self.backend
            .set(&self.key(StoreKey::Token), credential.expose())
    }

    /// Forget the credential and the cached profile.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be written.
    pub fn clear_credential(&self) -> PadResult<()> {
        self.delete(StoreKey::Token)?;
        self.delete(StoreKey::User)
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read or the value is corrupt.
    pub fn user_profile(&self) -> PadResult<Option<User>> {
        self.get_json(StoreKey::User)
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the write fails.
    pub fn set_user_profile(&self, user: &User) -> PadResult<()> {
        self.set_json(StoreKey::User, user)
    }

    // --- repository selection ---

    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read or the value is corrupt.
    pub fn active_repository(&self) -> PadResult<Option<RepositoryRef>> {
        self.get_json(StoreKey::ActiveRepo)
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the write fails.
    pub fn set_active_repository(&self, repo: &RepositoryRef) -> PadResult<()> {
        self.set_json(StoreKey::ActiveRepo, repo)
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    pub fn last_branch(&self, repo: &RepositoryRef) -> PadResult<Option<String>> {
        self.backend.get(&self.key(StoreKey::LastBranch(repo)))
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the write fails.
    pub fn set_last_branch(&self, repo: &RepositoryRef, branch: &str) -> PadResult<()> {
        self.backend.set(&self.key(StoreKey::LastBranch(repo)), branch)
    }

    // --- pinned files ---

    /// Pinned paths in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read or the value is corrupt.
    pub fn pinned_files(&self, repo: &RepositoryRef) -> PadResult<Vec<String>> {
        Ok(self
            .get_json(StoreKey::Pinned(repo))?
            .unwrap_or_default())
    }

    /// Append `path`; returns `false` if it was already pinned.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the list cannot be read or written.
    pub fn pin(&self, repo: &RepositoryRef, path: &str) -> PadResult<bool> {
        let mut pinned = self.pinned_files(repo)?;
        if pinned.iter().any(|p| p == path) {
            return Ok(false);
        }
        pinned.push(path.to_string());
        self.set_json(StoreKey::Pinned(repo), &pinned)?;
        Ok(true)
    }

    /// Remove `path`; returns `false` if it was not pinned.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the list cannot be read or written.
    pub fn unpin(&self, repo: &RepositoryRef, path: &str) -> PadResult<bool> {
        let mut pinned = self.pinned_files(repo)?;
        let before = pinned.len();
        pinned.retain(|p| p != path);
        if pinned.len() == before {
            return Ok(false);
        }
        if pinned.is_empty() {
            self.delete(StoreKey::Pinned(repo))?;
        } else {
            self.set_json(StoreKey::Pinned(repo), &pinned)?;
        }
        Ok(true)
    }

    // --- edit records ---

    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read or the value is corrupt.
    pub fn edit_record(&self, repo: &RepositoryRef, path: &str) -> PadResult<Option<FileEditRecord>> {
        self.get_json(StoreKey::Edit(repo, path))
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the write fails.
    pub fn save_edit_record(&self, repo: &RepositoryRef, record: &FileEditRecord) -> PadResult<()> {
        self.set_json(StoreKey::Edit(repo, &record.path), record)
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be written.
    pub fn delete_edit_record(&self, repo: &RepositoryRef, path: &str) -> PadResult<()> {
        self.delete(StoreKey::Edit(repo, path))
    }

    /// Every pending record of `repo`, ordered by path.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read or a record is corrupt.
    pub fn edit_records(&self, repo: &RepositoryRef) -> PadResult<Vec<FileEditRecord>> {
        let prefix = self.key(StoreKey::EditPrefix(repo));
        let mut records = Vec::new();
        for key in self.backend.keys(&prefix)? {
            let Some(raw) = self.backend.get(&key)? else {
                continue;
            };
            let record: FileEditRecord = serde_json::from_str(&raw)
                .map_err(|source| StorageError::Serialize { key, source })?;
            records.push(record);
        }
        records.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(records)
    }

    /// Number of pending records of `repo`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    pub fn edit_record_count(&self, repo: &RepositoryRef) -> PadResult<usize> {
        Ok(self
            .backend
            .keys(&self.key(StoreKey::EditPrefix(repo)))?
            .len())
    }
}
