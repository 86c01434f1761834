// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote repository client.
//!
//! ```text
//! RemoteRepository (trait, async)
//!        |
//!        v
//! GitHubClient ──> ResponseCache   branches / tree / repos, 5 min TTL
//!        |
//!        +──> read:   default_branch, branches, tree, file_content,
//!        |            compare, current_user, repositories, rate_limit
//!        +──> write:  create_branch, commit_files (blob/tree/commit/ref)
//!        +──> pure:   is_binary, is_too_large
//! ```
//!
//! The sync engine only sees the trait, so tests can substitute an in-process
//! fake and count calls.

pub mod cache;
mod client;
mod commit;
pub mod content;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tests;

use std::future::Future;

use crate::error::PadResult;

pub use cache::{CacheKey, ResponseCache};
pub use client::GitHubClient;
pub use content::FileClassifier;
pub use types::{
    Branch, Comparison, EntryKind, FileChange, FileContent, RateLimit, RateLimitStatus,
    Repository, RepositoryRef, TreeEntry, User,
};

/// Operations the sync engine needs from the hosting service.
pub trait RemoteRepository: Send + Sync {
    /// Name of the repository's default branch.
    ///
    /// # Errors
    ///
    /// `NotFound` if the repository does not exist, `Network` otherwise.
    fn default_branch(&self, repo: &RepositoryRef)
    -> impl Future<Output = PadResult<String>> + Send;

    /// Branch list, read through the cache.
    ///
    /// # Errors
    ///
    /// `NotFound` if the repository does not exist, `Network` otherwise.
    fn branches(&self, repo: &RepositoryRef)
    -> impl Future<Output = PadResult<Vec<Branch>>> + Send;

    /// Flat recursive tree of `branch`, read through the cache.
    ///
    /// # Errors
    ///
    /// `NotFound` if the branch does not exist, `Network` otherwise.
    fn tree(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> impl Future<Output = PadResult<Vec<TreeEntry>>> + Send;

    /// Drop the cached tree of `branch` and fetch it again.
    ///
    /// # Errors
    ///
    /// Same as [`RemoteRepository::tree`].
    fn refresh_tree(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> impl Future<Output = PadResult<Vec<TreeEntry>>> + Send;

    /// Decoded text of `path` at `branch`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the file is absent at that ref, `Network` on transport
    /// or decode failure.
    fn file_content(
        &self,
        repo: &RepositoryRef,
        path: &str,
        branch: &str,
    ) -> impl Future<Output = PadResult<FileContent>> + Send;

    /// Create `new_name` pointing at the head of `from_branch`.
    ///
    /// # Errors
    ///
    /// `Conflict` if `new_name` exists, `NotFound` if `from_branch` does not.
    fn create_branch(
        &self,
        repo: &RepositoryRef,
        new_name: &str,
        from_branch: &str,
    ) -> impl Future<Output = PadResult<()>> + Send;

    /// Commit every file in one commit and fast-forward `branch`; returns
    /// the new commit sha.
    ///
    /// # Errors
    ///
    /// `Validation` for bad input, `CommitFailed` naming the failed step.
    fn commit_files(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        files: &[FileChange],
        message: &str,
    ) -> impl Future<Output = PadResult<String>> + Send;

    /// How far `head` is ahead of / behind `base`.
    ///
    /// # Errors
    ///
    /// `NotFound` if either ref is missing, `Network` otherwise.
    fn compare(
        &self,
        repo: &RepositoryRef,
        base: &str,
        head: &str,
    ) -> impl Future<Output = PadResult<Comparison>> + Send;

    /// Identity behind the credential.
    ///
    /// # Errors
    ///
    /// `Auth(InvalidCredential)` when the credential is rejected.
    fn current_user(&self) -> impl Future<Output = PadResult<User>> + Send;

    /// Repositories the user can access, read through the cache.
    ///
    /// # Errors
    ///
    /// `Network` on transport failure.
    fn repositories(&self) -> impl Future<Output = PadResult<Vec<Repository>>> + Send;

    /// Advisory request quota; never fails.
    fn rate_limit(&self) -> impl Future<Output = RateLimitStatus> + Send;

    /// Whether `path` names a binary file.
    fn is_binary(&self, path: &str) -> bool {
        content::is_binary(path)
    }

    /// Whether a file of `size` bytes is too large to edit.
    fn is_too_large(&self, size: u64) -> bool {
        content::is_too_large(size)
    }

    /// Size limit used by [`RemoteRepository::is_too_large`].
    fn max_file_size(&self) -> u64 {
        content::MAX_FILE_SIZE
    }
}
