// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Multi-file commit through the git object API.
//!
//! ```text
//! validate    message, non-empty list, unique paths   (no network)
//!    |
//!    v
//! ResolveRef    GET   git/ref/heads/{branch}       --> head sha
//! ReadParent    GET   git/commits/{head}           --> base tree sha
//! CreateBlob    POST  git/blobs      x N (concurrent)
//! CreateTree    POST  git/trees      base_tree + N entries
//! CreateCommit  POST  git/commits    parents = [head]
//! UpdateRef     PATCH git/refs/heads/{branch}  force = false
//!    |
//!    v
//! invalidate_touching(repo, branch)
//! ```
//!
//! Only `UpdateRef` is visible to other clients. A failure at any earlier
//! step leaves unreferenced objects on the server and the branch untouched.
//! A non-forced update fails if someone else moved the branch meanwhile.

use std::collections::HashSet;

use futures_util::future::try_join_all;
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, info};

use super::client::GitHubClient;
use super::content::encode_content;
use super::types::{FileChange, GitCommitResponse, NewTreeEntry, RepositoryRef, ShaObject};
use crate::error::{CommitError, CommitStep, PadResult, ValidationError};

const FILE_MODE: &str = "100644";

#[derive(Serialize)]
struct NewBlob<'a> {
    content: String,
    encoding: &'a str,
}

#[derive(Serialize)]
struct NewTree<'a> {
    base_tree: &'a str,
    tree: Vec<NewTreeEntry<'a>>,
}

#[derive(Serialize)]
struct NewCommit<'a> {
    message: &'a str,
    tree: &'a str,
    parents: [&'a str; 1],
}

#[derive(Serialize)]
struct RefUpdate<'a> {
    sha: &'a str,
    force: bool,
}

/// Reject input before any request is made.
///
/// # Errors
///
/// `EmptyCommitMessage`, `NothingToCommit` or `DuplicatePath`.
pub(crate) fn validate_commit(files: &[FileChange], message: &str) -> PadResult<()> {
    if message.trim().is_empty() {
        return Err(ValidationError::EmptyCommitMessage.into());
    }
    if files.is_empty() {
        return Err(ValidationError::NothingToCommit.into());
    }
    let mut seen = HashSet::with_capacity(files.len());
    for file in files {
        if !seen.insert(file.path.as_str()) {
            return Err(ValidationError::DuplicatePath(file.path.clone()).into());
        }
    }
    Ok(())
}

/// Tag a step failure with the step it happened in.
trait AtStep<T> {
    fn at(self, step: CommitStep) -> PadResult<T>;
}

impl<T> AtStep<T> for PadResult<T> {
    fn at(self, step: CommitStep) -> PadResult<T> {
        self.map_err(|source| CommitError::new(step, source).into())
    }
}

impl GitHubClient {
    pub(super) async fn run_commit(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        files: &[FileChange],
        message: &str,
    ) -> PadResult<String> {
        validate_commit(files, message)?;

        let head = self
            .resolve_ref(repo, branch)
            .await
            .at(CommitStep::ResolveRef)?;

        let base_tree = self.base_tree(repo, &head).await.at(CommitStep::ReadParent)?;

        let blobs = try_join_all(files.iter().map(|file| self.create_blob(repo, file)))
            .await
            .at(CommitStep::CreateBlob)?;
        debug!(%repo, branch, blobs = blobs.len(), "created blobs");

        let entries = files
            .iter()
            .zip(&blobs)
            .map(|(file, sha)| NewTreeEntry {
                path: &file.path,
                mode: FILE_MODE,
                kind: "blob",
                sha,
            })
            .collect();
        let tree: ShaObject = self
            .send_json(
                Method::POST,
                self.repo_endpoint(repo, &["git", "trees"])?,
                &NewTree {
                    base_tree: &base_tree,
                    tree: entries,
                },
                "new tree",
            )
            .await
            .at(CommitStep::CreateTree)?;

        let commit: ShaObject = self
            .send_json(
                Method::POST,
                self.repo_endpoint(repo, &["git", "commits"])?,
                &NewCommit {
                    message,
                    tree: &tree.sha,
                    parents: [&head],
                },
                "new commit",
            )
            .await
            .at(CommitStep::CreateCommit)?;

        let _: serde_json::Value = self
            .send_json(
                Method::PATCH,
                self.repo_endpoint(repo, &["git", "refs", "heads", branch])?,
                &RefUpdate {
                    sha: &commit.sha,
                    force: false,
                },
                &format!("branch '{branch}' in {repo}"),
            )
            .await
            .at(CommitStep::UpdateRef)?;

        self.cache().invalidate_touching(repo, branch);
        info!(%repo, branch, sha = %commit.sha, files = files.len(), "committed");
        Ok(commit.sha)
    }

    async fn base_tree(&self, repo: &RepositoryRef, head: &str) -> PadResult<String> {
        let url = self.repo_endpoint(repo, &["git", "commits", head])?;
        let parent: GitCommitResponse = self.get_json(url, &format!("commit {head}")).await?;
        debug!(%repo, commit = %parent.sha, tree = %parent.tree.sha, "read parent");
        Ok(parent.tree.sha)
    }

    async fn create_blob(&self, repo: &RepositoryRef, file: &FileChange) -> PadResult<String> {
        let url = self.repo_endpoint(repo, &["git", "blobs"])?;
        let blob: ShaObject = self
            .send_json(
                Method::POST,
                url,
                &NewBlob {
                    content: encode_content(&file.content),
                    encoding: "base64",
                },
                &format!("blob for '{}'", file.path),
            )
            .await?;
        Ok(blob.sha)
    }
}
