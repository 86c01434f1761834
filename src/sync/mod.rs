// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit/sync engine for the active repository and branch.
//!
//! ```text
//!            save() first record
//!   Clean  ----------------------->  PendingEdits { count }
//!     ^                                    |
//!     +------- commit_all(msg) ok ---------+
//!
//!   commit_all   PendingEdits only; one commit_files call for every record
//!   pull         Clean only, else UncommittedChanges with zero requests
//!   push         Clean only; reports AlreadyPushed, no request
//!   switch       PendingEdits needs confirmed = true
//! ```
//!
//! The state is read from the store on every call, so it always reflects the
//! records the tracker has saved.

use std::fmt;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::edit::EditTracker;
use crate::error::{PadError, PadResult, PrerequisiteError, ValidationError};
use crate::github::{
    Branch, Comparison, FileChange, FileContent, RateLimitStatus, RemoteRepository, RepositoryRef,
    TreeEntry,
};
use crate::session::{EventSink, Operation, SessionEvent};
use crate::store::{FileEditRecord, Storage};


/// Characters and sequences git refuses in a branch name.
const INVALID_REF_PATTERN: &str =
    r"[\x00-\x20\x7f~^:?*\[\\]|\.\.|@\{|//|(^|/)\.|\.lock(/|$)|^-|^/|/$|\.$|^@$";

/// Active repository and branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    repo: RepositoryRef,
    branch: String,
}

impl Workspace {
    #[must_use]
    pub fn new(repo: RepositoryRef, branch: impl Into<String>) -> Self {
        Self {
            repo,
            branch: branch.into(),
        }
    }

    #[must_use]
    pub const fn repo(&self) -> &RepositoryRef {
        &self.repo
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.repo, self.branch)
    }
}

/// Sync relationship of the workspace with the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Clean,
    PendingEdits { count: usize },
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str("clean"),
            Self::PendingEdits { count } => write!(f, "{count} file(s) with saved changes"),
        }
    }
}

/// Result of `push`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStatus {
    /// Every commit is already on the remote.
    AlreadyPushed,
}

/// What a successful `commit_all` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub commit: String,
    pub paths: Vec<String>,
}

/// Check `name` against git's ref-name rules.
///
/// # Errors
///
/// `EmptyBranchName` or `InvalidBranchName`.
pub fn validate_branch_name(name: &str) -> PadResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyBranchName.into());
    }
    let invalid = || ValidationError::InvalidBranchName(name.to_string());
    let pattern = Regex::new(INVALID_REF_PATTERN).map_err(|_| invalid())?;
    if pattern.is_match(name) {
        return Err(invalid().into());
    }
    Ok(())
}

/// Reconciles saved edits with the remote branch.
#[derive(Debug)]
pub struct SyncEngine<R> {
    remote: R,
    storage: Storage,
    events: EventSink,
}

impl<R: RemoteRepository> SyncEngine<R> {
    #[must_use]
    pub const fn new(remote: R, storage: Storage, events: EventSink) -> Self {
        Self {
            remote,
            storage,
            events,
        }
    }

    #[must_use]
    pub const fn remote(&self) -> &R {
        &self.remote
    }

    #[must_use]
    pub const fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub const fn events(&self) -> &EventSink {
        &self.events
    }

    /// # Errors
    ///
    /// Returns a `StorageError` if the records cannot be listed.
    pub fn state(&self, ws: &Workspace) -> PadResult<SyncState> {
        Ok(match self.storage.edit_record_count(&ws.repo)? {
            0 => SyncState::Clean,
            count => SyncState::PendingEdits { count },
        })
    }

    /// Saved edits of the workspace repository, ordered by path.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the records cannot be read.
    pub fn pending(&self, ws: &Workspace) -> PadResult<Vec<FileEditRecord>> {
        self.storage.edit_records(&ws.repo)
    }

    fn require_clean(&self, ws: &Workspace) -> PadResult<()> {
        match self.state(ws)? {
            SyncState::Clean => Ok(()),
            SyncState::PendingEdits { count } => {
                Err(PrerequisiteError::UncommittedChanges { count }.into())
            }
        }
    }

    /// Commit every saved edit as one commit on the workspace branch.
    ///
    /// On failure no record is touched. On success every committed record is
    /// removed and the open file, if it was part of the commit, advances.
    ///
    /// # Errors
    ///
    /// `EmptyCommitMessage`, `NothingToCommit`, `CommitFailed` from the remote,
    /// or a `StorageError` if the records cannot be read or cleared.
    pub async fn commit_all(
        &self,
        ws: &Workspace,
        message: &str,
        tracker: &mut EditTracker,
    ) -> PadResult<CommitSummary> {
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyCommitMessage.into());
        }
        let records = self.pending(ws)?;
        if records.is_empty() {
            return Err(ValidationError::NothingToCommit.into());
        }

        let files: Vec<FileChange> = records
            .iter()
            .map(|record| FileChange::new(&record.path, &record.content))
            .collect();

        let commit = {
            let _loading = self.events.loading(Operation::Commit);
            self.remote
                .commit_files(&ws.repo, &ws.branch, &files, message)
                .await?
        };
        info!(workspace = %ws, %commit, files = files.len(), "commit_all succeeded");

        let mut cleanup: PadResult<()> = Ok(());
        for record in &records {
            let mut result = self.storage.delete_edit_record(&ws.repo, &record.path);
            if tracker.is_open_at(&ws.repo, &record.path) {
                if tracker.live_content() == Some(record.content.as_str()) {
                    result = result.and(tracker.mark_committed());
                } else {
                    debug!(path = %record.path, "buffer changed after save");
                    tracker.advance_original(&record.content);
                }
            }
            if let Err(err) = result {
                warn!(path = %record.path, error = %err, "committed edit not cleared");
                if cleanup.is_ok() {
                    cleanup = Err(err);
                }
            }
        }
        cleanup?;

        Ok(CommitSummary {
            commit,
            paths: records.into_iter().map(|record| record.path).collect(),
        })
    }

    /// Refetch the workspace tree.
    ///
    /// # Errors
    ///
    /// `UncommittedChanges` without any request while edits are pending, or
    /// the remote error.
    pub async fn pull(&self, ws: &Workspace) -> PadResult<Vec<TreeEntry>> {
        self.require_clean(ws)?;
        let _loading = self.events.loading(Operation::Pull);
        let entries = self.remote.refresh_tree(&ws.repo, &ws.branch).await?;
        debug!(workspace = %ws, entries = entries.len(), "pulled");
        Ok(entries)
    }

    /// Commits reach the remote immediately, so a clean workspace is pushed.
    ///
    /// # Errors
    ///
    /// `UncommittedChanges` while edits are pending.
    pub fn push(&self, ws: &Workspace) -> PadResult<PushStatus> {
        self.require_clean(ws)?;
        Ok(PushStatus::AlreadyPushed)
    }

    /// Make `name` the active branch; returns `false` if it already was.
    ///
    /// Saved edits are not branch-scoped and follow the switch, which is why
    /// pending edits require `confirmed`.
    ///
    /// # Errors
    ///
    /// `EmptyBranchName`, `UnconfirmedBranchSwitch`, `NotFound` if the branch
    /// does not exist remotely, or a storage/remote error.
    pub async fn switch_branch(
        &self,
        ws: &mut Workspace,
        name: &str,
        confirmed: bool,
    ) -> PadResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyBranchName.into());
        }
        if name == ws.branch {
            return Ok(false);
        }
        if let SyncState::PendingEdits { count } = self.state(ws)?
            && !confirmed
        {
            return Err(PrerequisiteError::UnconfirmedBranchSwitch {
                target: name.to_string(),
                count,
            }
            .into());
        }

        {
            let _loading = self.events.loading(Operation::SwitchBranch);
            let branches = self.remote.branches(&ws.repo).await?;
            if !branches.iter().any(|b| b.name == name) {
                return Err(PadError::not_found(format!(
                    "branch '{name}' in {}",
                    ws.repo
                )));
            }
        }

        info!(repo = %ws.repo, from = %ws.branch, to = name, "switched branch");
        name.clone_into(&mut ws.branch);
        self.storage.set_last_branch(&ws.repo, &ws.branch)?;
        Ok(true)
    }

    /// Create `name` from `from` (default: the workspace branch) without
    /// switching to it.
    ///
    /// # Errors
    ///
    /// A branch-name validation error, `Conflict` if it exists, `NotFound`
    /// if `from` does not.
    pub async fn create_branch(
        &self,
        ws: &Workspace,
        name: &str,
        from: Option<&str>,
    ) -> PadResult<()> {
        validate_branch_name(name)?;
        let from = from.unwrap_or(ws.branch.as_str());
        let _loading = self.events.loading(Operation::CreateBranch);
        self.remote.create_branch(&ws.repo, name, from).await
    }

    /// Branches of the workspace repository.
    ///
    /// # Errors
    ///
    /// The remote error.
    pub async fn branches(&self, ws: &Workspace) -> PadResult<Vec<Branch>> {
        let _loading = self.events.loading(Operation::Branches);
        self.remote.branches(&ws.repo).await
    }

    /// Tree of the workspace branch, from the cache when fresh.
    ///
    /// # Errors
    ///
    /// The remote error.
    pub async fn tree(&self, ws: &Workspace) -> PadResult<Vec<TreeEntry>> {
        let _loading = self.events.loading(Operation::Tree);
        self.remote.tree(&ws.repo, &ws.branch).await
    }

    /// Committed content of `path` on the workspace branch.
    ///
    /// # Errors
    ///
    /// `NotFound` if the file is absent, or the remote error.
    pub async fn file_content(&self, ws: &Workspace, path: &str) -> PadResult<FileContent> {
        let _loading = self.events.loading(Operation::FileContent);
        self.remote.file_content(&ws.repo, path, &ws.branch).await
    }

    /// How the workspace branch relates to `base`.
    ///
    /// # Errors
    ///
    /// `NotFound` if either branch is missing, or the remote error.
    pub async fn compare(&self, ws: &Workspace, base: &str) -> PadResult<Comparison> {
        let _loading = self.events.loading(Operation::Compare);
        self.remote.compare(&ws.repo, base, &ws.branch).await
    }

    /// Query the quota and publish it as a [`SessionEvent::RateLimit`].
    pub async fn refresh_rate_limit(&self) -> RateLimitStatus {
        let status = {
            let _loading = self.events.loading(Operation::RateLimit);
            self.remote.rate_limit().await
        };
        self.events.emit(SessionEvent::RateLimit(status));
        status
    }
}
