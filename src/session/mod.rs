// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session context.
//!
//! ```text
//! Session::start(remote, storage, events, &credential)   after login
//! Session::resume(storage, events, connect)              persisted credential
//!        |
//!        v
//! Session<R> { engine: SyncEngine<R>, tracker: EditTracker, workspace }
//!        |
//!        +-- select_repository(repo)  last branch, else default branch
//!        +-- open_file / tracker_mut  edit state of one file
//!        +-- commit / pull / push / switch_branch / create_branch
//!        +-- pin / unpin / pinned
//!        |
//!        v
//! logout(self)   credential + profile removed, edit records kept
//! ```

pub mod events;


use tracing::{debug, info};

use crate::auth::Credential;
use crate::edit::{EditTracker, OpenFile};
use crate::error::{PadResult, PrerequisiteError, ValidationError};
use crate::github::tree::{self, TreeNode};
use crate::github::{
    Branch, Comparison, RateLimitStatus, RemoteRepository, Repository, RepositoryRef, TreeEntry,
    User,
};
use crate::store::{FileEditRecord, Storage};
use crate::sync::{CommitSummary, PushStatus, SyncEngine, SyncState, Workspace};

pub use events::{EventSink, LoadingGuard, Operation, SessionEvent};

fn require(workspace: Option<&Workspace>) -> PadResult<&Workspace> {
    workspace.ok_or_else(|| ValidationError::NoRepository.into())
}

/// Everything one authenticated user works with.
#[derive(Debug)]
pub struct Session<R> {
    engine: SyncEngine<R>,
    tracker: EditTracker,
    workspace: Option<Workspace>,
}

impl<R: RemoteRepository> Session<R> {
    fn new(remote: R, storage: Storage, events: EventSink) -> Self {
        Self {
            tracker: EditTracker::new(storage.clone(), events.clone()),
            engine: SyncEngine::new(remote, storage, events),
            workspace: None,
        }
    }

    /// Begin a session for a freshly obtained credential and persist it.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the credential cannot be stored.
    pub fn start(
        remote: R,
        storage: Storage,
        events: EventSink,
        credential: &Credential,
    ) -> PadResult<Self> {
        storage.set_credential(credential)?;
        info!("session started");
        Ok(Self::new(remote, storage, events))
    }

    /// Resume with the persisted credential; `connect` builds the remote.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a stored credential, or the error of
    /// `connect`.
    pub fn resume<F>(storage: Storage, events: EventSink, connect: F) -> PadResult<Self>
    where
        F: FnOnce(Credential) -> PadResult<R>,
    {
        let credential = storage
            .credential()?
            .ok_or(PrerequisiteError::NotAuthenticated)?;
        let remote = connect(credential)?;
        debug!("session resumed");
        Ok(Self::new(remote, storage, events))
    }

    #[must_use]
    pub const fn engine(&self) -> &SyncEngine<R> {
        &self.engine
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        self.engine.storage()
    }

    #[must_use]
    pub const fn tracker(&self) -> &EditTracker {
        &self.tracker
    }

    pub const fn tracker_mut(&mut self) -> &mut EditTracker {
        &mut self.tracker
    }

    #[must_use]
    pub const fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    // --- repository selection ---

    /// Make `repo` active on its last used branch, or its default branch.
    ///
    /// # Errors
    ///
    /// `NotFound` if the repository does not exist, or a storage error.
    pub async fn select_repository(&mut self, repo: RepositoryRef) -> PadResult<&Workspace> {
        let branch = match self.storage().last_branch(&repo)? {
            Some(branch) => branch,
            None => {
                let _loading = self.engine.events().loading(Operation::Branches);
                self.engine.remote().default_branch(&repo).await?
            }
        };

        self.tracker.close();
        self.storage().set_active_repository(&repo)?;
        self.storage().set_last_branch(&repo, &branch)?;
        info!(%repo, %branch, "repository selected");
        Ok(self.workspace.insert(Workspace::new(repo, branch)))
    }

    /// Reselect the persisted active repository, if any.
    ///
    /// # Errors
    ///
    /// Same as [`Session::select_repository`].
    pub async fn restore_workspace(&mut self) -> PadResult<Option<&Workspace>> {
        match self.storage().active_repository()? {
            Some(repo) => self.select_repository(repo).await.map(Some),
            None => Ok(None),
        }
    }

    /// Repositories the user can access.
    ///
    /// # Errors
    ///
    /// The remote error.
    pub async fn repositories(&self) -> PadResult<Vec<Repository>> {
        let _loading = self.engine.events().loading(Operation::Repositories);
        self.engine.remote().repositories().await
    }

    // --- browsing and editing ---

    /// Directory hierarchy of the active branch.
    ///
    /// # Errors
    ///
    /// `NoRepository`, or the remote error.
    pub async fn tree(&self) -> PadResult<Vec<TreeNode>> {
        let ws = require(self.workspace.as_ref())?;
        let entries = self.engine.tree(ws).await?;
        Ok(tree::build_hierarchy(&entries))
    }

    /// Flat listing of the active branch.
    ///
    /// # Errors
    ///
    /// `NoRepository`, or the remote error.
    pub async fn tree_entries(&self) -> PadResult<Vec<TreeEntry>> {
        let ws = require(self.workspace.as_ref())?;
        self.engine.tree(ws).await
    }

    /// Open `path` for editing, restoring its saved edit.
    ///
    /// # Errors
    ///
    /// `NoRepository`, `BinaryFile`, `FileTooLarge`, `NotFound`, or a storage
    /// error from restoring the record.
    pub async fn open_file(&mut self, path: &str) -> PadResult<&OpenFile> {
        let ws = require(self.workspace.as_ref())?;
        let remote = self.engine.remote();
        if remote.is_binary(path) {
            return Err(ValidationError::BinaryFile(path.to_string()).into());
        }

        let listed_size = self
            .engine
            .tree(ws)
            .await?
            .into_iter()
            .find(|entry| entry.path == path)
            .and_then(|entry| entry.size);
        let too_large = |size: u64| {
            ValidationError::FileTooLarge {
                path: path.to_string(),
                size,
                limit: remote.max_file_size(),
            }
        };
        if let Some(size) = listed_size
            && remote.is_too_large(size)
        {
            return Err(too_large(size).into());
        }

        let content = self.engine.file_content(ws, path).await?;
        if remote.is_too_large(content.size) {
            return Err(too_large(content.size).into());
        }

        self.tracker.open(ws.repo(), path, content.content)?;
        self.tracker
            .open_file()
            .ok_or_else(|| ValidationError::NoFileOpen.into())
    }

    // --- sync ---

    /// # Errors
    ///
    /// `NoRepository`, or a storage error.
    pub fn state(&self) -> PadResult<SyncState> {
        self.engine.state(require(self.workspace.as_ref())?)
    }

    /// # Errors
    ///
    /// `NoRepository`, or a storage error.
    pub fn pending(&self) -> PadResult<Vec<FileEditRecord>> {
        self.engine.pending(require(self.workspace.as_ref())?)
    }

    /// Commit every saved edit of the active repository.
    ///
    /// # Errors
    ///
    /// See [`SyncEngine::commit_all`].
    pub async fn commit(&mut self, message: &str) -> PadResult<CommitSummary> {
        let ws = require(self.workspace.as_ref())?;
        self.engine.commit_all(ws, message, &mut self.tracker).await
    }

    /// # Errors
    ///
    /// See [`SyncEngine::pull`].
    pub async fn pull(&self) -> PadResult<Vec<TreeEntry>> {
        self.engine.pull(require(self.workspace.as_ref())?).await
    }

    /// # Errors
    ///
    /// See [`SyncEngine::push`].
    pub fn push(&self) -> PadResult<PushStatus> {
        self.engine.push(require(self.workspace.as_ref())?)
    }

    /// Switch the active branch; the open file is closed on success.
    ///
    /// # Errors
    ///
    /// See [`SyncEngine::switch_branch`].
    pub async fn switch_branch(&mut self, name: &str, confirmed: bool) -> PadResult<bool> {
        let ws = self
            .workspace
            .as_mut()
            .ok_or(ValidationError::NoRepository)?;
        let switched = self.engine.switch_branch(ws, name, confirmed).await?;
        if switched {
            self.tracker.close();
        }
        Ok(switched)
    }

    /// # Errors
    ///
    /// See [`SyncEngine::create_branch`].
    pub async fn create_branch(&self, name: &str, from: Option<&str>) -> PadResult<()> {
        let ws = require(self.workspace.as_ref())?;
        self.engine.create_branch(ws, name, from).await
    }

    /// # Errors
    ///
    /// `NoRepository`, or the remote error.
    pub async fn branches(&self) -> PadResult<Vec<Branch>> {
        self.engine.branches(require(self.workspace.as_ref())?).await
    }

    /// # Errors
    ///
    /// `NoRepository`, or the remote error.
    pub async fn compare(&self, base: &str) -> PadResult<Comparison> {
        let ws = require(self.workspace.as_ref())?;
        self.engine.compare(ws, base).await
    }

    pub async fn rate_limit(&self) -> RateLimitStatus {
        self.engine.refresh_rate_limit().await
    }

    // --- pinned files ---

    /// # Errors
    ///
    /// `NoRepository`, or a storage error.
    pub fn pin(&self, path: &str) -> PadResult<bool> {
        let ws = require(self.workspace.as_ref())?;
        self.storage().pin(ws.repo(), path)
    }

    /// # Errors
    ///
    /// `NoRepository`, or a storage error.
    pub fn unpin(&self, path: &str) -> PadResult<bool> {
        let ws = require(self.workspace.as_ref())?;
        self.storage().unpin(ws.repo(), path)
    }

    /// # Errors
    ///
    /// `NoRepository`, or a storage error.
    pub fn pinned(&self) -> PadResult<Vec<String>> {
        let ws = require(self.workspace.as_ref())?;
        self.storage().pinned_files(ws.repo())
    }

    // --- identity ---

    /// Profile of the logged-in user, cached in the store after the first lookup.
    ///
    /// # Errors
    ///
    /// `Auth(InvalidCredential)` if the credential was revoked, or a
    /// storage/remote error.
    pub async fn current_user(&self) -> PadResult<User> {
        if let Some(user) = self.storage().user_profile()? {
            return Ok(user);
        }
        let user = {
            let _loading = self.engine.events().loading(Operation::Identity);
            self.engine.remote().current_user().await?
        };
        self.storage().set_user_profile(&user)?;
        Ok(user)
    }

    /// End the session; saved edits stay for the next login.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the credential cannot be removed.
    pub fn logout(mut self) -> PadResult<()> {
        self.tracker.close();
        self.storage().clear_credential()?;
        self.engine
            .events()
            .emit(SessionEvent::Notice("logged out".to_string()));
        info!("session ended");
        Ok(())
    }
}
