// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! State of the single open file.
//!
//! ```text
//!                    open(repo, path, original)
//!                               |
//!          live = saved record if one exists, else original
//!                               |
//!   update_live(s) ----> live = s
//!   save()         ----> record = live       (deleted if live == original)
//!   discard()      ----> record deleted, live = original
//!   mark_committed ----> original = live, record deleted
//!   close()        ----> session state cleared, record kept
//!
//!   dirty = live != original     DirtyChanged emitted only on a flip
//! ```

use tracing::{debug, warn};

use crate::error::{PadResult, ValidationError};
use crate::github::RepositoryRef;
use crate::session::{EventSink, SessionEvent};
use crate::store::{FileEditRecord, Storage};


/// Content views of the open file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFile {
    repo: RepositoryRef,
    path: String,
    original: String,
    live: String,
}

impl OpenFile {
    #[must_use]
    pub const fn repo(&self) -> &RepositoryRef {
        &self.repo
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last known committed content.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Current editor buffer.
    #[must_use]
    pub fn live(&self) -> &str {
        &self.live
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.live != self.original
    }
}

/// Tracks the open file and keeps its edit record in step.
#[derive(Debug)]
pub struct EditTracker {
    storage: Storage,
    events: EventSink,
    open: Option<OpenFile>,
    /// Last dirty value announced to the shell.
    announced: bool,
}

impl EditTracker {
    #[must_use]
    pub fn new(storage: Storage, events: EventSink) -> Self {
        Self {
            storage,
            events,
            open: None,
            announced: false,
        }
    }

    /// Open `path`, restoring a saved edit if one exists.
    ///
    /// Replaces any previously open file without touching its record.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the record lookup fails; the file is then
    /// open with its original content.
    pub fn open(
        &mut self,
        repo: &RepositoryRef,
        path: &str,
        original: impl Into<String>,
    ) -> PadResult<()> {
        let original = original.into();
        self.open = Some(OpenFile {
            repo: repo.clone(),
            path: path.to_string(),
            live: original.clone(),
            original,
        });

        let restored = self.storage.edit_record(repo, path);
        if let (Ok(Some(record)), Some(file)) = (&restored, self.open.as_mut()) {
            debug!(%repo, path, "restored saved edit");
            file.live.clone_from(&record.content);
        }
        self.announce();
        restored.map(|_| ())
    }

    /// Replace the live buffer.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NoFileOpen` if nothing is open.
    pub fn update_live(&mut self, content: impl Into<String>) -> PadResult<()> {
        let file = self.open.as_mut().ok_or(ValidationError::NoFileOpen)?;
        file.live = content.into();
        self.announce();
        Ok(())
    }

    /// Persist the live buffer as the file's edit record.
    ///
    /// Saving content equal to the original removes the record instead.
    ///
    /// # Errors
    ///
    /// `ValidationError::NoFileOpen`, or a `StorageError` from the store; the
    /// live buffer is kept either way.
    pub fn save(&mut self) -> PadResult<()> {
        let file = self.open.as_ref().ok_or(ValidationError::NoFileOpen)?;
        let result = if file.is_dirty() {
            self.storage
                .save_edit_record(&file.repo, &FileEditRecord::new(&file.path, &file.live))
        } else {
            self.storage.delete_edit_record(&file.repo, &file.path)
        };
        if let Err(err) = &result {
            warn!(path = %file.path, error = %err, "edit not persisted");
        } else {
            debug!(repo = %file.repo, path = %file.path, "saved edit");
        }
        result
    }

    /// Drop the saved edit and return to the original content.
    ///
    /// # Errors
    ///
    /// `ValidationError::NoFileOpen`, or a `StorageError` if the record cannot
    /// be deleted; the buffer is reset regardless.
    pub fn discard(&mut self) -> PadResult<()> {
        let file = self.open.as_mut().ok_or(ValidationError::NoFileOpen)?;
        file.live.clone_from(&file.original);
        let result = self.storage.delete_edit_record(&file.repo, &file.path);
        self.announce();
        result
    }

    /// Record that the live buffer is now the committed content.
    ///
    /// # Errors
    ///
    /// `ValidationError::NoFileOpen`, or a `StorageError` if the record cannot
    /// be deleted.
    pub fn mark_committed(&mut self) -> PadResult<()> {
        let file = self.open.as_mut().ok_or(ValidationError::NoFileOpen)?;
        file.original.clone_from(&file.live);
        let result = self.storage.delete_edit_record(&file.repo, &file.path);
        self.announce();
        result
    }

    /// Move the original to `committed` when the buffer changed after the
    /// last save; the record itself is cleared by the caller.
    pub(crate) fn advance_original(&mut self, committed: &str) {
        if let Some(file) = self.open.as_mut() {
            committed.clone_into(&mut file.original);
            self.announce();
        }
    }

    /// Forget the open file; its saved edit stays in the store.
    pub fn close(&mut self) {
        let Some(file) = self.open.take() else {
            return;
        };
        debug!(path = %file.path, "closed file");
        if self.announced {
            self.announced = false;
            self.events.emit(SessionEvent::DirtyChanged {
                path: file.path,
                dirty: false,
            });
        }
    }

    #[must_use]
    pub const fn open_file(&self) -> Option<&OpenFile> {
        self.open.as_ref()
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Whether the open file (in `repo`) is at `path`.
    #[must_use]
    pub fn is_open_at(&self, repo: &RepositoryRef, path: &str) -> bool {
        self.open
            .as_ref()
            .is_some_and(|file| &file.repo == repo && file.path == path)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.open.as_ref().is_some_and(OpenFile::is_dirty)
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.open.as_ref().map(OpenFile::path)
    }

    #[must_use]
    pub fn live_content(&self) -> Option<&str> {
        self.open.as_ref().map(OpenFile::live)
    }

    #[must_use]
    pub fn original_content(&self) -> Option<&str> {
        self.open.as_ref().map(OpenFile::original)
    }

    fn announce(&mut self) {
        let dirty = self.is_dirty();
        if dirty == self.announced {
            return;
        }
        self.announced = dirty;
        let path = self.path().unwrap_or_default().to_string();
        self.events.emit(SessionEvent::DirtyChanged { path, dirty });
    }
}
