// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Notifications for the UI shell.
//!
//! ```text
//! EventSink::channel() --> (sink, flume::Receiver<SessionEvent>)
//!
//! tracker   DirtyChanged { path, dirty }   only when the flag flips
//! engine    LoadingStarted(op) ... LoadingFinished(op)   via LoadingGuard
//! engine    RateLimit(status)
//! session   Notice(text)
//! ```
//!
//! Sending never blocks and never fails; events for a dropped receiver are
//! discarded.

use std::fmt;

use flume::{Receiver, Sender};
use tracing::trace;

use crate::github::RateLimitStatus;

/// Network-backed operation, for loading indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Identity,
    Repositories,
    Branches,
    Tree,
    FileContent,
    Commit,
    Pull,
    SwitchBranch,
    CreateBranch,
    Compare,
    RateLimit,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "logging in",
            Self::Identity => "checking identity",
            Self::Repositories => "listing repositories",
            Self::Branches => "listing branches",
            Self::Tree => "loading tree",
            Self::FileContent => "loading file",
            Self::Commit => "committing",
            Self::Pull => "pulling",
            Self::SwitchBranch => "switching branch",
            Self::CreateBranch => "creating branch",
            Self::Compare => "comparing",
            Self::RateLimit => "checking rate limit",
        };
        f.write_str(name)
    }
}

/// Event delivered to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    DirtyChanged { path: String, dirty: bool },
    LoadingStarted(Operation),
    LoadingFinished(Operation),
    RateLimit(RateLimitStatus),
    Notice(String),
}

/// Cloneable sending side; a disabled sink drops everything.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<Sender<SessionEvent>>,
}

impl EventSink {
    #[must_use]
    pub fn channel() -> (Self, Receiver<SessionEvent>) {
        let (tx, rx) = flume::unbounded();
        (Self { tx: Some(tx) }, rx)
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.tx
            && let Err(flume::SendError(event)) = tx.send(event)
        {
            trace!(?event, "event receiver dropped");
        }
    }

    /// Emit `LoadingStarted(op)` now and `LoadingFinished(op)` when the guard drops.
    #[must_use = "dropping the guard ends the loading state immediately"]
    pub fn loading(&self, op: Operation) -> LoadingGuard {
        self.emit(SessionEvent::LoadingStarted(op));
        LoadingGuard {
            sink: self.clone(),
            op,
        }
    }
}

/// Ends a loading state on drop, on success and error paths alike.
#[derive(Debug)]
pub struct LoadingGuard {
    sink: EventSink,
    op: Operation,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.sink.emit(SessionEvent::LoadingFinished(self.op));
    }
}
