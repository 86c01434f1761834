// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                  PadError (~24 bytes)
//!                         |
//!   +-------+------+------+------+------+------+------+-----+
//!   |       |      |      |      |      |      |      |     |
//!   v       v      v      v      v      v      v      v     v
//! Network NotFound Conflict Valid Prereq Commit Storage Auth Config
//!   Box   Box<str> Box<str> Box   Box    Box    Box    Box   Box
//!
//! Sub-errors (unboxed internally):
//!   Network      Reqwest, HttpError, InvalidUrl, Decode
//!   Validation   EmptyCommitMessage, NothingToCommit, EmptyBranchName, ...
//!   Prerequisite UncommittedChanges, UnconfirmedBranchSwitch, ...
//!   Commit       { step, source }
//!   Storage      Io, Serialize, QuotaExceeded
//!   Auth         Expired, Denied, InvalidCredential, Protocol
//! ```
//!
//! Every library operation resolves to exactly one of these; the `Display`
//! text is the message shown to the user.

use std::fmt;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`PadError`].
pub type PadResult<T> = std::result::Result<T, PadError>;

/// Top-level library error type.
///
/// All payloads are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum PadError {
    /// Transport failure or non-2xx answer from the hosting API.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Resource is absent at the requested ref.
    #[error("not found: {0}")]
    NotFound(Box<str>),

    /// Ref or branch already exists.
    #[error("conflict: {0}")]
    Conflict(Box<str>),

    /// Caller input rejected before any work was done.
    #[error("{0}")]
    Validation(#[from] Box<ValidationError>),

    /// Operation is not allowed in the current sync state.
    #[error("{0}")]
    Prerequisite(#[from] Box<PrerequisiteError>),

    /// A step of the object-graph commit protocol failed.
    #[error("commit failed: {0}")]
    CommitFailed(#[from] Box<CommitError>),

    /// Persistent store read or write failed.
    #[error("storage error: {0}")]
    Storage(#[from] Box<StorageError>),

    /// Authorization failed or the credential is no longer valid.
    #[error("auth error: {0}")]
    Auth(#[from] Box<AuthError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),
}

impl PadError {
    /// Create a [`PadError::NotFound`] for the named resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into().into_boxed_str())
    }

    /// Create a [`PadError::Conflict`] for the named resource.
    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict(what.into().into_boxed_str())
    }

    /// HTTP status carried by a network error, if any.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Network(err) => err.status(),
            _ => None,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for PadError {
                fn from(err: $error) -> Self {
                    PadError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    NetworkError => Network,
    ValidationError => Validation,
    PrerequisiteError => Prerequisite,
    CommitError => CommitFailed,
    StorageError => Storage,
    AuthError => Auth,
    ConfigError => Config,
}

// --- Network Errors ---

/// Hosting API transport errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Error from reqwest library.
    #[error("request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Non-success HTTP response.
    #[error("http error {status}: {url}{}", message_suffix(.message))]
    HttpError {
        status: u16,
        url: String,
        message: String,
    },

    /// Base URL or endpoint could not be built.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Response body could not be decoded.
    #[error("failed to decode {what}: {message}")]
    Decode { what: String, message: String },
}

impl NetworkError {
    /// HTTP status of the failed response, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => Some(*status),
            Self::Reqwest(err) => err.status().map(|s| s.as_u16()),
            Self::InvalidUrl(_) | Self::Decode { .. } => None,
        }
    }
}

fn message_suffix(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(" ({message})")
    }
}

// --- Validation Errors ---

/// Input rejected before touching the store or the network.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("commit message must not be empty")]
    EmptyCommitMessage,

    #[error("there are no saved changes to commit")]
    NothingToCommit,

    #[error("branch name must not be empty")]
    EmptyBranchName,

    #[error("'{0}' is not a valid branch name")]
    InvalidBranchName(String),

    #[error("'{0}' is listed twice in one commit")]
    DuplicatePath(String),

    #[error("no file is open")]
    NoFileOpen,

    #[error("no repository selected")]
    NoRepository,

    #[error("'{0}' is a binary file and cannot be edited")]
    BinaryFile(String),

    #[error("'{path}' is too large to edit ({size} bytes, limit {limit})")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    #[error("'{0}' is not in owner/name form")]
    InvalidRepository(String),
}

// --- Prerequisite Errors ---

/// Operation refused because of the current sync state.
#[derive(Debug, Error)]
pub enum PrerequisiteError {
    #[error("uncommitted changes present ({count} file(s)); commit or discard them first")]
    UncommittedChanges { count: usize },

    #[error(
        "switching to '{target}' with {count} uncommitted file(s) needs confirmation; \
         the edits will follow you to the new branch"
    )]
    UnconfirmedBranchSwitch { target: String, count: usize },

    #[error("not logged in")]
    NotAuthenticated,
}

// --- Commit Errors ---

/// Step of the blob/tree/commit/ref protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStep {
    ResolveRef,
    ReadParent,
    CreateBlob,
    CreateTree,
    CreateCommit,
    UpdateRef,
}

impl fmt::Display for CommitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ResolveRef => "resolve branch ref",
            Self::ReadParent => "read parent commit",
            Self::CreateBlob => "create blob",
            Self::CreateTree => "create tree",
            Self::CreateCommit => "create commit",
            Self::UpdateRef => "update branch ref",
        };
        f.write_str(name)
    }
}

/// Failure of one commit protocol step.
///
/// Only [`CommitStep::UpdateRef`] has a visible effect, so a failure at any
/// earlier step leaves the branch exactly as it was.
#[derive(Debug, Error)]
#[error("{step}: {source}")]
pub struct CommitError {
    pub step: CommitStep,
    #[source]
    pub source: PadError,
}

impl CommitError {
    #[must_use]
    pub const fn new(step: CommitStep, source: PadError) -> Self {
        Self { step, source }
    }
}

// --- Storage Errors ---

/// Persistent store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt value under '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("quota exceeded writing '{key}' ({needed} bytes needed, {limit} allowed)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },
}

// --- Auth Errors ---

/// Device-flow and credential errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("the device code expired before it was authorized")]
    Expired,

    #[error("authorization was denied")]
    Denied,

    #[error("the stored credential is no longer valid")]
    InvalidCredential,

    #[error("unexpected authorization response: {0}")]
    Protocol(String),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

#[cfg(test)]
mod tests;
