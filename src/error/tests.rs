// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{
    CommitError, CommitStep, NetworkError, PadError, PadResult, PrerequisiteError, StorageError,
    ValidationError,
};

#[test]
fn test_pad_error_size() {
    // Box<str> variants (NotFound, Conflict) are 16 bytes (fat pointer)
    // With discriminant + alignment = 24 bytes
    let size = std::mem::size_of::<PadError>();
    assert!(size <= 24, "PadError is {size} bytes, expected <= 24");
}

#[test]
fn test_pad_result_size() {
    let size = std::mem::size_of::<PadResult<()>>();
    assert!(size <= 24, "PadResult<()> is {size} bytes, expected <= 24");
}

#[test]
fn test_prerequisite_message() {
    let err: PadError = PrerequisiteError::UncommittedChanges { count: 2 }.into();
    insta::assert_snapshot!(
        err.to_string(),
        @"uncommitted changes present (2 file(s)); commit or discard them first"
    );
}

#[test]
fn test_commit_error_names_step() {
    let inner: PadError = NetworkError::HttpError {
        status: 422,
        url: "repos/o/r/git/trees".to_string(),
        message: "tree.sha is invalid".to_string(),
    }
    .into();
    let err: PadError = CommitError::new(CommitStep::CreateTree, inner).into();
    insta::assert_snapshot!(
        err.to_string(),
        @"commit failed: create tree: network error: http error 422: repos/o/r/git/trees (tree.sha is invalid)"
    );
}

#[test]
fn test_http_error_without_body() {
    let err = NetworkError::HttpError {
        status: 500,
        url: "rate_limit".to_string(),
        message: String::new(),
    };
    assert_eq!(err.to_string(), "http error 500: rate_limit");
    assert_eq!(err.status(), Some(500));
}

#[test]
fn test_http_status_only_for_network_errors() {
    let network: PadError = NetworkError::HttpError {
        status: 404,
        url: "x".to_string(),
        message: String::new(),
    }
    .into();
    assert_eq!(network.http_status(), Some(404));
    assert_eq!(PadError::not_found("x").http_status(), None);
}

#[test]
fn test_validation_messages() {
    let messages: Vec<String> = [
        ValidationError::EmptyCommitMessage,
        ValidationError::NothingToCommit,
        ValidationError::FileTooLarge {
            path: "big.txt".to_string(),
            size: 1_048_577,
            limit: 1_048_576,
        },
    ]
    .into_iter()
    .map(|e| PadError::from(e).to_string())
    .collect();

    insta::assert_snapshot!(messages.join("\n"), @r"
    commit message must not be empty
    there are no saved changes to commit
    'big.txt' is too large to edit (1048577 bytes, limit 1048576)
    ");
}

#[test]
fn test_storage_quota_message() {
    let err: PadError = StorageError::QuotaExceeded {
        key: "gitpad:edit:o/r:a.cs".to_string(),
        needed: 120,
        limit: 100,
    }
    .into();
    assert!(err.to_string().starts_with("storage error: quota exceeded"));
}
