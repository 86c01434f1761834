// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::time::Duration;

use super::cache::{CacheKey, CachedValue, ResponseCache};
use super::commit::validate_commit;
use super::content::{self, FileClassifier, decode_content, encode_content};
use super::tree::{TreeNode, build_hierarchy, find};
use super::types::{Branch, EntryKind, FileChange, RepositoryRef, TreeEntry};
use super::{GitHubClient, RemoteRepository};
use crate::auth::Credential;
use crate::error::{PadError, ValidationError};

fn repo() -> RepositoryRef {
    RepositoryRef::new("octo", "game")
}

fn entry(path: &str, kind: EntryKind) -> TreeEntry {
    TreeEntry {
        path: path.to_string(),
        kind,
        sha: format!("sha-{path}"),
        size: matches!(kind, EntryKind::Blob).then_some(10),
    }
}

// --- content ---

#[test]
fn test_decode_wrapped_base64() {
    // the API wraps at 60 columns
    let encoded = "dXNpbmcgVW5pdHlFbmdpbmU7CnB1YmxpYyBjbGFzcyBQbGF5ZXIgOiBNb25v\nQmVoYXZpb3VyIHt9Cg==\n";
    assert_eq!(
        decode_content(encoded).unwrap(),
        "using UnityEngine;\npublic class Player : MonoBehaviour {}\n"
    );
    assert_eq!(decode_content(&encode_content("héllo")).unwrap(), "héllo");
}

#[test]
fn test_decode_rejects_non_utf8() {
    // 0xff 0xfe
    let err = decode_content("//4=").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"network error: failed to decode file content: not valid UTF-8 text");
}

#[test]
fn test_binary_and_size_rules() {
    assert!(content::is_binary("Assets/Textures/hero.PNG"));
    assert!(content::is_binary("Builds/game.exe"));
    assert!(!content::is_binary("Scripts/Player.cs"));
    assert!(!content::is_binary("Makefile"));

    assert!(!content::is_too_large(content::MAX_FILE_SIZE));
    assert!(content::is_too_large(content::MAX_FILE_SIZE + 1));
}

#[test]
fn test_classifier_from_config_values() {
    let classifier = FileClassifier::new([".PSD", "bin"], 100);
    assert!(classifier.is_binary("art/cover.psd"));
    assert!(classifier.is_binary("data.bin"));
    assert!(!classifier.is_binary("hero.png"));
    assert!(classifier.is_too_large(101));
    assert!(!classifier.is_too_large(100));
    assert_eq!(classifier.max_file_size(), 100);
}

#[test]
fn test_client_uses_configured_classifier() {
    let client = GitHubClient::new("https://api.github.com", Credential::new("t"))
        .unwrap()
        .with_classifier(FileClassifier::new(["cs"], 5));
    assert!(client.is_binary("Scripts/Player.cs"));
    assert!(!client.is_binary("hero.png"));
    assert!(client.is_too_large(6));
    assert_eq!(client.max_file_size(), 5);
}

// --- cache ---

#[test]
fn test_cache_key_strings() {
    assert_eq!(CacheKey::branches(&repo()).to_string(), "branches:octo:game");
    assert_eq!(
        CacheKey::tree(&repo(), "main").to_string(),
        "tree:octo:game:main"
    );
    assert_eq!(CacheKey::Repositories.to_string(), "repos");
}

#[test]
fn test_cache_hit_and_expiry() {
    let cache = ResponseCache::new(Duration::from_secs(60));
    let key = CacheKey::tree(&repo(), "main");
    let entries = vec![entry("README.md", EntryKind::Blob)];

    assert!(cache.get(&key).is_none());
    cache.insert(key.clone(), CachedValue::Tree(entries.clone()));
    assert_eq!(cache.get(&key), Some(CachedValue::Tree(entries)));

    let expired = ResponseCache::new(Duration::ZERO);
    expired.insert(key.clone(), CachedValue::Tree(Vec::new()));
    assert!(expired.get(&key).is_none());
    assert!(expired.is_empty());
}

#[test]
fn test_invalidate_touching_scope() {
    let cache = ResponseCache::default();
    let other_repo = RepositoryRef::new("octo", "docs");
    let branch = Branch {
        name: "main".to_string(),
        sha: "abc".to_string(),
        protected: false,
    };

    cache.insert(CacheKey::branches(&repo()), CachedValue::Branches(vec![branch]));
    cache.insert(CacheKey::tree(&repo(), "main"), CachedValue::Tree(Vec::new()));
    cache.insert(CacheKey::tree(&repo(), "develop"), CachedValue::Tree(Vec::new()));
    cache.insert(CacheKey::tree(&other_repo, "main"), CachedValue::Tree(Vec::new()));
    cache.insert(CacheKey::Repositories, CachedValue::Repositories(Vec::new()));

    assert_eq!(cache.invalidate_touching(&repo(), "main"), 2);
    assert_eq!(cache.len(), 3);
    assert!(cache.get(&CacheKey::tree(&repo(), "develop")).is_some());
    assert!(cache.get(&CacheKey::tree(&other_repo, "main")).is_some());
    assert!(cache.get(&CacheKey::Repositories).is_some());

    assert!(cache.invalidate(&CacheKey::Repositories));
    assert!(!cache.invalidate(&CacheKey::Repositories));
}

// --- tree ---

#[test]
fn test_build_hierarchy_orders_dirs_first() {
    let entries = vec![
        entry("README.md", EntryKind::Blob),
        entry("Scripts", EntryKind::Tree),
        entry("Scripts/Player.cs", EntryKind::Blob),
        entry("Assets/Textures/hero.png", EntryKind::Blob),
        entry("vendor/lib", EntryKind::Commit),
        entry("Empty", EntryKind::Tree),
    ];

    let nodes = build_hierarchy(&entries);
    let top: Vec<_> = nodes.iter().map(|n| (n.name(), n.is_dir())).collect();
    assert_eq!(
        top,
        vec![
            ("Assets", true),
            ("Empty", true),
            ("Scripts", true),
            ("README.md", false),
        ]
    );

    match find(&nodes, "Assets/Textures/hero.png") {
        Some(TreeNode::File { path, sha, size, .. }) => {
            assert_eq!(path, "Assets/Textures/hero.png");
            assert_eq!(sha, "sha-Assets/Textures/hero.png");
            assert_eq!(*size, 10);
        }
        other => panic!("unexpected node: {other:?}"),
    }
    assert!(find(&nodes, "Assets/Textures").is_some_and(TreeNode::is_dir));
    assert!(find(&nodes, "Scripts/Missing.cs").is_none());
    assert!(find(&nodes, "README.md/child").is_none());
}

#[test]
fn test_tree_entry_name() {
    assert_eq!(entry("Scripts/Player.cs", EntryKind::Blob).name(), "Player.cs");
    assert_eq!(entry("README.md", EntryKind::Blob).name(), "README.md");
}

// --- repository refs ---

#[test]
fn test_repository_ref_parse() {
    let parsed: RepositoryRef = "octo/game".parse().unwrap();
    assert_eq!(parsed, repo());
    assert_eq!(parsed.to_string(), "octo/game");

    for bad in ["octo", "/game", "octo/", "octo/ga me", "a/b/c", "a:b/c"] {
        let err = bad.parse::<RepositoryRef>().unwrap_err();
        assert!(
            matches!(err, PadError::Validation(ref e) if matches!(**e, ValidationError::InvalidRepository(_))),
            "{bad} should be rejected"
        );
    }
}

// --- commit validation ---

#[test]
fn test_validate_commit_input() {
    let files = vec![FileChange::new("a.txt", "1"), FileChange::new("b.txt", "2")];
    assert!(validate_commit(&files, "update").is_ok());

    let err = validate_commit(&files, "   ").unwrap_err();
    assert_eq!(err.to_string(), "commit message must not be empty");

    let err = validate_commit(&[], "update").unwrap_err();
    assert_eq!(err.to_string(), "there are no saved changes to commit");

    let dup = vec![FileChange::new("a.txt", "1"), FileChange::new("a.txt", "2")];
    let err = validate_commit(&dup, "update").unwrap_err();
    assert_eq!(err.to_string(), "'a.txt' is listed twice in one commit");
}

#[test]
fn test_client_rejects_bad_base_url() {
    assert!(GitHubClient::new("not a url", Credential::new("t")).is_err());
    assert!(GitHubClient::new("mailto:someone@example.com", Credential::new("t")).is_err());
}
