// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the hosting API client using wiremock.
//!
//! Covers:
//! - Response caching and invalidation after commits and branch creation
//! - Paged listings following `Link` headers
//! - The blob/tree/commit/ref commit protocol
//! - Error mapping (404, 401, 422 on branch creation)
//! - Rate limit lookups degrading to `Unknown`

use gitpad::auth::Credential;
use gitpad::error::{AuthError, CommitStep, PadError, ValidationError};
use gitpad::github::{FileChange, GitHubClient, RateLimitStatus, RemoteRepository, RepositoryRef};
use serde_json::json;
use wiremock::matchers::{
    body_json, body_partial_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "gho_test";

fn repo() -> RepositoryRef {
    RepositoryRef::new("octo", "game")
}

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(&server.uri(), Credential::new(TOKEN)).unwrap()
}

async fn mount_ref(server: &MockServer, branch: &str, sha: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/game/git/ref/heads/{branch}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": format!("refs/heads/{branch}"),
            "object": { "sha": sha, "type": "commit" }
        })))
        .expect(times)
        .mount(server)
        .await;
}

fn tree_body() -> serde_json::Value {
    json!({
        "sha": "t1",
        "truncated": false,
        "tree": [
            { "path": "Scripts", "type": "tree", "sha": "d1", "mode": "040000" },
            { "path": "Scripts/Player.cs", "type": "blob", "sha": "f1", "size": 12, "mode": "100644" },
            { "path": "README.md", "type": "blob", "sha": "f2", "size": 5, "mode": "100644" }
        ]
    })
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_tree_is_cached() {
    let server = MockServer::start().await;
    mount_ref(&server, "main", "c1", 1).await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/game/git/trees/c1"))
        .and(query_param("recursive", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tree_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let first = client.tree(&repo(), "main").await.unwrap();
    let second = client.tree(&repo(), "main").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert_eq!(first[1].size, Some(12));
}

#[tokio::test]
async fn test_refresh_tree_bypasses_cache() {
    let server = MockServer::start().await;
    mount_ref(&server, "main", "c1", 2).await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/game/git/trees/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tree_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    client.tree(&repo(), "main").await.unwrap();
    client.refresh_tree(&repo(), "main").await.unwrap();
}

fn branch_page(names: impl IntoIterator<Item = String>) -> serde_json::Value {
    names
        .into_iter()
        .map(|name| json!({ "name": name, "commit": { "sha": "c1" }, "protected": false }))
        .collect()
}

#[tokio::test]
async fn test_branches_cached_until_branch_created() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/game/branches"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(branch_page(["main".to_string()])),
        )
        .expect(2)
        .mount(&server)
        .await;
    mount_ref(&server, "main", "c1", 1).await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/game/git/refs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ref": "refs/heads/develop",
            "object": { "sha": "c1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.branches(&repo()).await.unwrap();
    client.branches(&repo()).await.unwrap();
    client.create_branch(&repo(), "develop", "main").await.unwrap();
    let branches = client.branches(&repo()).await.unwrap();
    assert_eq!(branches[0].name, "main");
}

#[tokio::test]
async fn test_branches_follow_next_page_link() {
    let server = MockServer::start().await;
    let next = format!(
        "<{}/repos/octo/game/branches?per_page=100&page=2>; rel=\"next\", \
         <{}/repos/octo/game/branches?per_page=100&page=2>; rel=\"last\"",
        server.uri(),
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/repos/octo/game/branches"))
        .and(query_param("per_page", "100"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", next.as_str())
                .set_body_json(branch_page((0..100).map(|i| format!("topic-{i:03}")))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/game/branches"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(branch_page(["feature".to_string()])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let branches = client(&server).branches(&repo()).await.unwrap();
    assert_eq!(branches.len(), 101);
    assert!(branches.iter().any(|b| b.name == "feature"));
}

#[tokio::test]
async fn test_next_page_on_foreign_host_is_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    "<https://elsewhere.invalid/user/repos?page=2>; rel=\"next\"",
                )
                .set_body_json(json!([])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let repos = client(&server).repositories().await.unwrap();
    assert!(repos.is_empty());
}

#[tokio::test]
async fn test_requests_carry_credential_and_api_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer gho_test"))
        .and(header("x-github-api-version", "2022-11-28"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "login": "octocat", "name": null })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let user = client(&server).current_user().await.unwrap();
    assert_eq!(user.login, "octocat");
    assert_eq!(user.name, None);
}

// =============================================================================
// Commit protocol
// =============================================================================

async fn mount_commit_protocol(server: &MockServer, blobs: u64) {
    Mock::given(method("GET"))
        .and(path("/repos/octo/game/git/commits/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "c1",
            "tree": { "sha": "t1" }
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/game/git/blobs"))
        .and(body_partial_json(json!({ "encoding": "base64" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sha": "b1" })))
        .expect(blobs)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/game/git/trees"))
        .and(body_partial_json(json!({ "base_tree": "t1" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sha": "t2" })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/game/git/commits"))
        .and(body_json(json!({
            "message": "Tune jump",
            "tree": "t2",
            "parents": ["c1"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sha": "c2" })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_commit_files_runs_full_protocol() {
    let server = MockServer::start().await;
    mount_ref(&server, "main", "c1", 1).await;
    mount_commit_protocol(&server, 2).await;
    Mock::given(method("PATCH"))
        .and(path("/repos/octo/game/git/refs/heads/main"))
        .and(body_json(json!({ "sha": "c2", "force": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": "refs/heads/main",
            "object": { "sha": "c2" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let files = [
        FileChange::new("Scripts/Player.cs", "class Player {}\n"),
        FileChange::new("README.md", "# Game\n"),
    ];
    let sha = client(&server)
        .commit_files(&repo(), "main", &files, "Tune jump")
        .await
        .unwrap();
    assert_eq!(sha, "c2");
}

#[tokio::test]
async fn test_commit_invalidates_cached_tree() {
    let server = MockServer::start().await;
    mount_ref(&server, "main", "c1", 3).await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/game/git/trees/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tree_body()))
        .expect(2)
        .mount(&server)
        .await;
    mount_commit_protocol(&server, 1).await;
    Mock::given(method("PATCH"))
        .and(path("/repos/octo/game/git/refs/heads/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client(&server);
    client.tree(&repo(), "main").await.unwrap();
    assert!(!client.cache().is_empty());

    client
        .commit_files(&repo(), "main", &[FileChange::new("README.md", "x")], "Tune jump")
        .await
        .unwrap();
    client.tree(&repo(), "main").await.unwrap();
}

#[tokio::test]
async fn test_commit_ref_update_failure_names_step() {
    let server = MockServer::start().await;
    mount_ref(&server, "main", "c1", 1).await;
    mount_commit_protocol(&server, 1).await;
    Mock::given(method("PATCH"))
        .and(path("/repos/octo/game/git/refs/heads/main"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Update is not a fast forward" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .commit_files(&repo(), "main", &[FileChange::new("README.md", "x")], "Tune jump")
        .await
        .unwrap_err();

    match err {
        PadError::CommitFailed(ref commit) => assert_eq!(commit.step, CommitStep::UpdateRef),
        ref other => panic!("Expected CommitFailed, got {other:?}"),
    }
    insta::assert_snapshot!(
        err.to_string(),
        @"commit failed: update branch ref: network error: http error 422: /repos/octo/game/git/refs/heads/main (Update is not a fast forward)"
    );
}

#[tokio::test]
async fn test_commit_validation_sends_nothing() {
    let server = MockServer::start().await;

    let err = client(&server)
        .commit_files(&repo(), "main", &[FileChange::new("a", "1")], "   ")
        .await
        .unwrap_err();

    assert!(matches!(err, PadError::Validation(_)));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

// =============================================================================
// Branches and files
// =============================================================================

#[tokio::test]
async fn test_create_branch_posts_ref() {
    let server = MockServer::start().await;
    mount_ref(&server, "main", "c1", 1).await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/game/git/refs"))
        .and(body_json(json!({ "ref": "refs/heads/feature/jump", "sha": "c1" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ref": "refs/heads/feature/jump",
            "object": { "sha": "c1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .create_branch(&repo(), "feature/jump", "main")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_existing_branch_conflicts() {
    let server = MockServer::start().await;
    mount_ref(&server, "main", "c1", 1).await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/game/git/refs"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Reference already exists" })),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .create_branch(&repo(), "develop", "main")
        .await
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"conflict: branch 'develop' already exists in octo/game");
}

#[tokio::test]
async fn test_file_content_decodes_wrapped_base64() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/game/contents/Scripts/Player.cs"))
        .and(query_param("ref", "develop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "path": "Scripts/Player.cs",
            "sha": "f1",
            "size": 12,
            "encoding": "base64",
            "content": "aGVsbG8K\nd29ybGQK\n"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = client(&server)
        .file_content(&repo(), "Scripts/Player.cs", "develop")
        .await
        .unwrap();
    assert_eq!(file.content, "hello\nworld\n");
    assert_eq!(file.size, 12);
}

#[tokio::test]
async fn test_large_file_without_content_is_too_large() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/game/contents/Assets/level.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "path": "Assets/level.json",
            "sha": "f9",
            "size": 2_000_000,
            "encoding": "none",
            "content": ""
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .file_content(&repo(), "Assets/level.json", "main")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PadError::Validation(ref e) if matches!(**e, ValidationError::FileTooLarge { size: 2_000_000, .. })
    ));
    insta::assert_snapshot!(err.to_string(), @"'Assets/level.json' is too large to edit (2000000 bytes, limit 1048576)");
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/game/contents/Gone.cs"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let err = client(&server)
        .file_content(&repo(), "Gone.cs", "main")
        .await
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"not found: 'Gone.cs' at 'main'");
}

#[tokio::test]
async fn test_revoked_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })))
        .mount(&server)
        .await;

    let err = client(&server).current_user().await.unwrap_err();
    match err {
        PadError::Auth(boxed) => assert!(matches!(*boxed, AuthError::InvalidCredential)),
        other => panic!("Expected PadError::Auth, got {other:?}"),
    }
}

#[tokio::test]
async fn test_compare_uses_range_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/game/compare/main...feature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ahead",
            "ahead_by": 2,
            "behind_by": 0,
            "total_commits": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let comparison = client(&server)
        .compare(&repo(), "main", "feature")
        .await
        .unwrap();
    assert_eq!(comparison.status, "ahead");
    assert_eq!(comparison.ahead_by, 2);
}

// =============================================================================
// Rate limit
// =============================================================================

#[tokio::test]
async fn test_rate_limit_known() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rate": { "limit": 5000, "remaining": 4321, "reset": 1_700_000_000 }
        })))
        .mount(&server)
        .await;

    let RateLimitStatus::Known(rate) = client(&server).rate_limit().await else {
        panic!("expected a known rate limit");
    };
    assert_eq!(rate.limit, 5000);
    assert_eq!(rate.remaining, 4321);
    assert_eq!(rate.reset_at.timestamp(), 1_700_000_000);
}

#[tokio::test]
async fn test_rate_limit_failure_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert_eq!(client(&server).rate_limit().await, RateLimitStatus::Unknown);
}
