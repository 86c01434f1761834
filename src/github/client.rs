// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! REST client for the hosting API.
//!
//! ```text
//! GitHubClient::new(base_url, credential)
//!        |
//!        v
//! endpoint(["repos", owner, name, ...])  --> Url (segments percent-encoded)
//!        |
//!        v
//! send()   bearer auth + API version headers
//!          2xx  --> Response
//!          401  --> Auth(InvalidCredential)
//!          404  --> NotFound(what)
//!          else --> Network(HttpError{status, url, message})
//!
//! get_pages()  per_page=100, then every Link rel="next" on the same origin
//! ```

use std::sync::{Arc, OnceLock};

use chrono::DateTime;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::RemoteRepository;
use super::cache::{CacheKey, CachedValue, ResponseCache};
use super::content::{FileClassifier, decode_content};
use super::types::{
    Branch, BranchResponse, Comparison, ContentResponse, FileChange, FileContent, RateLimit,
    RateLimitResponse, RateLimitStatus, RefResponse, RepoResponse, Repository, RepositoryRef,
    TreeEntry, TreeResponse, User,
};
use crate::auth::Credential;
use crate::config::Config;
use crate::error::{AuthError, NetworkError, PadError, PadResult, ValidationError};

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const PAGE_SIZE: &str = "100";
const MAX_PAGES: usize = 100;

/// Global HTTP client, shared by every `GitHubClient`.
fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("gitpad/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Target of the `rel="next"` entry of a `Link` header.
fn next_page_link(response: &Response) -> Option<Url> {
    let header = response.headers().get(reqwest::header::LINK)?.to_str().ok()?;
    header.split(',').find_map(|link| {
        let (target, params) = link.split_once(';')?;
        params
            .split(';')
            .any(|param| param.trim() == r#"rel="next""#)
            .then(|| target.trim().trim_start_matches('<').trim_end_matches('>'))
            .and_then(|target| Url::parse(target).ok())
    })
}

#[derive(serde::Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

/// Authenticated client for one API host.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: Url,
    credential: Credential,
    cache: Arc<ResponseCache>,
    classifier: FileClassifier,
}

impl GitHubClient {
    /// Client for `base_url` with default cache lifetime and file rules.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidUrl` if `base_url` cannot be a base.
    pub fn new(base_url: &str, credential: Credential) -> PadResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| NetworkError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(NetworkError::InvalidUrl(base_url.to_string()).into());
        }
        Ok(Self {
            http: global_client().clone(),
            base_url,
            credential,
            cache: Arc::default(),
            classifier: FileClassifier::default(),
        })
    }

    /// Client configured from the `[api]` and `[editor]` sections.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidUrl` if `api.base_url` is malformed.
    pub fn from_config(config: &Config, credential: Credential) -> PadResult<Self> {
        Ok(Self::new(&config.api.base_url, credential)?
            .with_cache(ResponseCache::new(config.api.cache_ttl()))
            .with_classifier(FileClassifier::new(
                &config.editor.binary_extensions,
                config.editor.max_file_size,
            )))
    }

    #[must_use]
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Arc::new(cache);
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: FileClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    #[must_use]
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(super) fn endpoint<'a, I>(&self, segments: I) -> PadResult<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| NetworkError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `repos/{owner}/{name}/{rest...}`; segments of `rest` may contain `/`.
    pub(super) fn repo_endpoint(&self, repo: &RepositoryRef, rest: &[&str]) -> PadResult<Url> {
        let tail = rest.iter().flat_map(|part| part.split('/'));
        self.endpoint(["repos", repo.owner(), repo.name()].into_iter().chain(tail))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(self.credential.expose())
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    pub(super) async fn send(&self, request: RequestBuilder, what: &str) -> PadResult<Response> {
        let response = request.send().await.map_err(NetworkError::Reqwest)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().path().to_string();
        match status {
            StatusCode::NOT_FOUND => Err(PadError::not_found(what)),
            StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredential.into()),
            _ => {
                let message = response
                    .json::<ApiMessage>()
                    .await
                    .map(|body| body.message)
                    .unwrap_or_default();
                debug!(status = status.as_u16(), %url, %message, "request failed");
                Err(NetworkError::HttpError {
                    status: status.as_u16(),
                    url,
                    message,
                }
                .into())
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> PadResult<T> {
        response.json::<T>().await.map_err(|e| {
            NetworkError::Decode {
                what: what.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    pub(super) async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> PadResult<T> {
        let response = self.send(self.request(Method::GET, url), what).await?;
        Self::decode(response, what).await
    }

    /// Every page of a listing endpoint. Links leaving the API origin are
    /// not followed.
    pub(super) async fn get_pages<T: DeserializeOwned>(
        &self,
        mut url: Url,
        what: &str,
    ) -> PadResult<Vec<T>> {
        url.query_pairs_mut().append_pair("per_page", PAGE_SIZE);
        let mut items = Vec::new();
        let mut next = Some(url);
        let mut pages = 0;

        while let Some(url) = next.take() {
            let response = self.send(self.request(Method::GET, url), what).await?;
            next = next_page_link(&response);
            let page: Vec<T> = Self::decode(response, what).await?;
            items.extend(page);
            pages += 1;

            next = next.filter(|link| {
                if link.origin() != self.base_url.origin() {
                    warn!(%link, "next page on a foreign host ignored");
                    false
                } else if pages >= MAX_PAGES {
                    warn!(what, pages, "listing cut at page limit");
                    false
                } else {
                    true
                }
            });
        }
        debug!(what, pages, items = items.len(), "fetched listing");
        Ok(items)
    }

    pub(super) async fn send_json<T, B>(
        &self,
        method: Method,
        url: Url,
        body: &B,
        what: &str,
    ) -> PadResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(self.request(method, url).json(body), what).await?;
        Self::decode(response, what).await
    }

    /// Head commit sha of `branch`.
    pub(super) async fn resolve_ref(&self, repo: &RepositoryRef, branch: &str) -> PadResult<String> {
        let url = self.repo_endpoint(repo, &["git", "ref", "heads", branch])?;
        let what = format!("branch '{branch}' in {repo}");
        let reference: RefResponse = self.get_json(url, &what).await?;
        Ok(reference.object.sha)
    }

    async fn fetch_tree(&self, repo: &RepositoryRef, branch: &str) -> PadResult<Vec<TreeEntry>> {
        let head = self.resolve_ref(repo, branch).await?;
        let mut url = self.repo_endpoint(repo, &["git", "trees", &head])?;
        url.query_pairs_mut().append_pair("recursive", "1");

        let response: TreeResponse = self
            .get_json(url, &format!("tree of '{branch}' in {repo}"))
            .await?;
        if response.truncated {
            warn!(%repo, branch, entries = response.tree.len(), "tree listing truncated by server");
        }
        debug!(%repo, branch, entries = response.tree.len(), "fetched tree");
        Ok(response.tree)
    }

    async fn fetch_rate_limit(&self) -> PadResult<RateLimit> {
        let url = self.endpoint(["rate_limit"])?;
        let response: RateLimitResponse = self.get_json(url, "rate limit").await?;
        let reset_at = DateTime::from_timestamp(response.rate.reset, 0).ok_or_else(|| {
            NetworkError::Decode {
                what: "rate limit".to_string(),
                message: format!("reset time {} out of range", response.rate.reset),
            }
        })?;
        Ok(RateLimit {
            limit: response.rate.limit,
            remaining: response.rate.remaining,
            reset_at,
        })
    }
}

fn is_existing_ref(err: &PadError) -> bool {
    match err {
        PadError::Network(network) => matches!(
            &**network,
            NetworkError::HttpError { status: 422, message, .. }
                if message.to_ascii_lowercase().contains("already exists")
        ),
        _ => false,
    }
}

impl RemoteRepository for GitHubClient {
    async fn default_branch(&self, repo: &RepositoryRef) -> PadResult<String> {
        let url = self.repo_endpoint(repo, &[])?;
        let response: RepoResponse = self.get_json(url, &format!("repository {repo}")).await?;
        Ok(response.default_branch)
    }

    async fn branches(&self, repo: &RepositoryRef) -> PadResult<Vec<Branch>> {
        let key = CacheKey::branches(repo);
        if let Some(CachedValue::Branches(branches)) = self.cache.get(&key) {
            debug!(%key, "cache hit");
            return Ok(branches);
        }

        let url = self.repo_endpoint(repo, &["branches"])?;
        let response: Vec<BranchResponse> = self
            .get_pages(url, &format!("branches of {repo}"))
            .await?;
        let branches: Vec<Branch> = response.into_iter().map(Branch::from).collect();

        self.cache.insert(key, CachedValue::Branches(branches.clone()));
        Ok(branches)
    }

    async fn tree(&self, repo: &RepositoryRef, branch: &str) -> PadResult<Vec<TreeEntry>> {
        let key = CacheKey::tree(repo, branch);
        if let Some(CachedValue::Tree(entries)) = self.cache.get(&key) {
            debug!(%key, "cache hit");
            return Ok(entries);
        }

        let entries = self.fetch_tree(repo, branch).await?;
        self.cache.insert(key, CachedValue::Tree(entries.clone()));
        Ok(entries)
    }

    async fn refresh_tree(&self, repo: &RepositoryRef, branch: &str) -> PadResult<Vec<TreeEntry>> {
        self.cache.invalidate(&CacheKey::tree(repo, branch));
        self.tree(repo, branch).await
    }

    async fn file_content(
        &self,
        repo: &RepositoryRef,
        path: &str,
        branch: &str,
    ) -> PadResult<FileContent> {
        let mut url = self.repo_endpoint(repo, &["contents", path])?;
        url.query_pairs_mut().append_pair("ref", branch);

        let response: ContentResponse = self
            .get_json(url, &format!("'{path}' at '{branch}'"))
            .await?;
        // Large files come back with encoding "none" and no content.
        if self.classifier.is_too_large(response.size) {
            return Err(ValidationError::FileTooLarge {
                path: path.to_string(),
                size: response.size,
                limit: self.classifier.max_file_size(),
            }
            .into());
        }
        if !response.encoding.is_empty() && response.encoding != "base64" {
            return Err(NetworkError::Decode {
                what: format!("'{path}'"),
                message: format!("unsupported encoding '{}'", response.encoding),
            }
            .into());
        }

        Ok(FileContent {
            content: decode_content(&response.content)?,
            path: response.path,
            sha: response.sha,
            size: response.size,
        })
    }

    async fn create_branch(
        &self,
        repo: &RepositoryRef,
        new_name: &str,
        from_branch: &str,
    ) -> PadResult<()> {
        let sha = self.resolve_ref(repo, from_branch).await?;
        let url = self.repo_endpoint(repo, &["git", "refs"])?;
        let body = serde_json::json!({
            "ref": format!("refs/heads/{new_name}"),
            "sha": sha,
        });

        let request = self.request(Method::POST, url).json(&body);
        match self.send(request, &format!("branch '{new_name}'")).await {
            Ok(_) => {}
            Err(err) if is_existing_ref(&err) => {
                return Err(PadError::conflict(format!(
                    "branch '{new_name}' already exists in {repo}"
                )));
            }
            Err(err) => return Err(err),
        }

        self.cache.invalidate_touching(repo, new_name);
        info!(%repo, branch = new_name, from = from_branch, %sha, "created branch");
        Ok(())
    }

    async fn commit_files(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        files: &[FileChange],
        message: &str,
    ) -> PadResult<String> {
        self.run_commit(repo, branch, files, message).await
    }

    async fn compare(&self, repo: &RepositoryRef, base: &str, head: &str) -> PadResult<Comparison> {
        let range = format!("{base}...{head}");
        let url = self.endpoint(["repos", repo.owner(), repo.name(), "compare", &range])?;
        self.get_json(url, &format!("comparison {range} in {repo}"))
            .await
    }

    async fn current_user(&self) -> PadResult<User> {
        let url = self.endpoint(["user"])?;
        self.get_json(url, "current user").await
    }

    async fn repositories(&self) -> PadResult<Vec<Repository>> {
        let key = CacheKey::Repositories;
        if let Some(CachedValue::Repositories(repos)) = self.cache.get(&key) {
            debug!(%key, "cache hit");
            return Ok(repos);
        }

        let mut url = self.endpoint(["user", "repos"])?;
        url.query_pairs_mut().append_pair("sort", "updated");
        let repos: Vec<Repository> = self.get_pages(url, "repositories").await?;

        self.cache.insert(key, CachedValue::Repositories(repos.clone()));
        Ok(repos)
    }

    async fn rate_limit(&self) -> RateLimitStatus {
        match self.fetch_rate_limit().await {
            Ok(rate) => RateLimitStatus::Known(rate),
            Err(err) => {
                warn!(error = %err, "rate limit lookup failed");
                RateLimitStatus::Unknown
            }
        }
    }

    fn is_binary(&self, path: &str) -> bool {
        self.classifier.is_binary(path)
    }

    fn is_too_large(&self, size: u64) -> bool {
        self.classifier.is_too_large(size)
    }

    fn max_file_size(&self) -> u64 {
        self.classifier.max_file_size()
    }
}
