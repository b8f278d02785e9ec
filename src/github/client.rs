//! GitHub API client implementation

use crate::core::pagination::PageLinks;
use crate::core::rate_limit::RateLimiter;
use crate::core::{OsslistError, OsslistResult};
use crate::di::traits::{ConfigProvider, GitHubProvider};
use crate::github::types::{
    GitHubCommit, GitHubLicense, GitHubRelease, GitHubRepo, GitHubTag, GitHubTopics,
};
use async_trait::async_trait;
use reqwest::{header, Client as HttpClient, StatusCode};
use std::sync::Arc;
use tracing::{debug, warn};

/// Upper bound on tag pages fetched per repository.
const MAX_TAG_PAGES: usize = 10;

/// GitHub API client
pub struct GitHubClient {
    http_client: HttpClient,
    api_url: String,
    token: Option<String>,
    rate_limiter: Arc<RateLimiter>,
}

impl GitHubClient {
    /// Create a new GitHub client
    ///
    /// The token is taken from `GITHUB_TOKEN`, then `GITHUB_API_KEY`, then
    /// the configuration. It is forwarded as is and never validated.
    pub fn new(config: &dyn ConfigProvider) -> OsslistResult<Self> {
        let token = std::env::var("GITHUB_TOKEN")
            .ok()
            .or_else(|| std::env::var("GITHUB_API_KEY").ok())
            .or_else(|| config.github_token().map(str::to_string));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("osslist"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );

        if let Some(ref token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("token {}", token))
                    .map_err(|e| OsslistError::Config(format!("Invalid GitHub token: {}", e)))?,
            );
        }

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| OsslistError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let has_token = token.is_some();
        Ok(Self {
            http_client,
            api_url: config.github_api_url().trim_end_matches('/').to_string(),
            token,
            rate_limiter: Arc::new(RateLimiter::new(
                "GitHub",
                if has_token { 5000 } else { 60 },
            )),
        })
    }

    /// Get repository information
    ///
    /// Fails with `InvalidRepository` if the repository does not exist.
    pub async fn get_repo(&self, owner: &str, repo: &str) -> OsslistResult<GitHubRepo> {
        let url = format!("{}/repos/{}/{}", self.api_url, owner, repo);
        self.api_get_optional(&url).await?.ok_or_else(|| {
            OsslistError::InvalidRepository(format!("{}/{} not found on GitHub", owner, repo))
        })
    }

    /// Get releases, newest first
    ///
    /// Only the first page is read, plus the last page when there are more,
    /// which is enough to know the newest and the oldest release.
    pub async fn get_releases(&self, owner: &str, repo: &str) -> OsslistResult<Vec<GitHubRelease>> {
        let url = format!(
            "{}/repos/{}/{}/releases?per_page=100",
            self.api_url, owner, repo
        );
        let (mut releases, links): (Vec<GitHubRelease>, _) = self.api_get_page(&url).await?;

        if let Some(last) = links.last {
            let (oldest, _): (Vec<GitHubRelease>, _) = self.api_get_page(&last).await?;
            releases.extend(oldest);
        }

        Ok(releases)
    }

    /// Get tags for a repository
    pub async fn get_tags(&self, owner: &str, repo: &str) -> OsslistResult<Vec<GitHubTag>> {
        let mut url = Some(format!(
            "{}/repos/{}/{}/tags?per_page=100",
            self.api_url, owner, repo
        ));
        let mut tags = Vec::new();
        let mut pages = 0;

        while let Some(page_url) = url.take() {
            let (page, links): (Vec<GitHubTag>, _) = self.api_get_page(&page_url).await?;
            tags.extend(page);
            pages += 1;
            if pages < MAX_TAG_PAGES {
                url = links.next;
            } else if links.next.is_some() {
                debug!(owner, repo, "tag list truncated after {} pages", pages);
            }
        }

        Ok(tags)
    }

    /// Get a single commit
    pub async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> OsslistResult<GitHubCommit> {
        let url = format!("{}/repos/{}/{}/commits/{}", self.api_url, owner, repo, sha);
        self.api_get(&url).await
    }

    /// Get the most recent commit on a branch, `None` for an empty repository
    pub async fn get_last_commit(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> OsslistResult<Option<GitHubCommit>> {
        let url = format!(
            "{}/repos/{}/{}/commits?sha={}&per_page=1",
            self.api_url,
            owner,
            repo,
            urlencoding::encode(branch)
        );

        let response = self.send(&url).await?;
        match response.status() {
            // GitHub answers 409 for repositories without commits
            StatusCode::CONFLICT | StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let commits: Vec<GitHubCommit> = parse_json(response).await?;
                Ok(commits.into_iter().next())
            }
            status => Err(api_error(status, &url)),
        }
    }

    /// Get the detected license, `None` if GitHub found none
    pub async fn get_license(&self, owner: &str, repo: &str) -> OsslistResult<Option<GitHubLicense>> {
        let url = format!("{}/repos/{}/{}/license", self.api_url, owner, repo);
        self.api_get_optional(&url).await
    }

    /// Get language usage in bytes, in the order GitHub reports them
    pub async fn get_languages(&self, owner: &str, repo: &str) -> OsslistResult<Vec<(String, u64)>> {
        let url = format!("{}/repos/{}/{}/languages", self.api_url, owner, repo);
        let languages: serde_json::Map<String, serde_json::Value> = self.api_get(&url).await?;

        Ok(languages
            .into_iter()
            .filter_map(|(name, bytes)| bytes.as_u64().map(|b| (name, b)))
            .collect())
    }

    /// Get the repository topics
    pub async fn get_topics(&self, owner: &str, repo: &str) -> OsslistResult<Vec<String>> {
        let url = format!("{}/repos/{}/{}/topics", self.api_url, owner, repo);
        let topics: GitHubTopics = self.api_get(&url).await?;
        Ok(topics.names)
    }

    /// Requests left before GitHub starts rejecting calls
    pub async fn remaining_quota(&self) -> u64 {
        self.rate_limiter.remaining().await
    }

    /// Send a GET request, tracking quota
    async fn send(&self, url: &str) -> OsslistResult<reqwest::Response> {
        if let Err(e) = self.rate_limiter.check().await {
            if self.token.is_none() {
                warn!("GitHub quota exhausted without a token; GITHUB_TOKEN raises the limit to 5000/hour");
            }
            return Err(e);
        }

        debug!(url, "GitHub API request");
        let response = self.http_client.get(url).send().await.map_err(|e| {
            OsslistError::UpstreamUnavailable(format!("GitHub API request failed: {}", e))
        })?;

        self.rate_limiter
            .update(
                response.headers(),
                "x-ratelimit-remaining",
                "x-ratelimit-reset",
            )
            .await;

        let status = response.status();
        if (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS)
            && self.rate_limiter.remaining().await == 0
        {
            return Err(self.rate_limiter.exhausted().await);
        }

        Ok(response)
    }

    /// GET and parse JSON, `None` on 404
    async fn api_get_optional<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> OsslistResult<Option<T>> {
        let response = self.send(url).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => parse_json(response).await.map(Some),
            status => Err(api_error(status, url)),
        }
    }

    /// GET and parse JSON, treating 404 as an upstream failure
    async fn api_get<T: serde::de::DeserializeOwned>(&self, url: &str) -> OsslistResult<T> {
        self.api_get_optional(url).await?.ok_or_else(|| {
            OsslistError::UpstreamUnavailable(format!("GitHub API error: {} not found", url))
        })
    }

    /// GET one page of a list endpoint together with its pagination links
    async fn api_get_page<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> OsslistResult<(T, PageLinks)> {
        let response = self.send(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, url));
        }

        let links = PageLinks::from_headers(response.headers());
        let page = parse_json(response).await?;
        Ok((page, links))
    }
}

fn api_error(status: StatusCode, url: &str) -> OsslistError {
    OsslistError::UpstreamUnavailable(format!("GitHub API error: HTTP {} for {}", status, url))
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> OsslistResult<T> {
    response.json().await.map_err(|e| {
        OsslistError::UpstreamUnavailable(format!("Failed to parse GitHub API response: {}", e))
    })
}

// Implement GitHubProvider trait
#[async_trait]
impl GitHubProvider for GitHubClient {
    async fn get_repo(&self, owner: &str, repo: &str) -> OsslistResult<GitHubRepo> {
        Self::get_repo(self, owner, repo).await
    }

    async fn get_releases(&self, owner: &str, repo: &str) -> OsslistResult<Vec<GitHubRelease>> {
        Self::get_releases(self, owner, repo).await
    }

    async fn get_tags(&self, owner: &str, repo: &str) -> OsslistResult<Vec<GitHubTag>> {
        Self::get_tags(self, owner, repo).await
    }

    async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> OsslistResult<GitHubCommit> {
        Self::get_commit(self, owner, repo, sha).await
    }

    async fn get_last_commit(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> OsslistResult<Option<GitHubCommit>> {
        Self::get_last_commit(self, owner, repo, branch).await
    }

    async fn get_license(&self, owner: &str, repo: &str) -> OsslistResult<Option<GitHubLicense>> {
        Self::get_license(self, owner, repo).await
    }

    async fn get_languages(&self, owner: &str, repo: &str) -> OsslistResult<Vec<(String, u64)>> {
        Self::get_languages(self, owner, repo).await
    }

    async fn get_topics(&self, owner: &str, repo: &str) -> OsslistResult<Vec<String>> {
        Self::get_topics(self, owner, repo).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::mocks::MockConfigProvider;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> GitHubClient {
        let config = MockConfigProvider {
            github_api_url: server.uri(),
            ..Default::default()
        };
        GitHubClient::new(&config).unwrap()
    }

    fn repo_json() -> serde_json::Value {
        serde_json::json!({
            "name": "y",
            "full_name": "x/y",
            "html_url": "https://github.com/x/y",
            "default_branch": "main",
            "description": "a project",
            "topics": ["rust", "cli"]
        })
    }

    #[tokio::test]
    async fn test_get_repo() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/x/y"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json()))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let repo = client.get_repo("x", "y").await.unwrap();
        assert_eq!(repo.default_branch, "main");
        assert_eq!(repo.topics, vec!["rust", "cli"]);
    }

    #[tokio::test]
    async fn test_get_repo_not_found_is_invalid_repository() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/x/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_repo("x", "missing").await.unwrap_err();
        assert!(matches!(err, OsslistError::InvalidRepository(_)));
    }

    #[tokio::test]
    async fn test_license_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/x/y/license"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(client.get_license("x", "y").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_license_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/x/y/license"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "html_url": "https://github.com/x/y/blob/main/LICENSE",
                "license": {"key": "mit", "name": "MIT License", "spdx_id": "MIT"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let license = client.get_license("x", "y").await.unwrap().unwrap();
        assert_eq!(license.license.name, "MIT License");
    }

    #[tokio::test]
    async fn test_languages_keep_reported_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/x/y/languages"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"Rust": 9000, "Shell": 120, "C": 120}"#)
                    .insert_header("content-type", "application/json"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let languages = client.get_languages("x", "y").await.unwrap();
        assert_eq!(
            languages,
            vec![
                ("Rust".to_string(), 9000),
                ("Shell".to_string(), 120),
                ("C".to_string(), 120)
            ]
        );
    }

    #[tokio::test]
    async fn test_releases_fetch_last_page() {
        let server = MockServer::start().await;
        let last = format!("{}/repositories/1/releases?per_page=100&page=3", server.uri());

        Mock::given(method("GET"))
            .and(path("/repos/x/y/releases"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{
                        "tag_name": "v3.0",
                        "name": null,
                        "html_url": "https://github.com/x/y/releases/tag/v3.0",
                        "created_at": "2024-02-01T00:00:00Z",
                        "published_at": null
                    }]))
                    .insert_header("link", format!("<{}>; rel=\"last\"", last).as_str()),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repositories/1/releases"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "tag_name": "v0.1",
                "name": "first",
                "html_url": "https://github.com/x/y/releases/tag/v0.1",
                "created_at": "2019-02-01T00:00:00Z",
                "published_at": null
            }])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let releases = client.get_releases("x", "y").await.unwrap();
        let names: Vec<_> = releases.iter().map(|r| r.tag_name.as_str()).collect();
        assert_eq!(names, vec!["v3.0", "v0.1"]);
    }

    #[tokio::test]
    async fn test_empty_repository_has_no_last_commit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/x/y/commits"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(client
            .get_last_commit("x", "y", "main")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_quota_exhausted_is_distinct() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/x/y"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", "9999999999"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_repo("x", "y").await.unwrap_err();
        assert!(matches!(err, OsslistError::QuotaExhausted { .. }));

        // later calls fail fast without reaching the server
        let err = client.get_topics("x", "y").await.unwrap_err();
        assert!(matches!(err, OsslistError::QuotaExhausted { .. }));
        assert_eq!(client.remaining_quota().await, 0);
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/x/y/topics"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_topics("x", "y").await.unwrap_err();
        assert!(matches!(err, OsslistError::UpstreamUnavailable(_)));
    }
}
