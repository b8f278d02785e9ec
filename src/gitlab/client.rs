//! GitLab API client implementation

use crate::core::pagination::PageLinks;
use crate::core::rate_limit::RateLimiter;
use crate::core::{OsslistError, OsslistResult};
use crate::di::traits::{ConfigProvider, GitLabProvider};
use crate::gitlab::types::{GitLabCommit, GitLabProject, GitLabRelease, GitLabTag};
use async_trait::async_trait;
use reqwest::{header, Client as HttpClient, StatusCode};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Upper bound on tag pages fetched per project.
const MAX_TAG_PAGES: usize = 10;

/// Default quota assumed for a GitLab instance until it reports one.
const DEFAULT_QUOTA: u64 = 2000;

/// GitLab API client
///
/// One client serves every GitLab instance; `base_url` is passed per call
/// (`https://gitlab.com`, `https://gitlab.example.org`). Quota is tracked
/// separately for each instance.
pub struct GitLabClient {
    http_client: HttpClient,
    token: Option<String>,
    rate_limiters: Mutex<HashMap<String, Arc<RateLimiter>>>,
}

impl GitLabClient {
    /// Create a new GitLab client
    ///
    /// The token comes from `GITLAB_TOKEN` or the configuration and is sent
    /// as `PRIVATE-TOKEN` to gitlab.com and the configured GitLab hosts.
    pub fn new(config: &dyn ConfigProvider) -> OsslistResult<Self> {
        let token = std::env::var("GITLAB_TOKEN")
            .ok()
            .or_else(|| config.gitlab_token().map(str::to_string));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("osslist"),
        );

        if let Some(ref token) = token {
            headers.insert(
                "PRIVATE-TOKEN",
                header::HeaderValue::from_str(token)
                    .map_err(|e| OsslistError::Config(format!("Invalid GitLab token: {}", e)))?,
            );
        }

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| OsslistError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            token,
            rate_limiters: Mutex::new(HashMap::new()),
        })
    }

    /// Get project information
    ///
    /// Fails with `InvalidRepository` if the project does not exist.
    pub async fn get_project(&self, base_url: &str, project: &str) -> OsslistResult<GitLabProject> {
        let url = project_url(base_url, project, "");
        self.api_get_optional(base_url, &url).await?.ok_or_else(|| {
            OsslistError::InvalidRepository(format!("{} not found on {}", project, base_url))
        })
    }

    /// Get releases, newest first
    ///
    /// Like GitHub, only the first page and the last page are read.
    pub async fn get_releases(&self, base_url: &str, project: &str) -> OsslistResult<Vec<GitLabRelease>> {
        let url = project_url(base_url, project, "/releases?per_page=100");
        let (mut releases, links): (Vec<GitLabRelease>, _) = self.api_get_page(base_url, &url).await?;

        if let Some(last) = links.last.filter(|last| *last != url) {
            let (oldest, _): (Vec<GitLabRelease>, _) = self.api_get_page(base_url, &last).await?;
            for release in oldest {
                if !releases.iter().any(|r| r.tag_name == release.tag_name) {
                    releases.push(release);
                }
            }
        }

        Ok(releases)
    }

    /// Get repository tags
    pub async fn get_tags(&self, base_url: &str, project: &str) -> OsslistResult<Vec<GitLabTag>> {
        let mut url = Some(project_url(base_url, project, "/repository/tags?per_page=100"));
        let mut tags = Vec::new();
        let mut pages = 0;

        while let Some(page_url) = url.take() {
            let (page, links): (Vec<GitLabTag>, _) = self.api_get_page(base_url, &page_url).await?;
            tags.extend(page);
            pages += 1;
            if pages < MAX_TAG_PAGES {
                url = links.next;
            } else if links.next.is_some() {
                debug!(project, "tag list truncated after {} pages", pages);
            }
        }

        Ok(tags)
    }

    /// Get language usage as percentages, in the order GitLab reports them
    pub async fn get_languages(&self, base_url: &str, project: &str) -> OsslistResult<Vec<(String, f64)>> {
        let url = project_url(base_url, project, "/languages");
        let languages: serde_json::Map<String, serde_json::Value> = self.api_get(base_url, &url).await?;

        Ok(languages
            .into_iter()
            .filter_map(|(name, share)| share.as_f64().map(|s| (name, s)))
            .collect())
    }

    /// Get the most recent commit on a branch
    pub async fn get_last_commit(
        &self,
        base_url: &str,
        project: &str,
        branch: &str,
    ) -> OsslistResult<Option<GitLabCommit>> {
        let url = project_url(
            base_url,
            project,
            &format!(
                "/repository/commits?ref_name={}&per_page=1",
                urlencoding::encode(branch)
            ),
        );
        let commits: Option<Vec<GitLabCommit>> = self.api_get_optional(base_url, &url).await?;
        Ok(commits.and_then(|c| c.into_iter().next()))
    }

    /// Requests left on an instance before it starts rejecting calls
    pub async fn remaining_quota(&self, base_url: &str) -> u64 {
        self.limiter(base_url).remaining().await
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn limiter(&self, base_url: &str) -> Arc<RateLimiter> {
        let mut limiters = self
            .rate_limiters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        limiters
            .entry(base_url.to_string())
            .or_insert_with(|| Arc::new(RateLimiter::new("GitLab", DEFAULT_QUOTA)))
            .clone()
    }

    /// Send a GET request, tracking quota for the instance
    async fn send(&self, base_url: &str, url: &str) -> OsslistResult<reqwest::Response> {
        let limiter = self.limiter(base_url);
        limiter.check().await?;

        debug!(url, "GitLab API request");
        let response = self.http_client.get(url).send().await.map_err(|e| {
            OsslistError::UpstreamUnavailable(format!("GitLab API request failed: {}", e))
        })?;

        limiter
            .update(response.headers(), "ratelimit-remaining", "ratelimit-reset")
            .await;

        if response.status() == StatusCode::TOO_MANY_REQUESTS && limiter.remaining().await == 0 {
            return Err(limiter.exhausted().await);
        }

        Ok(response)
    }

    /// GET and parse JSON, `None` on 404
    async fn api_get_optional<T: serde::de::DeserializeOwned>(
        &self,
        base_url: &str,
        url: &str,
    ) -> OsslistResult<Option<T>> {
        let response = self.send(base_url, url).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => parse_json(response).await.map(Some),
            status => Err(api_error(status, url)),
        }
    }

    /// GET and parse JSON, treating 404 as an upstream failure
    async fn api_get<T: serde::de::DeserializeOwned>(&self, base_url: &str, url: &str) -> OsslistResult<T> {
        self.api_get_optional(base_url, url).await?.ok_or_else(|| {
            OsslistError::UpstreamUnavailable(format!("GitLab API error: {} not found", url))
        })
    }

    /// GET one page of a list endpoint together with its pagination links
    async fn api_get_page<T: serde::de::DeserializeOwned>(
        &self,
        base_url: &str,
        url: &str,
    ) -> OsslistResult<(T, PageLinks)> {
        let response = self.send(base_url, url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, url));
        }

        let links = PageLinks::from_headers(response.headers());
        let page = parse_json(response).await?;
        Ok((page, links))
    }
}

/// `<base>/api/v4/projects/<encoded path><suffix>`
fn project_url(base_url: &str, project: &str, suffix: &str) -> String {
    format!(
        "{}/api/v4/projects/{}{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(project),
        suffix
    )
}

fn api_error(status: StatusCode, url: &str) -> OsslistError {
    OsslistError::UpstreamUnavailable(format!("GitLab API error: HTTP {} for {}", status, url))
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> OsslistResult<T> {
    response.json().await.map_err(|e| {
        OsslistError::UpstreamUnavailable(format!("Failed to parse GitLab API response: {}", e))
    })
}

// Implement GitLabProvider trait
#[async_trait]
impl GitLabProvider for GitLabClient {
    async fn get_project(&self, base_url: &str, project: &str) -> OsslistResult<GitLabProject> {
        Self::get_project(self, base_url, project).await
    }

    async fn get_releases(&self, base_url: &str, project: &str) -> OsslistResult<Vec<GitLabRelease>> {
        Self::get_releases(self, base_url, project).await
    }

    async fn get_tags(&self, base_url: &str, project: &str) -> OsslistResult<Vec<GitLabTag>> {
        Self::get_tags(self, base_url, project).await
    }

    async fn get_languages(&self, base_url: &str, project: &str) -> OsslistResult<Vec<(String, f64)>> {
        Self::get_languages(self, base_url, project).await
    }

    async fn get_last_commit(
        &self,
        base_url: &str,
        project: &str,
        branch: &str,
    ) -> OsslistResult<Option<GitLabCommit>> {
        Self::get_last_commit(self, base_url, project, branch).await
    }
}
