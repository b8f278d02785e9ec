//! Trait definitions for dependency injection

use crate::core::{InvalidUrl, OsslistResult};
use crate::github::types::{GitHubCommit, GitHubLicense, GitHubRelease, GitHubRepo, GitHubTag};
use crate::gitlab::types::{GitLabCommit, GitLabProject, GitLabRelease, GitLabTag};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for configuration access
///
/// Provides read-only access to application configuration.
/// Implementations should be thread-safe (Send + Sync).
pub trait ConfigProvider: Send + Sync {
    /// Base URL of the GitHub REST API
    fn github_api_url(&self) -> &str;

    /// GitHub token from the configuration file (environment wins)
    fn github_token(&self) -> Option<&str>;

    /// Hosts served by GitLab in addition to gitlab.com
    fn gitlab_hosts(&self) -> &[String];

    /// GitLab token from the configuration file (environment wins)
    fn gitlab_token(&self) -> Option<&str>;

    /// Size of the reconciliation and URL check worker pools
    fn workers(&self) -> usize;

    /// Timeout applied to every HTTP request
    fn request_timeout(&self) -> Duration;

    /// Attempts per URL when the server answers 429
    fn url_check_attempts(&self) -> u32;

    /// Base delay between URL check retries, multiplied by the attempt number
    fn url_check_backoff(&self) -> Duration;
}

/// Raw GitHub REST surface used by the GitHub repository adapter
///
/// Errors follow the client conventions: a missing repository is
/// `InvalidRepository`, other failures are `UpstreamUnavailable`, and an
/// exhausted rate limit is `QuotaExhausted`.
#[async_trait]
pub trait GitHubProvider: Send + Sync {
    async fn get_repo(&self, owner: &str, repo: &str) -> OsslistResult<GitHubRepo>;

    /// Releases, newest first
    async fn get_releases(&self, owner: &str, repo: &str) -> OsslistResult<Vec<GitHubRelease>>;

    async fn get_tags(&self, owner: &str, repo: &str) -> OsslistResult<Vec<GitHubTag>>;

    async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> OsslistResult<GitHubCommit>;

    /// Most recent commit on `branch`, `None` if the branch has no commits
    async fn get_last_commit(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> OsslistResult<Option<GitHubCommit>>;

    /// Detected license, `None` if GitHub found none
    async fn get_license(&self, owner: &str, repo: &str) -> OsslistResult<Option<GitHubLicense>>;

    /// Bytes of code per language
    async fn get_languages(&self, owner: &str, repo: &str) -> OsslistResult<Vec<(String, u64)>>;

    async fn get_topics(&self, owner: &str, repo: &str) -> OsslistResult<Vec<String>>;
}

/// Raw GitLab REST surface used by the GitLab repository adapter
///
/// `base_url` selects the instance, `project` is the `namespace/name` path.
#[async_trait]
pub trait GitLabProvider: Send + Sync {
    async fn get_project(&self, base_url: &str, project: &str) -> OsslistResult<GitLabProject>;

    /// Releases, newest first
    async fn get_releases(&self, base_url: &str, project: &str) -> OsslistResult<Vec<GitLabRelease>>;

    async fn get_tags(&self, base_url: &str, project: &str) -> OsslistResult<Vec<GitLabTag>>;

    /// Share of code per language in percent
    async fn get_languages(&self, base_url: &str, project: &str) -> OsslistResult<Vec<(String, f64)>>;

    async fn get_last_commit(
        &self,
        base_url: &str,
        project: &str,
        branch: &str,
    ) -> OsslistResult<Option<GitLabCommit>>;
}

/// Trait for URL liveness checks
#[async_trait]
pub trait UrlChecker: Send + Sync {
    /// Return the URLs that do not answer with a 2xx status, in input order,
    /// each paired with the status code or failure reason.
    async fn check(&self, urls: &[String]) -> Vec<InvalidUrl>;
}
