//! Uniform access to hosted repositories
//!
//! A repository URL is resolved once, by host, into a [`RepositoryAdapter`]
//! backed by either the GitHub or the GitLab API. Every query returns a
//! result-or-absent value: failures of a single field degrade to `None`
//! (logged at `warn`), while quota exhaustion is propagated so the caller
//! can stop the run.

pub mod github;
pub mod gitlab;
pub mod languages;

use crate::core::{OsslistError, OsslistResult};
use crate::di::{GitHubProvider, GitLabProvider};
use crate::project::{Activity, License};
use reqwest::Url;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub use github::GitHubAdapter;
pub use gitlab::GitLabAdapter;

const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];
const GITLAB_HOST: &str = "gitlab.com";

/// Hosting platform behind a repository URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    GitHub,
    GitLab,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::GitHub => write!(f, "GitHub"),
            Platform::GitLab => write!(f, "GitLab"),
        }
    }
}

/// Turn a field-level failure into an absent value.
///
/// Fatal errors (quota exhaustion) are passed through unchanged.
pub(crate) fn degrade<T>(field: &str, url: &str, result: OsslistResult<T>) -> OsslistResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            warn!(repository = url, field, "{}", e);
            Ok(None)
        }
    }
}

/// A repository on one of the supported platforms.
pub enum RepositoryAdapter {
    GitHub(GitHubAdapter),
    GitLab(GitLabAdapter),
}

impl RepositoryAdapter {
    pub fn platform(&self) -> Platform {
        match self {
            RepositoryAdapter::GitHub(_) => Platform::GitHub,
            RepositoryAdapter::GitLab(_) => Platform::GitLab,
        }
    }

    /// Canonical web URL as reported by the platform.
    pub fn url(&self) -> &str {
        match self {
            RepositoryAdapter::GitHub(adapter) => adapter.url(),
            RepositoryAdapter::GitLab(adapter) => adapter.url(),
        }
    }

    pub async fn latest_release(&self) -> OsslistResult<Option<Activity>> {
        let span = match self {
            RepositoryAdapter::GitHub(adapter) => adapter.release_span().await?,
            RepositoryAdapter::GitLab(adapter) => adapter.release_span().await?,
        };
        Ok(span.latest.clone())
    }

    pub async fn first_release(&self) -> OsslistResult<Option<Activity>> {
        let span = match self {
            RepositoryAdapter::GitHub(adapter) => adapter.release_span().await?,
            RepositoryAdapter::GitLab(adapter) => adapter.release_span().await?,
        };
        Ok(span.first.clone())
    }

    /// License detected by the platform. Always absent on GitLab.
    pub async fn license(&self) -> OsslistResult<Option<License>> {
        match self {
            RepositoryAdapter::GitHub(adapter) => {
                Ok(degrade("license", adapter.url(), adapter.license().await)?.flatten())
            }
            RepositoryAdapter::GitLab(_) => Ok(None),
        }
    }

    /// Most recent commit on the default branch.
    ///
    /// Fails with `UpstreamUnavailable` when no commit can be retrieved.
    pub async fn last_activity(&self) -> OsslistResult<Activity> {
        match self {
            RepositoryAdapter::GitHub(adapter) => adapter.last_activity().await,
            RepositoryAdapter::GitLab(adapter) => adapter.last_activity().await,
        }
    }

    /// Languages covering more than 80% of the code, most used first.
    pub async fn languages(&self) -> OsslistResult<Option<Vec<String>>> {
        let languages = match self {
            RepositoryAdapter::GitHub(adapter) => {
                degrade("languages", adapter.url(), adapter.languages().await)?
            }
            RepositoryAdapter::GitLab(adapter) => {
                degrade("languages", adapter.url(), adapter.languages().await)?
            }
        };
        Ok(languages.filter(|languages| !languages.is_empty()))
    }

    /// Topic labels; empty when the platform call fails.
    pub async fn tags(&self) -> OsslistResult<BTreeSet<String>> {
        let topics = match self {
            RepositoryAdapter::GitHub(adapter) => {
                degrade("tags", adapter.url(), adapter.topics().await)?.unwrap_or_default()
            }
            RepositoryAdapter::GitLab(adapter) => adapter.topics(),
        };
        Ok(topics.into_iter().collect())
    }
}

/// Owner and name from a repository URL path.
///
/// The path must have exactly two non-empty segments once a trailing `/`
/// and `.git` suffix are removed.
pub fn repository_path(url: &Url) -> OsslistResult<(String, String)> {
    let path = url.path().trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [owner, name] if path.matches('/').count() == 2 => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(OsslistError::InvalidRepository(format!(
            "{} is not an owner/repository path",
            url
        ))),
    }
}

/// Selects and connects the adapter for a repository URL.
///
/// Holds the shared API clients; cheap to share between worker tasks.
pub struct AdapterFactory {
    github: Arc<dyn GitHubProvider>,
    gitlab: Arc<dyn GitLabProvider>,
    gitlab_hosts: Vec<String>,
}

impl AdapterFactory {
    pub fn new(
        github: Arc<dyn GitHubProvider>,
        gitlab: Arc<dyn GitLabProvider>,
        gitlab_hosts: Vec<String>,
    ) -> Self {
        Self {
            github,
            gitlab,
            gitlab_hosts,
        }
    }

    pub fn is_gitlab_host(&self, host: &str) -> bool {
        host.eq_ignore_ascii_case(GITLAB_HOST)
            || self
                .gitlab_hosts
                .iter()
                .any(|configured| configured.eq_ignore_ascii_case(host))
    }

    /// Platform serving `url`, if any.
    pub fn platform_for(&self, url: &Url) -> Option<Platform> {
        let host = url.host_str()?;
        if GITHUB_HOSTS.iter().any(|h| h.eq_ignore_ascii_case(host)) {
            Some(Platform::GitHub)
        } else if self.is_gitlab_host(host) {
            Some(Platform::GitLab)
        } else {
            None
        }
    }

    /// Resolve `url` into a connected adapter.
    ///
    /// # Errors
    ///
    /// `InvalidRepository` if the URL is malformed, on an unknown host, not
    /// an owner/repository path, or the repository does not exist.
    pub async fn connect(&self, url: &str) -> OsslistResult<RepositoryAdapter> {
        let parsed = Url::parse(url)
            .map_err(|e| OsslistError::InvalidRepository(format!("{}: {}", url, e)))?;

        let platform = self.platform_for(&parsed).ok_or_else(|| {
            OsslistError::InvalidRepository(format!("{} is not on a supported platform", url))
        })?;
        let (owner, name) = repository_path(&parsed)?;
        debug!(%platform, owner = %owner, name = %name, "connecting repository");

        match platform {
            Platform::GitHub => {
                let adapter = GitHubAdapter::connect(Arc::clone(&self.github), &owner, &name).await?;
                Ok(RepositoryAdapter::GitHub(adapter))
            }
            Platform::GitLab => {
                let base_url = base_url(&parsed);
                let path = format!("{}/{}", owner, name);
                let adapter = GitLabAdapter::connect(Arc::clone(&self.gitlab), &base_url, &path).await?;
                Ok(RepositoryAdapter::GitLab(adapter))
            }
        }
    }
}

/// `scheme://host[:port]` of an instance.
fn base_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}
