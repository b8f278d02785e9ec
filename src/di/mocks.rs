//! Mock implementations of service traits for testing

use super::traits::{ConfigProvider, GitHubProvider, GitLabProvider, UrlChecker};
use crate::core::{InvalidUrl, OsslistError, OsslistResult, UrlFailure};
use crate::github::types::{
    CommitDetails, GitActor, GitHubCommit, GitHubLicense, GitHubRelease, GitHubRepo, GitHubTag,
    LicenseInfo, TagCommit,
};
use crate::gitlab::types::{GitLabCommit, GitLabProject, GitLabRelease, GitLabTag, ReleaseLinks};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Noon UTC of a `YYYY-MM-DD` date.
///
/// Panics on malformed input; mocks are only fed literals.
pub fn mock_datetime(date: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
}

fn quota_exhausted(platform: &'static str) -> OsslistError {
    OsslistError::QuotaExhausted {
        platform,
        reset_in_secs: 3600,
    }
}

fn upstream(what: &str) -> OsslistError {
    OsslistError::UpstreamUnavailable(format!("mock: {} failed", what))
}

/// Mock configuration provider for testing
///
/// # Example
///
/// ```
/// use osslist::di::mocks::MockConfigProvider;
/// use osslist::di::ConfigProvider;
///
/// let config = MockConfigProvider {
///     workers: 1,
///     ..Default::default()
/// };
/// assert_eq!(config.workers(), 1);
/// ```
#[derive(Clone)]
pub struct MockConfigProvider {
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub gitlab_hosts: Vec<String>,
    pub gitlab_token: Option<String>,
    pub workers: usize,
    pub request_timeout: Duration,
    pub url_check_attempts: u32,
    pub url_check_backoff: Duration,
}

impl Default for MockConfigProvider {
    fn default() -> Self {
        Self {
            github_api_url: "https://api.github.com".to_string(),
            github_token: None,
            gitlab_hosts: Vec::new(),
            gitlab_token: None,
            workers: 4,
            request_timeout: Duration::from_secs(5),
            url_check_attempts: 3,
            url_check_backoff: Duration::from_millis(10),
        }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn github_api_url(&self) -> &str {
        &self.github_api_url
    }

    fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    fn gitlab_hosts(&self) -> &[String] {
        &self.gitlab_hosts
    }

    fn gitlab_token(&self) -> Option<&str> {
        self.gitlab_token.as_deref()
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn url_check_attempts(&self) -> u32 {
        self.url_check_attempts
    }

    fn url_check_backoff(&self) -> Duration {
        self.url_check_backoff
    }
}

/// In-memory GitHub repository served by [`MockGitHubProvider`]
#[derive(Clone)]
pub struct MockGitHubRepo {
    pub owner: String,
    pub name: String,
    pub info: GitHubRepo,
    pub releases: Vec<GitHubRelease>,
    pub tags: Vec<GitHubTag>,
    pub commits: HashMap<String, GitHubCommit>,
    pub last_commit: Option<GitHubCommit>,
    pub license: Option<GitHubLicense>,
    pub languages: Vec<(String, u64)>,
    pub topics: Vec<String>,
    pub failing: Vec<&'static str>,
}

impl MockGitHubRepo {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            info: GitHubRepo {
                name: name.to_string(),
                full_name: format!("{}/{}", owner, name),
                html_url: format!("https://github.com/{}/{}", owner, name),
                default_branch: "main".to_string(),
                description: None,
                topics: Vec::new(),
            },
            releases: Vec::new(),
            tags: Vec::new(),
            commits: HashMap::new(),
            last_commit: None,
            license: None,
            languages: Vec::new(),
            topics: Vec::new(),
            failing: Vec::new(),
        }
    }

    fn commit(&self, sha: &str, date: &str) -> GitHubCommit {
        GitHubCommit {
            sha: sha.to_string(),
            html_url: format!("{}/commit/{}", self.info.html_url, sha),
            commit: CommitDetails {
                author: None,
                committer: Some(GitActor {
                    name: Some("mock".to_string()),
                    date: mock_datetime(date),
                }),
            },
        }
    }

    /// Add a formal release created on `date` (`YYYY-MM-DD`)
    pub fn with_release(mut self, tag: &str, date: &str) -> Self {
        self.releases.push(GitHubRelease {
            tag_name: tag.to_string(),
            name: None,
            draft: false,
            prerelease: false,
            html_url: format!("{}/releases/tag/{}", self.info.html_url, tag),
            created_at: mock_datetime(date),
            published_at: None,
        });
        self
    }

    /// Add a tag whose commit is dated `date`
    pub fn with_tag(mut self, name: &str, date: &str) -> Self {
        let sha = format!("sha-{}", name);
        let commit = self.commit(&sha, date);
        self.tags.push(GitHubTag {
            name: name.to_string(),
            commit: TagCommit {
                sha: sha.clone(),
                url: format!("https://api.github.com/repos/{}/commits/{}", self.info.full_name, sha),
            },
        });
        self.commits.insert(sha, commit);
        self
    }

    pub fn with_last_commit(mut self, sha: &str, date: &str) -> Self {
        self.last_commit = Some(self.commit(sha, date));
        self
    }

    pub fn with_license(mut self, name: &str) -> Self {
        self.license = Some(GitHubLicense {
            html_url: Some(format!("{}/blob/main/LICENSE", self.info.html_url)),
            license: LicenseInfo {
                key: name.to_lowercase(),
                name: name.to_string(),
                spdx_id: None,
            },
        });
        self
    }

    pub fn with_languages(mut self, languages: &[(&str, u64)]) -> Self {
        self.languages = languages
            .iter()
            .map(|(name, bytes)| (name.to_string(), *bytes))
            .collect();
        self
    }

    pub fn with_topics(mut self, topics: &[&str]) -> Self {
        self.topics = topics.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Make an endpoint (`"topics"`, `"languages"`, `"tags"`, `"releases"`,
    /// `"commits"`, `"license"`) fail with `UpstreamUnavailable`
    pub fn failing(mut self, endpoint: &'static str) -> Self {
        self.failing.push(endpoint);
        self
    }
}

/// Mock GitHub provider for testing
///
/// Serves repositories registered with [`MockGitHubProvider::add_repo`] and
/// records every call as `"<endpoint> <owner>/<repo>"`.
#[derive(Clone, Default)]
pub struct MockGitHubProvider {
    repos: Arc<Mutex<HashMap<String, MockGitHubRepo>>>,
    calls: Arc<Mutex<Vec<String>>>,
    quota_exhausted: Arc<Mutex<bool>>,
}

impl MockGitHubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repo(&self, repo: MockGitHubRepo) {
        let key = format!("{}/{}", repo.owner, repo.name);
        self.repos.lock().unwrap().insert(key, repo);
    }

    /// Make every following call fail with `QuotaExhausted`
    pub fn exhaust_quota(&self) {
        *self.quota_exhausted.lock().unwrap() = true;
    }

    /// Number of recorded calls to `endpoint`
    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.split(' ').next() == Some(endpoint))
            .count()
    }

    fn lookup(&self, endpoint: &'static str, owner: &str, repo: &str) -> OsslistResult<MockGitHubRepo> {
        let key = format!("{}/{}", owner, repo);
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", endpoint, key));

        if *self.quota_exhausted.lock().unwrap() {
            return Err(quota_exhausted("GitHub"));
        }

        let repos = self.repos.lock().unwrap();
        let found = repos.get(&key).cloned().ok_or_else(|| {
            OsslistError::InvalidRepository(format!("{} not found on GitHub", key))
        })?;

        if found.failing.contains(&endpoint) {
            return Err(upstream(endpoint));
        }
        Ok(found)
    }
}

#[async_trait]
impl GitHubProvider for MockGitHubProvider {
    async fn get_repo(&self, owner: &str, repo: &str) -> OsslistResult<GitHubRepo> {
        Ok(self.lookup("repo", owner, repo)?.info)
    }

    async fn get_releases(&self, owner: &str, repo: &str) -> OsslistResult<Vec<GitHubRelease>> {
        let mut releases = self.lookup("releases", owner, repo)?.releases;
        releases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(releases)
    }

    async fn get_tags(&self, owner: &str, repo: &str) -> OsslistResult<Vec<GitHubTag>> {
        Ok(self.lookup("tags", owner, repo)?.tags)
    }

    async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> OsslistResult<GitHubCommit> {
        self.lookup("commit", owner, repo)?
            .commits
            .remove(sha)
            .ok_or_else(|| upstream("commit"))
    }

    async fn get_last_commit(
        &self,
        owner: &str,
        repo: &str,
        _branch: &str,
    ) -> OsslistResult<Option<GitHubCommit>> {
        Ok(self.lookup("commits", owner, repo)?.last_commit)
    }

    async fn get_license(&self, owner: &str, repo: &str) -> OsslistResult<Option<GitHubLicense>> {
        Ok(self.lookup("license", owner, repo)?.license)
    }

    async fn get_languages(&self, owner: &str, repo: &str) -> OsslistResult<Vec<(String, u64)>> {
        Ok(self.lookup("languages", owner, repo)?.languages)
    }

    async fn get_topics(&self, owner: &str, repo: &str) -> OsslistResult<Vec<String>> {
        Ok(self.lookup("topics", owner, repo)?.topics)
    }
}

/// In-memory GitLab project served by [`MockGitLabProvider`]
#[derive(Clone)]
pub struct MockGitLabProject {
    pub info: GitLabProject,
    pub releases: Vec<GitLabRelease>,
    pub tags: Vec<GitLabTag>,
    pub last_commit: Option<GitLabCommit>,
    pub languages: Vec<(String, f64)>,
    pub failing: Vec<&'static str>,
}

impl MockGitLabProject {
    /// A project at `https://gitlab.com/<path>`
    pub fn new(path: &str) -> Self {
        Self::on_host("https://gitlab.com", path)
    }

    pub fn on_host(base_url: &str, path: &str) -> Self {
        Self {
            info: GitLabProject {
                id: 1,
                path_with_namespace: path.to_string(),
                web_url: format!("{}/{}", base_url, path),
                default_branch: Some("main".to_string()),
                description: None,
                topics: Vec::new(),
                tag_list: Vec::new(),
            },
            releases: Vec::new(),
            tags: Vec::new(),
            last_commit: None,
            languages: Vec::new(),
            failing: Vec::new(),
        }
    }

    fn commit(&self, id: &str, date: &str) -> GitLabCommit {
        GitLabCommit {
            id: id.to_string(),
            created_at: mock_datetime(date),
            committed_date: None,
            web_url: Some(format!("{}/-/commit/{}", self.info.web_url, id)),
        }
    }

    pub fn with_release(mut self, tag: &str, date: &str) -> Self {
        self.releases.push(GitLabRelease {
            tag_name: tag.to_string(),
            name: None,
            created_at: mock_datetime(date),
            released_at: None,
            links: Some(ReleaseLinks {
                self_url: Some(format!("{}/-/releases/{}", self.info.web_url, tag)),
            }),
        });
        self
    }

    pub fn with_tag(mut self, name: &str, date: &str) -> Self {
        let commit = self.commit(&format!("sha-{}", name), date);
        self.tags.push(GitLabTag {
            name: name.to_string(),
            commit,
        });
        self
    }

    pub fn with_last_commit(mut self, id: &str, date: &str) -> Self {
        self.last_commit = Some(self.commit(id, date));
        self
    }

    pub fn with_languages(mut self, languages: &[(&str, f64)]) -> Self {
        self.languages = languages
            .iter()
            .map(|(name, share)| (name.to_string(), *share))
            .collect();
        self
    }

    pub fn with_topics(mut self, topics: &[&str]) -> Self {
        self.info.topics = topics.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Make an endpoint (`"languages"`, `"tags"`, `"releases"`, `"commits"`)
    /// fail with `UpstreamUnavailable`
    pub fn failing(mut self, endpoint: &'static str) -> Self {
        self.failing.push(endpoint);
        self
    }
}

/// Mock GitLab provider for testing, keyed by project path
#[derive(Clone, Default)]
pub struct MockGitLabProvider {
    projects: Arc<Mutex<HashMap<String, MockGitLabProject>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockGitLabProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_project(&self, project: MockGitLabProject) {
        let key = project.info.path_with_namespace.clone();
        self.projects.lock().unwrap().insert(key, project);
    }

    /// Recorded calls as `"<endpoint> <base_url> <project>"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn lookup(&self, endpoint: &'static str, base_url: &str, project: &str) -> OsslistResult<MockGitLabProject> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {} {}", endpoint, base_url, project));

        let projects = self.projects.lock().unwrap();
        let found = projects.get(project).cloned().ok_or_else(|| {
            OsslistError::InvalidRepository(format!("{} not found on {}", project, base_url))
        })?;

        if found.failing.contains(&endpoint) {
            return Err(upstream(endpoint));
        }
        Ok(found)
    }
}

#[async_trait]
impl GitLabProvider for MockGitLabProvider {
    async fn get_project(&self, base_url: &str, project: &str) -> OsslistResult<GitLabProject> {
        Ok(self.lookup("project", base_url, project)?.info)
    }

    async fn get_releases(&self, base_url: &str, project: &str) -> OsslistResult<Vec<GitLabRelease>> {
        let mut releases = self.lookup("releases", base_url, project)?.releases;
        releases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(releases)
    }

    async fn get_tags(&self, base_url: &str, project: &str) -> OsslistResult<Vec<GitLabTag>> {
        Ok(self.lookup("tags", base_url, project)?.tags)
    }

    async fn get_languages(&self, base_url: &str, project: &str) -> OsslistResult<Vec<(String, f64)>> {
        Ok(self.lookup("languages", base_url, project)?.languages)
    }

    async fn get_last_commit(
        &self,
        base_url: &str,
        project: &str,
        _branch: &str,
    ) -> OsslistResult<Option<GitLabCommit>> {
        Ok(self.lookup("commits", base_url, project)?.last_commit)
    }
}

/// Mock URL checker for testing
///
/// Every URL is live unless registered with [`MockUrlChecker::fail`].
#[derive(Clone, Default)]
pub struct MockUrlChecker {
    failures: Arc<Mutex<HashMap<String, UrlFailure>>>,
    checked: Arc<Mutex<Vec<String>>>,
}

impl MockUrlChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, url: &str, reason: UrlFailure) {
        self.failures
            .lock()
            .unwrap()
            .insert(url.to_string(), reason);
    }

    /// Every URL passed to `check` so far
    pub fn checked(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }
}

#[async_trait]
impl UrlChecker for MockUrlChecker {
    async fn check(&self, urls: &[String]) -> Vec<InvalidUrl> {
        self.checked.lock().unwrap().extend(urls.iter().cloned());
        let failures = self.failures.lock().unwrap();
        urls.iter()
            .filter_map(|url| {
                failures.get(url).map(|reason| InvalidUrl {
                    url: url.clone(),
                    reason: reason.clone(),
                })
            })
            .collect()
    }
}
