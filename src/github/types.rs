//! GitHub API type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub repository information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub default_branch: String,
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// GitHub release information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// GitHub tag information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubTag {
    pub name: String,
    pub commit: TagCommit,
}

/// Commit reference in a tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCommit {
    pub sha: String,
    pub url: String,
}

/// A commit as returned by the commits endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCommit {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetails {
    pub author: Option<GitActor>,
    pub committer: Option<GitActor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitActor {
    pub name: Option<String>,
    pub date: DateTime<Utc>,
}

impl GitHubCommit {
    /// Committer date, falling back to the author date.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.commit
            .committer
            .as_ref()
            .or(self.commit.author.as_ref())
            .map(|actor| actor.date)
    }
}

/// Response of `GET /repos/{owner}/{repo}/license`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubLicense {
    pub html_url: Option<String>,
    pub license: LicenseInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub key: String,
    pub name: String,
    pub spdx_id: Option<String>,
}

/// Response of `GET /repos/{owner}/{repo}/topics`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubTopics {
    #[serde(default)]
    pub names: Vec<String>,
}
