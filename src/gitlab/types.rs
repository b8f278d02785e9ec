//! GitLab API type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitLab project information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabProject {
    pub id: u64,
    pub path_with_namespace: String,
    pub web_url: String,
    pub default_branch: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Deprecated alias of `topics`, still returned by older instances.
    #[serde(default)]
    pub tag_list: Vec<String>,
}

impl GitLabProject {
    pub fn labels(&self) -> &[String] {
        if self.topics.is_empty() {
            &self.tag_list
        } else {
            &self.topics
        }
    }
}

/// GitLab release information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabRelease {
    pub tag_name: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub released_at: Option<DateTime<Utc>>,
    #[serde(rename = "_links", default)]
    pub links: Option<ReleaseLinks>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseLinks {
    #[serde(rename = "self")]
    pub self_url: Option<String>,
}

/// GitLab repository tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabTag {
    pub name: String,
    pub commit: GitLabCommit,
}

/// GitLab commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabCommit {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub committed_date: Option<DateTime<Utc>>,
    pub web_url: Option<String>,
}

impl GitLabCommit {
    /// Commit date, falling back to the creation date.
    pub fn date(&self) -> DateTime<Utc> {
        self.committed_date.unwrap_or(self.created_at)
    }
}
