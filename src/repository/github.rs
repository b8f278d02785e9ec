use crate::core::{OsslistError, OsslistResult};
use crate::di::GitHubProvider;
use crate::github::types::GitHubRepo;
use crate::project::{Activity, License};
use crate::release::{self, ReleaseInfo, ReleaseSpan, TagInfo};
use crate::repository::degrade;
use crate::repository::languages::dominant_languages;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A GitHub repository behind the uniform adapter surface.
pub struct GitHubAdapter {
    provider: Arc<dyn GitHubProvider>,
    owner: String,
    repo: String,
    info: GitHubRepo,
    releases: OnceCell<ReleaseSpan>,
}

impl GitHubAdapter {
    /// Look the repository up; fails with `InvalidRepository` if it does
    /// not exist.
    pub async fn connect(
        provider: Arc<dyn GitHubProvider>,
        owner: &str,
        repo: &str,
    ) -> OsslistResult<Self> {
        let info = provider.get_repo(owner, repo).await?;
        Ok(Self {
            provider,
            owner: owner.to_string(),
            repo: repo.to_string(),
            info,
            releases: OnceCell::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.info.html_url
    }

    pub(crate) async fn release_span(&self) -> OsslistResult<&ReleaseSpan> {
        self.releases
            .get_or_try_init(|| async {
                let tags = self.release_tags().await?;
                let releases = self.formal_releases().await?;
                Ok::<_, OsslistError>(release::resolve(tags, &releases))
            })
            .await
    }

    /// Version tags with their commit dates. One commit lookup per kept tag.
    async fn release_tags(&self) -> OsslistResult<Vec<TagInfo>> {
        let tags = degrade(
            "tags",
            self.url(),
            self.provider.get_tags(&self.owner, &self.repo).await,
        )?
        .unwrap_or_default();

        let mut resolved = Vec::new();
        for tag in release::select_release_tags(tags, |t| t.name.as_str()) {
            let commit = degrade(
                "tag commit",
                self.url(),
                self.provider
                    .get_commit(&self.owner, &self.repo, &tag.commit.sha)
                    .await,
            )?;
            if let Some(commit_date) = commit.and_then(|c| c.date()) {
                resolved.push(TagInfo {
                    url: format!(
                        "{}/releases/tag/{}",
                        self.url(),
                        urlencoding::encode(&tag.name)
                    ),
                    name: tag.name,
                    commit_date,
                });
            }
        }
        Ok(resolved)
    }

    /// Published releases, oldest first.
    async fn formal_releases(&self) -> OsslistResult<Vec<ReleaseInfo>> {
        let releases = degrade(
            "releases",
            self.url(),
            self.provider.get_releases(&self.owner, &self.repo).await,
        )?
        .unwrap_or_default();

        // GitHub lists newest first; drafts have no public page
        Ok(releases
            .into_iter()
            .rev()
            .filter(|r| !r.draft)
            .map(|r| ReleaseInfo {
                created_at: r.created_at,
                html_url: r.html_url,
            })
            .collect())
    }

    pub async fn license(&self) -> OsslistResult<Option<License>> {
        let license = self.provider.get_license(&self.owner, &self.repo).await?;
        Ok(license.map(|l| License::new(l.license.name, l.html_url)))
    }

    pub async fn last_activity(&self) -> OsslistResult<Activity> {
        let commit = self
            .provider
            .get_last_commit(&self.owner, &self.repo, &self.info.default_branch)
            .await?
            .ok_or_else(|| {
                OsslistError::UpstreamUnavailable(format!("{} has no commits", self.url()))
            })?;

        let date = commit.date().ok_or_else(|| {
            OsslistError::UpstreamUnavailable(format!("commit {} has no date", commit.sha))
        })?;
        Ok(Activity::new(date.date_naive(), commit.html_url))
    }

    pub async fn languages(&self) -> OsslistResult<Vec<String>> {
        let usage = self
            .provider
            .get_languages(&self.owner, &self.repo)
            .await?
            .into_iter()
            .map(|(name, bytes)| (name, bytes as f64))
            .collect();
        Ok(dominant_languages(usage))
    }

    pub async fn topics(&self) -> OsslistResult<Vec<String>> {
        if !self.info.topics.is_empty() {
            return Ok(self.info.topics.clone());
        }
        self.provider.get_topics(&self.owner, &self.repo).await
    }
}
