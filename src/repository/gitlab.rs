use crate::core::{OsslistError, OsslistResult};
use crate::di::GitLabProvider;
use crate::gitlab::types::GitLabProject;
use crate::project::Activity;
use crate::release::{self, ReleaseInfo, ReleaseSpan, TagInfo};
use crate::repository::degrade;
use crate::repository::languages::dominant_languages;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A GitLab project behind the uniform adapter surface.
///
/// GitLab offers no license field that works reliably across projects, so
/// this adapter never reports one.
pub struct GitLabAdapter {
    provider: Arc<dyn GitLabProvider>,
    base_url: String,
    path: String,
    project: GitLabProject,
    releases: OnceCell<ReleaseSpan>,
}

impl GitLabAdapter {
    /// Look the project up; fails with `InvalidRepository` if it does not
    /// exist on the instance at `base_url`.
    pub async fn connect(
        provider: Arc<dyn GitLabProvider>,
        base_url: &str,
        path: &str,
    ) -> OsslistResult<Self> {
        let project = provider.get_project(base_url, path).await?;
        Ok(Self {
            provider,
            base_url: base_url.to_string(),
            path: path.to_string(),
            project,
            releases: OnceCell::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.project.web_url
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

    /// Version tags; GitLab embeds the commit so no extra lookups are needed.
    async fn release_tags(&self) -> OsslistResult<Vec<TagInfo>> {
        let tags = degrade(
            "tags",
            self.url(),
            self.provider.get_tags(&self.base_url, &self.path).await,
        )?
        .unwrap_or_default();

        Ok(release::select_release_tags(tags, |t| t.name.as_str())
            .into_iter()
            .map(|tag| TagInfo {
                url: format!("{}/-/tags/{}", self.url(), urlencoding::encode(&tag.name)),
                commit_date: tag.commit.date(),
                name: tag.name,
            })
            .collect())
    }

    /// Releases, oldest first.
    async fn formal_releases(&self) -> OsslistResult<Vec<ReleaseInfo>> {
        let releases = degrade(
            "releases",
            self.url(),
            self.provider.get_releases(&self.base_url, &self.path).await,
        )?
        .unwrap_or_default();

        Ok(releases
            .into_iter()
            .rev()
            .map(|r| {
                let html_url = r
                    .links
                    .and_then(|links| links.self_url)
                    .unwrap_or_else(|| {
                        format!(
                            "{}/-/releases/{}",
                            self.url(),
                            urlencoding::encode(&r.tag_name)
                        )
                    });
                ReleaseInfo {
                    created_at: r.created_at,
                    html_url,
                }
            })
            .collect())
    }

    pub async fn last_activity(&self) -> OsslistResult<Activity> {
        let branch = self.project.default_branch.as_deref().ok_or_else(|| {
            OsslistError::UpstreamUnavailable(format!("{} has no default branch", self.url()))
        })?;

        let commit = self
            .provider
            .get_last_commit(&self.base_url, &self.path, branch)
            .await?
            .ok_or_else(|| {
                OsslistError::UpstreamUnavailable(format!("{} has no commits", self.url()))
            })?;

        let url = commit
            .web_url
            .clone()
            .unwrap_or_else(|| format!("{}/-/commit/{}", self.url(), commit.id));
        Ok(Activity::new(commit.date().date_naive(), url))
    }

    pub async fn languages(&self) -> OsslistResult<Vec<String>> {
        let usage = self
            .provider
            .get_languages(&self.base_url, &self.path)
            .await?;
        Ok(dominant_languages(usage))
    }

    pub fn topics(&self) -> Vec<String> {
        self.project.labels().to_vec()
    }
}
