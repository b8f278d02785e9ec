//! Merging of user supplied fields with repository data
//!
//! A user value always wins when present. Otherwise the field is taken from
//! the repository adapter, and only fields the user left out are queried.
//! A record is always produced: an unreachable or unsupported repository
//! only leaves the repository derived fields absent.

use crate::core::OsslistResult;
use crate::input::RawProject;
use crate::project::{Activity, License, ProjectRecord};
use crate::repository::{degrade, AdapterFactory, RepositoryAdapter};
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds [`ProjectRecord`]s from raw entries.
#[derive(Clone)]
pub struct ProjectReconciler {
    factory: Arc<AdapterFactory>,
}

impl ProjectReconciler {
    pub fn new(factory: Arc<AdapterFactory>) -> Self {
        Self { factory }
    }

    /// Reconcile one entry, connecting to its repository if possible.
    ///
    /// # Errors
    ///
    /// Only fatal errors (quota exhaustion) are returned; everything else
    /// degrades the affected fields.
    pub async fn reconcile(&self, raw: &RawProject) -> OsslistResult<ProjectRecord> {
        let adapter = degrade(
            "repository",
            &raw.repository,
            self.factory.connect(&raw.repository).await,
        )?;
        Self::reconcile_with(raw, adapter.as_ref()).await
    }

    /// Reconcile one entry against an already connected adapter, or none.
    pub async fn reconcile_with(
        raw: &RawProject,
        adapter: Option<&RepositoryAdapter>,
    ) -> OsslistResult<ProjectRecord> {
        let mut record = ProjectRecord::new(&raw.name, &raw.repository, &raw.description);
        record.homepage = raw.homepage.as_deref().and_then(|homepage| valid_homepage(&raw.name, homepage));

        if let Some(license) = &raw.license {
            record.license = Some(License::new(license, None));
        }
        if let Some(date) = raw.first_release {
            record.first_release = Some(Activity::dated(date));
        }
        record.languages = raw.languages.clone();
        if let Some(tags) = &raw.tags {
            record.tags = tags.iter().cloned().collect();
        }

        let Some(adapter) = adapter else {
            return Ok(record);
        };
        debug!(project = %raw.name, platform = %adapter.platform(), "querying repository");

        if record.license.is_none() {
            record.license = adapter.license().await?;
        }
        if record.first_release.is_none() {
            record.first_release = adapter.first_release().await?;
        }
        if record.languages.is_none() {
            record.languages = adapter.languages().await?;
        }
        if raw.tags.is_none() {
            record.tags = adapter.tags().await?;
        }
        record.latest_release = adapter.latest_release().await?;
        record.last_update = degrade("last update", adapter.url(), adapter.last_activity().await)?;

        Ok(record)
    }
}

fn valid_homepage(project: &str, homepage: &str) -> Option<String> {
    match Url::parse(homepage) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(homepage.to_string()),
        _ => {
            warn!(project, homepage, "dropping invalid homepage");
            None
        }
    }
}
