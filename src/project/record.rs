use crate::project::types::{Activity, License};
use serde::Serialize;
use std::collections::BTreeSet;

/// One project after merging user supplied fields with repository data.
///
/// `name` is the catalog wide key. Optional fields are `None` when neither
/// the user nor the repository provided them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
    pub name: String,
    pub repository_url: String,
    pub description: String,
    pub homepage: Option<String>,
    pub license: Option<License>,
    pub languages: Option<Vec<String>>,
    pub tags: BTreeSet<String>,
    pub first_release: Option<Activity>,
    pub latest_release: Option<Activity>,
    pub last_update: Option<Activity>,
}

impl ProjectRecord {
    /// A record carrying only the mandatory fields.
    pub fn new(
        name: impl Into<String>,
        repository_url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            repository_url: repository_url.into(),
            description: description.into(),
            homepage: None,
            license: None,
            languages: None,
            tags: BTreeSet::new(),
            first_release: None,
            latest_release: None,
            last_update: None,
        }
    }
}
