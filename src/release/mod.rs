//! Picks the canonical first and latest release of a repository from its
//! version tags and its formal releases.
//!
//! Tags are only a proxy for releases: a tag counts when its name looks like
//! a version (`v1.3.4`, `v 4.0`, `1.2`). Large tag lists are cut down to the
//! two lowest and two highest names in natural order before their commit
//! dates are fetched. This bounds API cost and can miss the chronologically
//! earliest or latest tag when tag names are not monotonic with dates.

use crate::core::natural;
use crate::project::Activity;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Above this many release tags only the extremes are kept.
pub const MAX_RELEASE_TAGS: usize = 8;

/// Tags kept at each end of the natural order when reducing.
const KEPT_PER_END: usize = 2;

static RELEASE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v? ?\d+\.\d+(?:\.\d+)?").expect("release tag pattern is valid")
});

/// Whether a tag name looks like a version.
///
/// The pattern is anchored at the start only, so `v1.2.3-rc1` and
/// `1.0_final` count as well.
pub fn is_release_tag(name: &str) -> bool {
    RELEASE_TAG.is_match(name)
}

/// Keep the version tags worth resolving, in natural order by name.
pub fn select_release_tags<T, F>(tags: Vec<T>, name: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut release_tags: Vec<T> = tags
        .into_iter()
        .filter(|tag| is_release_tag(name(tag)))
        .collect();
    natural::sort_by_key(&mut release_tags, &name);

    if release_tags.len() > MAX_RELEASE_TAGS {
        let tail = release_tags.split_off(release_tags.len() - KEPT_PER_END);
        release_tags.truncate(KEPT_PER_END);
        release_tags.extend(tail);
    }

    release_tags
}

/// A version tag with the date of the commit it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub commit_date: DateTime<Utc>,
    /// Page of the tag on the hosting platform.
    pub url: String,
}

/// A formal release object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

/// The resolved release range of a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseSpan {
    pub first: Option<Activity>,
    pub latest: Option<Activity>,
}

/// Resolve first and latest release.
///
/// `releases` must be ordered oldest first. When a tag and a release are
/// dated the same day the formal release wins.
pub fn resolve(mut tags: Vec<TagInfo>, releases: &[ReleaseInfo]) -> ReleaseSpan {
    tags.sort_by_key(|tag| tag.commit_date);

    let first_tag = tags.first();
    let latest_tag = tags.last();
    let first_release = releases.first();
    let latest_release = releases.last();

    let first = match (first_tag, first_release) {
        (Some(tag), Some(release)) if tag.commit_date.date_naive() < release.created_at.date_naive() => {
            Some(tag_activity(tag))
        }
        (_, Some(release)) => Some(release_activity(release)),
        (Some(tag), None) => Some(tag_activity(tag)),
        (None, None) => None,
    };

    let latest = match (latest_tag, latest_release) {
        (Some(tag), Some(release)) if tag.commit_date.date_naive() > release.created_at.date_naive() => {
            Some(tag_activity(tag))
        }
        (_, Some(release)) => Some(release_activity(release)),
        (Some(tag), None) => Some(tag_activity(tag)),
        (None, None) => None,
    };

    ReleaseSpan { first, latest }
}

fn tag_activity(tag: &TagInfo) -> Activity {
    Activity::new(tag.commit_date.date_naive(), tag.url.clone())
}

fn release_activity(release: &ReleaseInfo) -> Activity {
    Activity::new(release.created_at.date_naive(), release.html_url.clone())
}
