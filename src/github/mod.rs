//! GitHub integration
//!
//! Thin REST client for the parts of the GitHub API the catalog needs:
//! repository metadata, releases, tags, commits, license, languages and
//! topics. Quota is tracked from the rate limit headers of every response.

pub mod client;
pub mod types;

pub use client::GitHubClient;
pub use types::{GitHubCommit, GitHubLicense, GitHubRelease, GitHubRepo, GitHubTag};
