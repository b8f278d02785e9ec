//! GitLab integration
//!
//! REST client for gitlab.com and self-hosted GitLab instances. Projects are
//! addressed by their URL-encoded `namespace/name` path.

pub mod client;
pub mod types;

pub use client::GitLabClient;
pub use types::{GitLabCommit, GitLabProject, GitLabRelease, GitLabTag};
