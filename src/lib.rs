//! osslist: catalogs of open-source projects
//!
//! A curated YAML list of projects is reconciled with data from the GitHub
//! and GitLab APIs (license, languages, topics, release history, last
//! activity) and rendered as HTML and CSV reports.

pub use osslist_core::{format_error_with_help, ErrorHelp, OsslistError, OsslistResult};

/// Errors, natural ordering, paths and API quota tracking.
pub mod core;

/// Configuration management.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// GitHub REST client.
pub mod github;

/// GitLab REST client.
pub mod gitlab;

/// Uniform repository adapters over both platforms.
pub mod repository;

/// First and latest release resolution.
pub mod release;

/// Project records and their reconciliation.
pub mod project;

/// Grouped, ordered collection of projects.
pub mod catalog;

/// Input file loading.
pub mod input;

/// URL syntax and liveness checks.
pub mod validation;

/// HTML and CSV reports.
pub mod report;
