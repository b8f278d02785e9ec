//! Dependency injection infrastructure for osslist
//!
//! Services are reached through traits so the hosting platform clients and
//! the URL checker can be swapped for in-memory mocks in tests.
//!
//! # Example (Production)
//! ```no_run
//! use osslist::config::Config;
//! use osslist::di::ServiceContainer;
//!
//! # fn example() -> osslist::core::OsslistResult<()> {
//! let container = ServiceContainer::new(Config::load()?)?;
//! let factory = container.adapter_factory();
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use osslist::di::{ServiceContainer, mocks::*};
//! use std::sync::Arc;
//!
//! let config = Arc::new(MockConfigProvider::default());
//! let github = Arc::new(MockGitHubProvider::new());
//! let gitlab = Arc::new(MockGitLabProvider::new());
//! let checker = Arc::new(MockUrlChecker::new());
//!
//! let container = ServiceContainer::with_providers(config, github, gitlab, checker);
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{ConfigProvider, GitHubProvider, GitLabProvider, UrlChecker};
