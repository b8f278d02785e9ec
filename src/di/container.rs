//! Service container for dependency injection

use super::traits::{ConfigProvider, GitHubProvider, GitLabProvider, UrlChecker};
use crate::config::Config;
use crate::core::OsslistResult;
use crate::github::GitHubClient;
use crate::gitlab::GitLabClient;
use crate::repository::AdapterFactory;
use crate::validation::HttpUrlChecker;
use std::sync::Arc;
use tracing::debug;

/// Service container for dependency injection
///
/// Holds the process-wide API clients. They are built once at startup and
/// shared read-only (through `Arc`) by every adapter and worker task, so
/// quota tracking sees every request of the run.
///
/// # Example (Testing)
///
/// ```
/// use osslist::di::{ServiceContainer, mocks::*};
/// use std::sync::Arc;
///
/// let container = ServiceContainer::with_providers(
///     Arc::new(MockConfigProvider::default()),
///     Arc::new(MockGitHubProvider::new()),
///     Arc::new(MockGitLabProvider::new()),
///     Arc::new(MockUrlChecker::new()),
/// );
/// assert_eq!(container.config().workers(), 4);
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<dyn ConfigProvider>,
    pub github: Arc<dyn GitHubProvider>,
    pub gitlab: Arc<dyn GitLabProvider>,
    pub url_checker: Arc<dyn UrlChecker>,
}

impl ServiceContainer {
    /// Create a new service container with production implementations
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built, e.g. because a
    /// token contains characters that are not valid in a header.
    pub fn new(config: Config) -> OsslistResult<Self> {
        let github = GitHubClient::new(&config)?;
        let gitlab = GitLabClient::new(&config)?;
        let url_checker = HttpUrlChecker::new(&config)?;

        debug!(
            workers = config.workers(),
            gitlab_token = gitlab.has_token(),
            "services initialised"
        );

        Ok(Self {
            config: Arc::new(config),
            github: Arc::new(github),
            gitlab: Arc::new(gitlab),
            url_checker: Arc::new(url_checker),
        })
    }

    /// Create a service container with custom provider implementations
    ///
    /// This is primarily useful for testing, where you can inject mock
    /// implementations of each service.
    pub fn with_providers(
        config: Arc<dyn ConfigProvider>,
        github: Arc<dyn GitHubProvider>,
        gitlab: Arc<dyn GitLabProvider>,
        url_checker: Arc<dyn UrlChecker>,
    ) -> Self {
        Self {
            config,
            github,
            gitlab,
            url_checker,
        }
    }

    /// Get the configuration provider
    pub fn config(&self) -> &dyn ConfigProvider {
        self.config.as_ref()
    }

    /// Get the URL checker
    pub fn url_checker(&self) -> &dyn UrlChecker {
        self.url_checker.as_ref()
    }

    /// Build the repository adapter factory over the shared clients
    pub fn adapter_factory(&self) -> AdapterFactory {
        AdapterFactory::new(
            Arc::clone(&self.github),
            Arc::clone(&self.gitlab),
            self.config.gitlab_hosts().to_vec(),
        )
    }
}
