use crate::core::path::config_file;
use crate::core::{OsslistError, OsslistResult};
use crate::di::ConfigProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub gitlab: GitLabConfig,

    /// Concurrent reconciliation tasks and URL checks
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Timeout for every HTTP request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub url_check: UrlCheckConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubConfig {
    /// REST API base URL (GitHub Enterprise installs differ)
    #[serde(default = "default_github_api_url")]
    pub api_url: String,

    /// Token forwarded as is; `GITHUB_TOKEN` and `GITHUB_API_KEY` take
    /// precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitLabConfig {
    /// Self-hosted instances, by host name. gitlab.com is always known.
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Token forwarded as is; `GITLAB_TOKEN` takes precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlCheckConfig {
    /// Attempts per URL while the server answers 429
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before retry `n` is `backoff_secs * n`
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default = "default_html")]
    pub html: PathBuf,

    #[serde(default = "default_csv")]
    pub csv: PathBuf,
}

impl OutputConfig {
    /// Resolve relative report paths against `dir`.
    pub fn in_dir(&self, dir: &Path) -> Self {
        Self {
            html: dir.join(&self.html),
            csv: dir.join(&self.csv),
        }
    }
}

fn default_workers() -> usize {
    8
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_secs() -> u64 {
    2
}

fn default_html() -> PathBuf {
    PathBuf::from("table.html")
}

fn default_csv() -> PathBuf {
    PathBuf::from("table.csv")
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api_url(),
            token: None,
        }
    }
}

impl Default for UrlCheckConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html: default_html(),
            csv: default_csv(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            gitlab: GitLabConfig::default(),
            workers: default_workers(),
            request_timeout_secs: default_request_timeout_secs(),
            url_check: UrlCheckConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory, falling back
    /// to defaults if there is none
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\osslist\config.yaml
    /// - Linux: ~/.config/osslist/config.yaml
    /// - macOS: ~/Library/Application Support/osslist/config.yaml
    pub fn load() -> OsslistResult<Self> {
        let config_path = config_file()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    /// Load config from an explicit path, which must exist
    pub fn load_from(path: &Path) -> OsslistResult<Self> {
        if !path.exists() {
            return Err(OsslistError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> OsslistResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| OsslistError::Config(format!("Failed to parse config: {}", e)))?;

        if config.workers == 0 {
            return Err(OsslistError::Config("workers must be at least 1".to_string()));
        }
        Ok(config)
    }
}

impl ConfigProvider for Config {
    fn github_api_url(&self) -> &str {
        &self.github.api_url
    }

    fn github_token(&self) -> Option<&str> {
        self.github.token.as_deref()
    }

    fn gitlab_hosts(&self) -> &[String] {
        &self.gitlab.hosts
    }

    fn gitlab_token(&self) -> Option<&str> {
        self.gitlab.token.as_deref()
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn url_check_attempts(&self) -> u32 {
        self.url_check.max_attempts
    }

    fn url_check_backoff(&self) -> Duration {
        Duration::from_secs(self.url_check.backoff_secs)
    }
}
