use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type OsslistResult<T> = Result<T, OsslistError>;

#[derive(Error, Debug)]
pub enum OsslistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A mandatory field is missing or has the wrong type.
    #[error("Invalid project entry: {0}")]
    FatalInput(String),

    /// Two or more records share a name anywhere in the catalog.
    #[error("Duplicate project names: {}", .0.join(", "))]
    DuplicateProject(Vec<String>),

    /// Raised only when invalid URLs are configured to abort the run.
    #[error("{} invalid URL(s): {}", .0.len(), list_urls(.0))]
    InvalidUrl(Vec<InvalidUrl>),

    /// The URL does not name an owner/repo on a supported host, or the
    /// repository does not exist.
    #[error("Invalid repository: {0}")]
    InvalidRepository(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("{platform} API rate limit exhausted (resets in {reset_in_secs}s)")]
    QuotaExhausted {
        platform: &'static str,
        reset_in_secs: u64,
    },

    /// A reconciliation task panicked or was cancelled.
    #[error("Task failed: {0}")]
    Task(String),
}

impl OsslistError {
    /// Whether the error terminates the whole run.
    ///
    /// Adapter level failures (`InvalidRepository`, `UpstreamUnavailable`)
    /// only degrade a single record and are never fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            OsslistError::InvalidRepository(_) | OsslistError::UpstreamUnavailable(_)
        )
    }
}

/// Why a URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "lowercase")]
pub enum UrlFailure {
    /// Not a syntactically valid http(s) URL.
    Malformed(String),
    /// The server answered with a non 2xx status.
    Status(u16),
    /// The request never produced a response.
    Transport(String),
}

impl fmt::Display for UrlFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlFailure::Malformed(reason) => write!(f, "malformed ({})", reason),
            UrlFailure::Status(code) => write!(f, "HTTP {}", code),
            UrlFailure::Transport(reason) => write!(f, "unreachable ({})", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidUrl {
    pub url: String,
    pub reason: UrlFailure,
}

impl fmt::Display for InvalidUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.url, self.reason)
    }
}

fn list_urls(urls: &[InvalidUrl]) -> String {
    urls.iter()
        .map(|u| u.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
