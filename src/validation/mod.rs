//! Syntax and liveness checks for the URLs in the input file

pub mod checker;

pub use checker::HttpUrlChecker;

use crate::core::{InvalidUrl, OsslistError, OsslistResult, UrlFailure};
use crate::di::UrlChecker;
use crate::input::ProjectInput;
use clap::ValueEnum;
use reqwest::Url;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// What to do with URLs that fail validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum InvalidUrlStrategy {
    /// Do not report anything
    Ignore,
    /// List invalid URLs and continue
    #[default]
    Report,
    /// Stop the run
    Abort,
}

/// URLs that failed validation, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlReport {
    pub invalid: Vec<InvalidUrl>,
}

impl UrlReport {
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Act on the report according to `strategy`.
    pub fn apply_strategy(self, strategy: InvalidUrlStrategy) -> OsslistResult<()> {
        if self.is_clean() {
            return Ok(());
        }
        match strategy {
            InvalidUrlStrategy::Ignore => Ok(()),
            InvalidUrlStrategy::Report => {
                for invalid in &self.invalid {
                    warn!(url = %invalid.url, reason = %invalid.reason, "invalid URL");
                }
                eprintln!("{}", self.summary());
                Ok(())
            }
            InvalidUrlStrategy::Abort => Err(OsslistError::InvalidUrl(self.invalid)),
        }
    }

    /// Human readable listing for the terminal.
    pub fn summary(&self) -> String {
        let mut out = format!("{} invalid URL(s):", self.invalid.len());
        for invalid in &self.invalid {
            out.push_str(&format!("\n  {}", invalid));
        }
        out
    }
}

/// Repository and homepage URLs of every entry, deduplicated, in input order.
pub fn collect_urls(input: &ProjectInput) -> Vec<String> {
    let mut seen = HashSet::new();
    input
        .entries()
        .flat_map(|(_, project)| {
            std::iter::once(project.repository.clone()).chain(project.homepage.clone())
        })
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Check that `url` is an absolute http(s) URL.
pub fn check_syntax(url: &str) -> Result<Url, UrlFailure> {
    let parsed = Url::parse(url).map_err(|e| UrlFailure::Malformed(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        "http" | "https" => Err(UrlFailure::Malformed("missing host".to_string())),
        scheme => Err(UrlFailure::Malformed(format!("unsupported scheme '{}'", scheme))),
    }
}

/// Validate every URL of the input.
///
/// Malformed URLs are reported without a request; the rest are handed to
/// `checker` for liveness.
pub async fn validate(input: &ProjectInput, checker: &dyn UrlChecker) -> UrlReport {
    let urls = collect_urls(input);
    info!(urls = urls.len(), "validating URLs");

    let mut malformed = Vec::new();
    let mut candidates = Vec::new();
    for url in &urls {
        match check_syntax(url) {
            Ok(_) => candidates.push(url.clone()),
            Err(reason) => malformed.push(InvalidUrl {
                url: url.clone(),
                reason,
            }),
        }
    }

    let mut invalid = malformed;
    invalid.extend(checker.check(&candidates).await);

    // restore input order across both kinds of failure
    let position: HashMap<&str, usize> = urls
        .iter()
        .enumerate()
        .map(|(index, url)| (url.as_str(), index))
        .collect();
    invalid.sort_by_key(|i| position.get(i.url.as_str()).copied().unwrap_or(usize::MAX));

    UrlReport { invalid }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::mocks::MockUrlChecker;

    fn input() -> ProjectInput {
        ProjectInput::parse(
            r#"
A:
  - name: a
    repository: https://github.com/o/a
    description: d
    homepage: https://a.example
  - name: b
    repository: ftp://files.example/b
    description: d
    homepage: https://a.example
  - name: c
    repository: https://github.com/o/c
    description: d
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_collect_urls_dedups_in_order() {
        assert_eq!(
            collect_urls(&input()),
            vec![
                "https://github.com/o/a",
                "https://a.example",
                "ftp://files.example/b",
                "https://github.com/o/c",
            ]
        );
    }

    #[test]
    fn test_check_syntax() {
        assert!(check_syntax("https://example.com/x").is_ok());
        assert!(matches!(check_syntax("example.com"), Err(UrlFailure::Malformed(_))));
        assert!(matches!(
            check_syntax("ftp://example.com"),
            Err(UrlFailure::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_combines_syntax_and_liveness() {
        let checker = MockUrlChecker::new();
        checker.fail("https://github.com/o/c", UrlFailure::Status(404));
        checker.fail("https://a.example", UrlFailure::Status(500));

        let report = validate(&input(), &checker).await;

        let urls: Vec<&str> = report.invalid.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://a.example", "ftp://files.example/b", "https://github.com/o/c"]
        );
        // malformed URLs are never requested
        assert!(!checker.checked().contains(&"ftp://files.example/b".to_string()));
    }

    #[test]
    fn test_strategies() {
        let report = UrlReport {
            invalid: vec![InvalidUrl {
                url: "https://dead.example".to_string(),
                reason: UrlFailure::Status(404),
            }],
        };

        assert!(report.clone().apply_strategy(InvalidUrlStrategy::Ignore).is_ok());
        assert!(report.clone().apply_strategy(InvalidUrlStrategy::Report).is_ok());
        match report.apply_strategy(InvalidUrlStrategy::Abort) {
            Err(OsslistError::InvalidUrl(urls)) => assert_eq!(urls.len(), 1),
            other => panic!("expected abort, got {:?}", other),
        }
    }

    #[test]
    fn test_clean_report_never_aborts() {
        assert!(UrlReport::default()
            .apply_strategy(InvalidUrlStrategy::Abort)
            .is_ok());
    }

    #[test]
    fn test_summary() {
        let report = UrlReport {
            invalid: vec![InvalidUrl {
                url: "https://dead.example".to_string(),
                reason: UrlFailure::Status(404),
            }],
        };
        assert_eq!(report.summary(), "1 invalid URL(s):\n  https://dead.example: HTTP 404");
    }
}
