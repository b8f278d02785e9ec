//! HTTP liveness checks

use crate::core::{InvalidUrl, OsslistError, OsslistResult, UrlFailure};
use crate::di::traits::{ConfigProvider, UrlChecker};
use async_trait::async_trait;
use reqwest::{header, Client as HttpClient, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

/// Checks URLs with `HEAD` requests, falling back to `GET` for servers that
/// reject `HEAD`.
///
/// A 429 answer is retried after `backoff × attempt`; any other non 2xx
/// status is final.
#[derive(Clone)]
pub struct HttpUrlChecker {
    http_client: HttpClient,
    workers: usize,
    max_attempts: u32,
    backoff: Duration,
}

impl HttpUrlChecker {
    pub fn new(config: &dyn ConfigProvider) -> OsslistResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("osslist"),
        );

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| OsslistError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            workers: config.workers().max(1),
            max_attempts: config.url_check_attempts().max(1),
            backoff: config.url_check_backoff(),
        })
    }

    /// Status of `url`, or the transport failure.
    async fn status(&self, url: &str) -> Result<StatusCode, String> {
        let response = self
            .http_client
            .head(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status() != StatusCode::METHOD_NOT_ALLOWED {
            return Ok(response.status());
        }

        debug!(url, "HEAD not allowed, retrying with GET");
        self.http_client
            .get(url)
            .send()
            .await
            .map(|response| response.status())
            .map_err(|e| e.to_string())
    }

    /// Delay before retry number `attempt`, counting from 1.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }

    /// Check one URL; `None` when it is live.
    pub async fn check_one(&self, url: &str) -> Option<UrlFailure> {
        let mut attempt = 1;
        loop {
            match self.status(url).await {
                Ok(status) if status.is_success() => return None,
                Ok(StatusCode::TOO_MANY_REQUESTS) if attempt < self.max_attempts => {
                    let delay = self.retry_delay(attempt);
                    debug!(url, attempt, ?delay, "rate limited, backing off");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Ok(status) => return Some(UrlFailure::Status(status.as_u16())),
                Err(reason) => return Some(UrlFailure::Transport(reason)),
            }
        }
    }
}

type Checked = (usize, Option<UrlFailure>);

/// Results of the checks spawned so far, keyed by input position.
#[derive(Default)]
struct Outcomes {
    pending: HashMap<usize, String>,
    checked: Vec<(usize, String, Option<UrlFailure>)>,
    lost: Option<String>,
}

impl Outcomes {
    fn spawned(&mut self, index: usize, url: String) {
        self.pending.insert(index, url);
    }

    fn record(&mut self, joined: Result<Checked, JoinError>) {
        match joined {
            Ok((index, failure)) => {
                if let Some(url) = self.pending.remove(&index) {
                    self.checked.push((index, url, failure));
                }
            }
            Err(e) => {
                warn!(error = %e, "URL check task failed");
                self.lost = Some(e.to_string());
            }
        }
    }

    /// Failures in input order. Checks whose task died count as transport
    /// failures.
    fn finish(mut self) -> Vec<InvalidUrl> {
        let reason = self.lost.unwrap_or_else(|| "check did not complete".to_string());
        for (index, url) in self.pending {
            let failure = UrlFailure::Transport(reason.clone());
            self.checked.push((index, url, Some(failure)));
        }

        self.checked.sort_by_key(|(index, _, _)| *index);
        self.checked
            .into_iter()
            .filter_map(|(_, url, failure)| failure.map(|reason| InvalidUrl { url, reason }))
            .collect()
    }
}

#[async_trait]
impl UrlChecker for HttpUrlChecker {
    async fn check(&self, urls: &[String]) -> Vec<InvalidUrl> {
        let mut outcomes = Outcomes::default();
        let mut join_set = JoinSet::new();

        for (index, url) in urls.iter().enumerate() {
            if join_set.len() >= self.workers {
                if let Some(joined) = join_set.join_next().await {
                    outcomes.record(joined);
                }
            }

            outcomes.spawned(index, url.clone());
            let checker = self.clone();
            let url = url.clone();
            join_set.spawn(async move { (index, checker.check_one(&url).await) });
        }

        while let Some(joined) = join_set.join_next().await {
            outcomes.record(joined);
        }
        outcomes.finish()
    }
}
