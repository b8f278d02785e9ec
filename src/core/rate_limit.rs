use crate::core::{OsslistError, OsslistResult};
use reqwest::header::HeaderMap;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;

/// Remaining request quota for one hosting platform.
///
/// One limiter is created per API client at startup and shared by every
/// adapter through that client. Once the platform reports zero remaining
/// requests, calls fail fast with `QuotaExhausted` until the reset time.
pub struct RateLimiter {
    platform: &'static str,
    remaining: Mutex<u64>,
    reset_time: Mutex<SystemTime>,
}

impl RateLimiter {
    pub fn new(platform: &'static str, initial_quota: u64) -> Self {
        Self {
            platform,
            remaining: Mutex::new(initial_quota),
            reset_time: Mutex::new(SystemTime::now() + Duration::from_secs(3600)),
        }
    }

    pub fn platform(&self) -> &'static str {
        self.platform
    }

    pub async fn remaining(&self) -> u64 {
        *self.remaining.lock().await
    }

    /// Fail with `QuotaExhausted` if no requests are left before the reset.
    pub async fn check(&self) -> OsslistResult<()> {
        let remaining = *self.remaining.lock().await;
        if remaining > 0 {
            return Ok(());
        }

        let reset_time = *self.reset_time.lock().await;
        let now = SystemTime::now();
        if now < reset_time {
            return Err(self.exhausted_until(reset_time));
        }

        Ok(())
    }

    /// The error to report for a response that was rejected for quota reasons.
    pub async fn exhausted(&self) -> OsslistError {
        let reset_time = *self.reset_time.lock().await;
        self.exhausted_until(reset_time)
    }

    fn exhausted_until(&self, reset_time: SystemTime) -> OsslistError {
        let wait = reset_time
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO);
        OsslistError::QuotaExhausted {
            platform: self.platform,
            reset_in_secs: wait.as_secs(),
        }
    }

    /// Update the counters from response headers.
    ///
    /// `reset_header` carries a unix timestamp on both GitHub and GitLab.
    pub async fn update(&self, headers: &HeaderMap, remaining_header: &str, reset_header: &str) {
        if let Some(remaining) = header_u64(headers, remaining_header) {
            *self.remaining.lock().await = remaining;
        }

        if let Some(reset) = header_u64(headers, reset_header) {
            *self.reset_time.lock().await = SystemTime::UNIX_EPOCH + Duration::from_secs(reset);
        }
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(remaining: &str, reset: u64) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert("x-ratelimit-remaining", HeaderValue::from_str(remaining).unwrap());
        map.insert(
            "x-ratelimit-reset",
            HeaderValue::from_str(&reset.to_string()).unwrap(),
        );
        map
    }

    fn unix_now() -> u64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[tokio::test]
    async fn test_fresh_limiter_allows_requests() {
        let limiter = RateLimiter::new("GitHub", 60);
        assert!(limiter.check().await.is_ok());
        assert_eq!(limiter.remaining().await, 60);
    }

    #[tokio::test]
    async fn test_exhausted_before_reset_fails_fast() {
        let limiter = RateLimiter::new("GitHub", 60);
        limiter
            .update(
                &headers("0", unix_now() + 600),
                "x-ratelimit-remaining",
                "x-ratelimit-reset",
            )
            .await;

        let err = limiter.check().await.unwrap_err();
        match err {
            OsslistError::QuotaExhausted {
                platform,
                reset_in_secs,
            } => {
                assert_eq!(platform, "GitHub");
                assert!(reset_in_secs > 500);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_exhausted_after_reset_is_allowed() {
        let limiter = RateLimiter::new("GitLab", 10);
        limiter
            .update(
                &headers("0", unix_now() - 5),
                "x-ratelimit-remaining",
                "x-ratelimit-reset",
            )
            .await;
        assert!(limiter.check().await.is_ok());
    }

    #[tokio::test]
    async fn test_garbage_headers_are_ignored() {
        let limiter = RateLimiter::new("GitHub", 42);
        let mut map = HeaderMap::new();
        map.insert("x-ratelimit-remaining", HeaderValue::from_static("lots"));
        limiter
            .update(&map, "x-ratelimit-remaining", "x-ratelimit-reset")
            .await;
        assert_eq!(limiter.remaining().await, 42);
    }
}
