use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use super::metrics::RequestMetrics;
use super::region::Platform;
use super::types::RiotError;

/// Attempts per call, the first one included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Used when a 429 comes back without a usable `Retry-After`.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Riot API handle shared by the whole process.
pub struct RiotClient {
    http: reqwest::Client,
    limiter: DefaultDirectRateLimiter,
    /// Riot API Key
    key: String,
    platform_url: String,
    region_url: String,
    max_attempts: u32,
    metrics: Arc<RequestMetrics>,
}

impl RiotClient {
    /// `request_timeout` bounds every single HTTP exchange, connect included.
    pub fn new(
        key: String,
        platform: Platform,
        requests_per_second: NonZeroU32,
        request_timeout: Duration,
    ) -> Result<Self, RiotError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            http,
            limiter: RateLimiter::direct(Quota::per_second(requests_per_second)),
            key,
            platform_url: platform.platform_url(),
            region_url: platform.regional_url(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            metrics: RequestMetrics::new(),
        })
    }

    /// Point both routing clusters at other hosts.
    #[cfg(test)]
    pub fn with_base_urls(
        mut self,
        platform_url: impl Into<String>,
        region_url: impl Into<String>,
    ) -> Self {
        self.platform_url = platform_url.into();
        self.region_url = region_url.into();
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn metrics(&self) -> Arc<RequestMetrics> {
        self.metrics.clone()
    }

    pub(super) fn platform_url(&self) -> &str {
        &self.platform_url
    }

    pub(super) fn region_url(&self) -> &str {
        &self.region_url
    }

    /// GET `url` and decode the body.
    ///
    /// `Ok(None)` means the API answered 404. Only 429 is retried, after sleeping for the
    /// `Retry-After` delay; each 429 uses up one attempt.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, RiotError> {
        let attempts = self.max_attempts;

        for attempt in 1..=attempts {
            self.limiter.until_ready().await;
            self.metrics.inc();
            trace!(attempt, url, "[RIOT::CLIENT] GET");

            let res = self
                .http
                .get(url)
                .header("X-Riot-Token", &self.key)
                .send()
                .await?;

            let status = res.status();
            match status {
                s if s.is_success() => return res.json().await.map(Some).map_err(Into::into),
                StatusCode::NOT_FOUND => {
                    debug!(url, "[RIOT::CLIENT] no data");
                    return Ok(None);
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    return Err(RiotError::Auth(status));
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    self.metrics.inc_rate_limited();
                    if attempt == attempts {
                        break;
                    }
                    let delay = retry_after(res.headers());
                    warn!(
                        attempt,
                        retry_after_secs = delay.as_secs(),
                        "⚠️ Riot API rate limit hit, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                _ => return Err(RiotError::Status(status)),
            }
        }

        Err(RiotError::RateLimited { attempts })
    }
}

impl fmt::Debug for RiotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiotClient")
            .field("platform_url", &self.platform_url)
            .field("region_url", &self.region_url)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

/// Delay requested by a 429 response, in whole seconds.
fn retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}
