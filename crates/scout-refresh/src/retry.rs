//! Retry policy for provider fetches and store writes.
//!
//! Rate-limited fetches back off exponentially (honouring `Retry-After`,
//! capped at `max_delay`) up to `rate_limit_max_attempts` attempts. Timeouts
//! get `timeout_retries` extra attempts. Other fetch errors are final.
//! Store writes get `persistence_retries` extra attempts for retryable
//! errors only.

use std::future::Future;
use std::time::Duration;

use scout_config::RefreshConfig;
use scout_core::entities::ProfileSnapshot;
use scout_db::error::DatabaseError;

use crate::error::FetchError;
use crate::traits::ProfileFetcher;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts (including the first) while the provider answers 429.
    pub rate_limit_max_attempts: u32,
    /// Extra attempts after a timeout.
    pub timeout_retries: u32,
    /// Extra attempts for a retryable store error.
    pub persistence_retries: u32,
    /// Delay before the first rate-limit retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RefreshConfig::default())
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &RefreshConfig) -> Self {
        Self {
            rate_limit_max_attempts: config.rate_limit_max_attempts.max(1),
            timeout_retries: config.timeout_retries,
            persistence_retries: config.persistence_retries,
            base_delay: config.backoff_base(),
            max_delay: config.backoff_max(),
        }
    }

    /// Delay before retry number `retry` (1-based): `base * 2^(retry - 1)`,
    /// raised to `Retry-After` when the provider asked for longer, capped at
    /// `max_delay`.
    #[must_use]
    pub fn backoff_delay(&self, retry: u32, retry_after_secs: Option<u64>) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        let exponential = self.base_delay.saturating_mul(1 << exponent);
        let requested = retry_after_secs.map_or(Duration::ZERO, Duration::from_secs);
        exponential.max(requested).min(self.max_delay)
    }

    /// Fetch a snapshot, retrying rate limits and timeouts per this policy.
    ///
    /// # Errors
    ///
    /// Returns the last [`FetchError`] once retries are exhausted, or the
    /// first non-retryable one.
    pub async fn fetch(
        &self,
        fetcher: &dyn ProfileFetcher,
        linkedin_url: &str,
    ) -> Result<ProfileSnapshot, FetchError> {
        let mut rate_limited = 0;
        let mut timeouts = 0;
        loop {
            match fetcher.fetch_profile(linkedin_url).await {
                Ok(snapshot) => return Ok(snapshot),
                Err(FetchError::RateLimited { retry_after_secs }) => {
                    rate_limited += 1;
                    if rate_limited >= self.rate_limit_max_attempts {
                        return Err(FetchError::RateLimited { retry_after_secs });
                    }
                    let delay = self.backoff_delay(rate_limited, retry_after_secs);
                    tracing::warn!(
                        linkedin_url,
                        attempt = rate_limited,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "provider rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(FetchError::Timeout) => {
                    if timeouts >= self.timeout_retries {
                        return Err(FetchError::Timeout);
                    }
                    timeouts += 1;
                    tracing::warn!(linkedin_url, attempt = timeouts, "provider timed out, retrying");
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Run a store operation, retrying retryable failures.
    ///
    /// # Errors
    ///
    /// Returns the last [`DatabaseError`] once retries are exhausted, or the
    /// first non-retryable one.
    pub async fn persist<T, F, Fut>(&self, mut op: F) -> Result<T, DatabaseError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DatabaseError>>,
    {
        let mut retries = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && retries < self.persistence_retries => {
                    retries += 1;
                    tracing::warn!(%error, attempt = retries, "store write failed, retrying");
                }
                Err(error) => return Err(error),
            }
        }
    }
}
