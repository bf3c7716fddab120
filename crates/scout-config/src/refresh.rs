//! Refresh pipeline knobs: due selection, concurrency, and retry policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ConfigError;

/// One week.
const fn default_staleness_hours() -> u64 {
    168
}

const fn default_max_concurrency() -> usize {
    4
}

const fn default_batch_limit() -> u32 {
    200
}

const fn default_rate_limit_max_attempts() -> u32 {
    3
}

const fn default_backoff_base_ms() -> u64 {
    1_000
}

const fn default_backoff_max_ms() -> u64 {
    30_000
}

const fn default_timeout_retries() -> u32 {
    1
}

const fn default_persistence_retries() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshConfig {
    /// Profiles whose last attempt is older than this are due.
    #[serde(default = "default_staleness_hours")]
    pub staleness_hours: u64,

    /// Profiles processed at once. Bounded by the provider rate limit.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Maximum profiles selected per batch run.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: u32,

    /// Fetch attempts (including the first) while the provider answers 429.
    #[serde(default = "default_rate_limit_max_attempts")]
    pub rate_limit_max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,

    /// Extra fetch attempts after a timeout.
    #[serde(default = "default_timeout_retries")]
    pub timeout_retries: u32,

    /// Extra attempts for a failed store write before the batch aborts.
    #[serde(default = "default_persistence_retries")]
    pub persistence_retries: u32,

    /// Companies passed to the classifier in addition to the tracked company.
    #[serde(default)]
    pub reference_companies: Vec<String>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            staleness_hours: default_staleness_hours(),
            max_concurrency: default_max_concurrency(),
            batch_limit: default_batch_limit(),
            rate_limit_max_attempts: default_rate_limit_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            timeout_retries: default_timeout_retries(),
            persistence_retries: default_persistence_retries(),
            reference_companies: Vec::new(),
        }
    }
}

impl RefreshConfig {
    #[must_use]
    pub const fn staleness(&self) -> Duration {
        Duration::from_secs(self.staleness_hours * 3_600)
    }

    #[must_use]
    pub const fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    #[must_use]
    pub const fn backoff_max(&self) -> Duration {
        Duration::from_millis(self.backoff_max_ms)
    }

    /// Reject values the orchestrator cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(invalid("refresh.max_concurrency", "must be at least 1"));
        }
        if self.rate_limit_max_attempts == 0 {
            return Err(invalid("refresh.rate_limit_max_attempts", "must be at least 1"));
        }
        if self.backoff_max_ms < self.backoff_base_ms {
            return Err(invalid(
                "refresh.backoff_max_ms",
                "must not be smaller than refresh.backoff_base_ms",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = RefreshConfig::default();
        assert_eq!(config.staleness(), Duration::from_secs(7 * 24 * 3_600));
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.rate_limit_max_attempts, 3);
        assert_eq!(config.timeout_retries, 1);
        assert_eq!(config.persistence_retries, 1);
        assert!(config.reference_companies.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_concurrency_is_invalid() {
        let config = RefreshConfig {
            max_concurrency: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("refresh.max_concurrency"));
    }

    #[test]
    fn inverted_backoff_is_invalid() {
        let config = RefreshConfig {
            backoff_base_ms: 5_000,
            backoff_max_ms: 100,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
