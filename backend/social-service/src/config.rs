/// Configuration for the social ledgers.
///
/// Loads from environment variables; every value has a default so the
/// services come up without any configuration.
use anyhow::Result;
use resilience::RetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialConfig {
    /// Retry attempts after the first try when a transaction conflicts.
    #[serde(default = "default_txn_max_retries")]
    pub txn_max_retries: u32,
    /// Initial conflict-retry backoff in milliseconds.
    #[serde(default = "default_txn_backoff_ms")]
    pub txn_backoff_ms: u64,
}

fn default_txn_max_retries() -> u32 {
    5
}

fn default_txn_backoff_ms() -> u64 {
    10
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            txn_max_retries: default_txn_max_retries(),
            txn_backoff_ms: default_txn_backoff_ms(),
        }
    }
}

impl SocialConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            txn_max_retries: std::env::var("SOCIAL_TXN_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_txn_max_retries),
            txn_backoff_ms: std::env::var("SOCIAL_TXN_BACKOFF_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_txn_backoff_ms),
        })
    }

    /// Retry policy the ledgers apply to conflicting transactions.
    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.txn_max_retries,
            initial_backoff: Duration::from_millis(self.txn_backoff_ms),
            ..RetryConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = SocialConfig::default();
        assert_eq!(config.txn_max_retries, 5);
        assert_eq!(config.txn_backoff_ms, 10);

        let retry = config.retry();
        assert_eq!(retry.max_retries, 5);
        assert_eq!(retry.initial_backoff, Duration::from_millis(10));
    }
}
