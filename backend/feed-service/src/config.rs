/// Configuration for feed assembly.
///
/// Loads from environment variables with defaults for every value.
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// How many recent posts to pull as ranking candidates.
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    /// Size of the recommended slice cut from the top of the feed.
    #[serde(default = "default_recommended_limit")]
    pub recommended_limit: usize,
}

fn default_candidate_limit() -> usize {
    100
}

fn default_recommended_limit() -> usize {
    20
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            candidate_limit: default_candidate_limit(),
            recommended_limit: default_recommended_limit(),
        }
    }
}

impl FeedConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            candidate_limit: std::env::var("FEED_CANDIDATE_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_candidate_limit),
            recommended_limit: std::env::var("FEED_RECOMMENDED_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_recommended_limit),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = FeedConfig::default();
        assert_eq!(config.candidate_limit, 100);
        assert_eq!(config.recommended_limit, 20);
    }
}
