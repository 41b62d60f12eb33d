//! Evicting store configuration.

use crate::ladder::EvictionLadder;

/// Configuration for an [`super::EvictingStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity failures tolerated by `write_safely` before it falls back
    /// to a best-effort write.
    pub max_attempts: usize,

    /// Purge thresholds consulted by attempt depth.
    pub ladder: EvictionLadder,

    /// Suffix marking a key as the timestamp companion of another key.
    pub timestamp_suffix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            ladder: EvictionLadder::standard(),
            timestamp_suffix: "-ts".to_string(),
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of safe-write attempts.
    #[must_use]
    pub fn max_attempts(mut self, value: usize) -> Self {
        self.max_attempts = value;
        self
    }

    /// Sets the eviction ladder.
    #[must_use]
    pub fn ladder(mut self, ladder: EvictionLadder) -> Self {
        self.ladder = ladder;
        self
    }

    /// Sets the timestamp companion suffix.
    #[must_use]
    pub fn timestamp_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.timestamp_suffix = suffix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.ladder.len(), 5);
        assert_eq!(config.timestamp_suffix, "-ts");
    }

    #[test]
    fn builder_pattern() {
        let config = StoreConfig::new().max_attempts(2).timestamp_suffix("@at");
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.timestamp_suffix, "@at");
    }
}
