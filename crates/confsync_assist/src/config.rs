//! Configuration for content assist.

use std::time::Duration;

/// Configuration for the template cache.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// Key of the cached catalog in the local store.
    pub cache_key: String,
    /// How long a cached catalog is used before the source is asked again.
    pub max_age: Duration,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            cache_key: "templates".to_string(),
            max_age: Duration::from_secs(60 * 60),
        }
    }
}

impl AssistConfig {
    /// Sets the cache key.
    #[must_use]
    pub fn cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = key.into();
        self
    }

    /// Sets the freshness window of the cached catalog.
    #[must_use]
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }
}
