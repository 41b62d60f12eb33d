//! Load-once template catalog cache.

use crate::config::AssistConfig;
use crate::error::AssistResult;
use crate::source::TemplateSource;
use crate::template::TemplateCatalog;
use confsync_storage::{Clock, EvictingStore, InMemoryMedium, StoreMedium, SystemClock, WriteOutcome};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Loads the template catalog at most once and shares it.
///
/// With a local store attached, a cached catalog whose timestamp is
/// younger than [`AssistConfig::max_age`] is used instead of asking the
/// source, and a freshly loaded catalog is written back with a timestamp.
/// Cache write failures are logged and otherwise ignored.
///
/// A failed load leaves the cache empty; the next call tries again.
pub struct TemplateCache<S, M = InMemoryMedium, C = SystemClock> {
    source: S,
    config: AssistConfig,
    store: Option<Mutex<EvictingStore<M, C>>>,
    catalog: OnceCell<Arc<TemplateCatalog>>,
}

impl<S: TemplateSource> TemplateCache<S> {
    /// Creates a cache without local storage.
    pub fn new(source: S, config: AssistConfig) -> Self {
        Self {
            source,
            config,
            store: None,
            catalog: OnceCell::new(),
        }
    }
}

impl<S: TemplateSource, M: StoreMedium, C: Clock> TemplateCache<S, M, C> {
    /// Creates a cache backed by `store`.
    pub fn with_store(source: S, config: AssistConfig, store: EvictingStore<M, C>) -> Self {
        Self {
            source,
            config,
            store: Some(Mutex::new(store)),
            catalog: OnceCell::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    /// Returns the catalog if it has been loaded.
    pub fn catalog(&self) -> Option<Arc<TemplateCatalog>> {
        self.catalog.get().cloned()
    }

    /// Returns true once the catalog has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.catalog.initialized()
    }

    /// Loads the catalog, or returns the one already loaded.
    ///
    /// # Errors
    ///
    /// Returns the source's error if there was no fresh cached copy and
    /// the source failed.
    pub async fn load(&self) -> AssistResult<Arc<TemplateCatalog>> {
        self.catalog
            .get_or_try_init(|| self.fetch())
            .await
            .cloned()
    }

    /// Timestamp of the cached copy in the local store, if any.
    pub fn cached_at(&self) -> Option<u64> {
        self.store
            .as_ref()?
            .lock()
            .timestamp_of(&self.config.cache_key)
    }

    /// Drops the cached copy from the local store.
    ///
    /// An already loaded catalog stays in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not be written.
    pub fn invalidate(&self) -> AssistResult<()> {
        if let Some(store) = &self.store {
            store.lock().remove_entry(&self.config.cache_key)?;
        }
        Ok(())
    }

    async fn fetch(&self) -> AssistResult<Arc<TemplateCatalog>> {
        if let Some(catalog) = self.read_cached() {
            return Ok(Arc::new(catalog));
        }

        let catalog = self.source.load().await?;
        info!(templates = catalog.len(), "loaded templates");
        self.write_cached(&catalog);
        Ok(Arc::new(catalog))
    }

    fn read_cached(&self) -> Option<TemplateCatalog> {
        let store = self.store.as_ref()?.lock();
        let key = self.config.cache_key.as_str();

        if !store.is_fresh(key, self.config.max_age) {
            debug!(key, "no fresh cached templates");
            return None;
        }

        let raw = store.get(key)?;
        match TemplateCatalog::from_json(&raw) {
            Ok(catalog) => {
                info!(templates = catalog.len(), "using cached templates");
                Some(catalog)
            }
            Err(e) => {
                warn!(key, error = %e, "ignoring unreadable cached templates");
                None
            }
        }
    }

    fn write_cached(&self, catalog: &TemplateCatalog) {
        let Some(store) = &self.store else {
            return;
        };

        let json = match catalog.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "could not encode templates for caching");
                return;
            }
        };

        match store.lock().write_entry(&self.config.cache_key, &json) {
            Ok(WriteOutcome::Stored { purges }) => debug!(purges, "cached templates"),
            Ok(WriteOutcome::Dropped) => warn!(bytes = json.len(), "templates too large to cache"),
            Err(e) => warn!(error = %e, "failed to cache templates"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssistError;
    use crate::source::StaticTemplateSource;
    use crate::template::Template;
    use async_trait::async_trait;
    use confsync_storage::{ManualClock, StoreConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const NOW: u64 = 1_700_000_000_000;

    fn catalog() -> TemplateCatalog {
        let mut catalog = TemplateCatalog::new();
        catalog.add("js", Template::new("for", "for (;;) {}", "loop"));
        catalog
    }

    fn store(clock: &ManualClock, quota: usize) -> EvictingStore<InMemoryMedium, ManualClock> {
        EvictingStore::with_clock(
            InMemoryMedium::with_quota(quota),
            StoreConfig::default(),
            clock.clone(),
        )
    }

    struct FailingOnce {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TemplateSource for FailingOnce {
        async fn load(&self) -> AssistResult<TemplateCatalog> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AssistError::load_failed("server returned 500"))
            } else {
                Ok(catalog())
            }
        }
    }

    #[tokio::test]
    async fn loads_once() {
        let source = Arc::new(StaticTemplateSource::new(catalog()));
        let cache = TemplateCache::new(source.clone(), AssistConfig::default());
        assert!(!cache.is_loaded());

        cache.load().await.unwrap();
        cache.load().await.unwrap();

        assert!(cache.is_loaded());
        assert_eq!(source.load_count(), 1);
        assert_eq!(cache.catalog().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_load_is_retried() {
        let cache = TemplateCache::new(
            FailingOnce {
                calls: AtomicUsize::new(0),
            },
            AssistConfig::default(),
        );

        assert!(matches!(cache.load().await, Err(AssistError::LoadFailed(_))));
        assert!(cache.catalog().is_none());
        assert_eq!(cache.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fresh_cached_copy_skips_source() {
        let clock = ManualClock::new(NOW);
        let first = Arc::new(StaticTemplateSource::new(catalog()));
        let cache = TemplateCache::with_store(first.clone(), AssistConfig::default(), store(&clock, 4096));
        cache.load().await.unwrap();
        assert_eq!(cache.cached_at(), Some(NOW));

        // A new cache over the same medium finds the stamped copy.
        let medium = cache.store.map(|s| s.into_inner().into_inner()).unwrap();
        clock.advance(Duration::from_secs(60));
        let second = Arc::new(StaticTemplateSource::new(TemplateCatalog::new()));
        let cache = TemplateCache::with_store(
            second.clone(),
            AssistConfig::default(),
            EvictingStore::with_clock(medium, StoreConfig::default(), clock.clone()),
        );

        assert_eq!(cache.load().await.unwrap().len(), 1);
        assert_eq!(second.load_count(), 0);
    }

    #[tokio::test]
    async fn stale_cached_copy_is_reloaded() {
        let clock = ManualClock::new(NOW);
        let mut seeded = store(&clock, 4096);
        seeded.write_entry("templates", "{}").unwrap();
        clock.advance(Duration::from_secs(2 * 60 * 60));

        let source = Arc::new(StaticTemplateSource::new(catalog()));
        let cache = TemplateCache::with_store(source.clone(), AssistConfig::default(), seeded);

        assert_eq!(cache.load().await.unwrap().len(), 1);
        assert_eq!(source.load_count(), 1);
        assert_eq!(cache.cached_at(), Some(NOW + 2 * 60 * 60 * 1000));
    }

    #[tokio::test]
    async fn catalog_too_large_for_store_still_loads() {
        let clock = ManualClock::new(NOW);
        let source = Arc::new(StaticTemplateSource::new(catalog()));
        let cache = TemplateCache::with_store(source, AssistConfig::default(), store(&clock, 40));

        assert_eq!(cache.load().await.unwrap().len(), 1);
        assert_eq!(cache.cached_at(), None);
    }

    #[tokio::test]
    async fn invalidate_removes_cached_copy() {
        let clock = ManualClock::new(NOW);
        let source = Arc::new(StaticTemplateSource::new(catalog()));
        let cache = TemplateCache::with_store(source, AssistConfig::default(), store(&clock, 4096));
        cache.load().await.unwrap();

        cache.invalidate().unwrap();
        assert_eq!(cache.cached_at(), None);
        assert!(cache.is_loaded());
    }
}
