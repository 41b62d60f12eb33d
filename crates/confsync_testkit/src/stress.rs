//! Stress tests for confsync.
//!
//! These exercise the store under sustained quota pressure and the
//! coordinator under concurrent binding changes.

use crate::fixtures::{default_editor, linux_config};
use confsync_engine::{BindingSyncCoordinator, MemoryRemoteConfig, SyncResult};
use confsync_storage::{EvictingStore, InMemoryMedium, ManualClock, StoreConfig, WriteOutcome};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed or dropped operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {name} ===");
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed or dropped: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations to perform.
    pub operations: usize,
    /// Number of concurrent tasks (for concurrent tests).
    pub tasks: usize,
    /// Size of each cached value in bytes.
    pub value_size: usize,
    /// Store quota in bytes.
    pub quota: usize,
    /// Simulated time between writes.
    pub tick: Duration,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 2_000,
            tasks: 4,
            value_size: 256,
            quota: 16 * 1024,
            tick: Duration::from_secs(5 * 60),
        }
    }
}

/// Fills a quota-bounded store with stamped entries while time passes.
///
/// Dropped writes count as failures. The store is returned for inspection.
pub fn stress_cache_churn(
    config: &StressConfig,
) -> (StressTestResult, EvictingStore<InMemoryMedium, ManualClock>) {
    let clock = ManualClock::new(crate::fixtures::FIXED_NOW);
    let mut store = EvictingStore::with_clock(
        InMemoryMedium::with_quota(config.quota),
        StoreConfig::default(),
        clock.clone(),
    );
    let value = "x".repeat(config.value_size);

    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        clock.advance(config.tick);
        match store.write_entry(&format!("entry{i}"), &value) {
            Ok(WriteOutcome::Stored { .. }) => successful += 1,
            Ok(WriteOutcome::Dropped) | Err(_) => failed += 1,
        }
    }

    (StressTestResult::new(successful, failed, start.elapsed()), store)
}

/// Changes bindings from several tasks at once against one coordinator.
///
/// Returns the result and the coordinator's remote.
///
/// # Errors
///
/// Returns the install error if the coordinator cannot be set up.
pub async fn stress_concurrent_bindings(
    config: &StressConfig,
) -> SyncResult<(StressTestResult, Arc<MemoryRemoteConfig>)> {
    let remote = Arc::new(MemoryRemoteConfig::new());
    let coordinator = Arc::new(BindingSyncCoordinator::new(linux_config(), remote.clone()));
    coordinator.install_on(default_editor()).await?;

    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let ops_per_task = config.operations / config.tasks.max(1);

    let start = Instant::now();

    let handles: Vec<_> = (0..config.tasks)
        .map(|t| {
            let coordinator = Arc::clone(&coordinator);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            tokio::spawn(async move {
                for i in 0..ops_per_task {
                    let keystroke = format!("alt+{}", i % 10);
                    let action = (i % 3 != 0).then(|| format!("task{t}Action{i}"));
                    match coordinator.set_binding(&keystroke, action.as_deref()).await {
                        Ok(_) => successful.fetch_add(1, Ordering::Relaxed),
                        Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                    };
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.await.is_err() {
            failed.fetch_add(ops_per_task, Ordering::Relaxed);
        }
    }

    let result = StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    );
    Ok((result, remote))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> StressConfig {
        StressConfig {
            operations: 200,
            tasks: 4,
            value_size: 64,
            quota: 2 * 1024,
            tick: Duration::from_secs(10 * 60),
        }
    }

    #[test]
    fn cache_churn_stays_within_quota() {
        let config = small();
        let (result, store) = stress_cache_churn(&config);
        result.print_summary("cache churn");

        assert_eq!(result.total_ops, config.operations);
        assert!(store.medium().usage() <= config.quota);
        // The newest entry always fits once older ones are purged.
        let last = format!("entry{}", config.operations - 1);
        assert!(store.get(&last).is_some());
        assert!(store.timestamp_of(&last).is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_bindings_leave_a_consistent_document() {
        let config = small();
        let (result, remote) = stress_concurrent_bindings(&config).await.unwrap();
        result.print_summary("concurrent bindings");

        assert_eq!(result.failed_ops, 0);
        assert_eq!(remote.history().len(), result.successful_ops);

        // Default bindings are never touched, so the patch only names alt+ keys.
        let stored = remote.document("keymap-linux").unwrap_or_default();
        assert!(stored.keys().all(|k| k.starts_with("alt+")));
    }
}
