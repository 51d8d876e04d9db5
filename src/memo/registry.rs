//! Memo Registry Module
//!
//! Keeps track of every memoized function's store so the periodic sweeper
//! can visit them without knowing their value types.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::MemoError;
use crate::memo::{MemoStats, MemoStore, SweepPolicy};

// == Sweep Target ==
/// Type-erased view of one function's store.
pub trait SweepTarget: Send + Sync {
    /// Name of the memoized function owning the store
    fn name(&self) -> &str;

    /// Removes stale entries, returning how many were dropped.
    fn sweep(&self, now: Instant, policy: SweepPolicy) -> Result<usize, MemoError>;

    /// Current counters for the store.
    fn stats(&self) -> Result<MemoStats, MemoError>;
}

// == Shared Store ==
/// A [`MemoStore`] behind the mutex shared by callers and the sweeper.
#[derive(Debug)]
pub struct SharedStore<V> {
    name: String,
    inner: Mutex<MemoStore<V>>,
}

impl<V: Clone> SharedStore<V> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Mutex::new(MemoStore::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locks the store for a caller.
    ///
    /// A poisoned store may hold a half-applied update, so it is emptied and
    /// the poison cleared before use.
    pub fn lock(&self) -> MutexGuard<'_, MemoStore<V>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(function = %self.name, "Memo store poisoned, resetting");
                let mut guard = poisoned.into_inner();
                guard.clear();
                self.inner.clear_poison();
                guard
            }
        }
    }

    fn try_lock_for_sweep(&self) -> Result<MutexGuard<'_, MemoStore<V>>, MemoError> {
        self.inner
            .lock()
            .map_err(|_| MemoError::Poisoned(self.name.clone()))
    }
}

impl<V: Clone + Send> SweepTarget for SharedStore<V> {
    fn name(&self) -> &str {
        &self.name
    }

    fn sweep(&self, now: Instant, policy: SweepPolicy) -> Result<usize, MemoError> {
        Ok(self.try_lock_for_sweep()?.sweep(now, policy))
    }

    fn stats(&self) -> Result<MemoStats, MemoError> {
        Ok(self.try_lock_for_sweep()?.stats())
    }
}

// == Sweep Report ==
/// Outcome of one pass over every registered store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Stores that were visited
    pub stores: usize,
    /// Entries removed across all stores
    pub removed: usize,
    /// Stores that could not be swept
    pub failures: usize,
}

/// Counters for one registered function.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionStats {
    pub name: String,
    #[serde(flatten)]
    pub stats: MemoStats,
    pub hit_rate: f64,
}

// == Memo Registry ==
/// Cloneable handle to the set of stores the sweeper inspects.
///
/// Holds weak references, so dropping a memoized function releases its store.
#[derive(Clone, Default)]
pub struct MemoRegistry {
    targets: Arc<Mutex<Vec<Weak<dyn SweepTarget>>>>,
}

impl MemoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a store to the sweep set.
    pub fn register(&self, target: Weak<dyn SweepTarget>) {
        self.targets().push(target);
    }

    /// Number of stores still alive.
    pub fn len(&self) -> usize {
        self.live_targets().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Sweep All ==
    /// Sweeps every live store at the current instant.
    pub fn sweep_all(&self, policy: SweepPolicy) -> SweepReport {
        self.sweep_at(Instant::now(), policy)
    }

    /// Sweeps every live store as of `now`.
    ///
    /// A store that fails is logged and skipped; the others are still swept.
    pub fn sweep_at(&self, now: Instant, policy: SweepPolicy) -> SweepReport {
        let mut report = SweepReport::default();

        for target in self.live_targets() {
            report.stores += 1;
            match target.sweep(now, policy) {
                Ok(removed) => {
                    if removed > 0 {
                        debug!(function = %target.name(), removed, "Swept memo store");
                    }
                    report.removed += removed;
                }
                Err(e) => {
                    warn!(function = %target.name(), error = %e, "Memo sweep failed, skipping store");
                    report.failures += 1;
                }
            }
        }

        report
    }

    // == Snapshot ==
    /// Per-function counters, skipping stores that cannot be read.
    pub fn snapshot(&self) -> Vec<FunctionStats> {
        self.live_targets()
            .into_iter()
            .filter_map(|target| match target.stats() {
                Ok(stats) => Some(FunctionStats {
                    name: target.name().to_string(),
                    hit_rate: stats.hit_rate(),
                    stats,
                }),
                Err(e) => {
                    warn!(function = %target.name(), error = %e, "Memo stats unavailable");
                    None
                }
            })
            .collect()
    }

    /// Upgrades live targets and prunes dropped ones. The registry lock is
    /// released before any store is locked.
    fn live_targets(&self) -> Vec<Arc<dyn SweepTarget>> {
        let mut targets = self.targets();
        targets.retain(|weak| weak.strong_count() > 0);
        targets.iter().filter_map(Weak::upgrade).collect()
    }

    fn targets(&self) -> MutexGuard<'_, Vec<Weak<dyn SweepTarget>>> {
        self.targets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for MemoRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoRegistry")
            .field("stores", &self.len())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::memo::CacheKey;
    use std::time::Duration;

    fn register<V: Clone + Send + 'static>(
        registry: &MemoRegistry,
        store: &Arc<SharedStore<V>>,
    ) {
        let target: Arc<dyn SweepTarget> = store.clone();
        registry.register(Arc::downgrade(&target));
    }

    fn key(n: u32) -> CacheKey {
        CacheKey::derive("test", &(n,)).unwrap()
    }

    #[test]
    fn test_sweep_all_visits_every_store() {
        let registry = MemoRegistry::new();
        let numbers = Arc::new(SharedStore::<u32>::new("numbers"));
        let words = Arc::new(SharedStore::<String>::new("words"));
        register(&registry, &numbers);
        register(&registry, &words);

        let now = Instant::now();
        numbers.lock().insert(key(1), 1, Duration::from_secs(1), now);
        numbers.lock().insert(key(2), 2, Duration::from_secs(60), now);
        words.lock().insert(key(1), "a".into(), Duration::from_secs(1), now);

        let report = registry.sweep_at(now + Duration::from_secs(2), SweepPolicy::EntryTtl);

        assert_eq!(report, SweepReport { stores: 2, removed: 2, failures: 0 });
        assert_eq!(numbers.lock().len(), 1);
        assert!(words.lock().is_empty());
    }

    #[test]
    fn test_dropped_stores_are_pruned() {
        let registry = MemoRegistry::new();
        let kept = Arc::new(SharedStore::<u32>::new("kept"));
        let dropped = Arc::new(SharedStore::<u32>::new("dropped"));
        register(&registry, &kept);
        register(&registry, &dropped);
        assert_eq!(registry.len(), 2);

        drop(dropped);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.sweep_all(SweepPolicy::EntryTtl).stores, 1);
    }

    #[test]
    fn test_poisoned_store_does_not_stop_sweep() {
        let registry = MemoRegistry::new();
        let healthy = Arc::new(SharedStore::<u32>::new("healthy"));
        let poisoned = Arc::new(SharedStore::<u32>::new("poisoned"));
        register(&registry, &poisoned);
        register(&registry, &healthy);

        let now = Instant::now();
        healthy.lock().insert(key(1), 1, Duration::from_millis(1), now);

        let to_poison = poisoned.clone();
        let _ = std::thread::spawn(move || {
            let _guard = to_poison.lock();
            panic!("poison the store");
        })
        .join();

        let report = registry.sweep_at(now + Duration::from_secs(1), SweepPolicy::EntryTtl);

        assert_eq!(report.stores, 2);
        assert_eq!(report.failures, 1);
        assert_eq!(report.removed, 1);
    }

    #[test]
    fn test_caller_lock_recovers_poisoned_store() {
        let store = Arc::new(SharedStore::<u32>::new("recovering"));
        store.lock().insert(key(1), 1, Duration::from_secs(60), Instant::now());

        let to_poison = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = to_poison.lock();
            panic!("poison the store");
        })
        .join();

        assert!(store.lock().is_empty());
        assert!(SweepTarget::stats(store.as_ref()).is_ok());
    }

    #[test]
    fn test_snapshot_reports_each_function() {
        let registry = MemoRegistry::new();
        let store = Arc::new(SharedStore::<u32>::new("catalog"));
        register(&registry, &store);

        let now = Instant::now();
        store.lock().insert(key(1), 1, Duration::from_secs(60), now);
        store.lock().lookup(&key(1), now);
        store.lock().lookup(&key(2), now);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name, "catalog");
        assert_eq!(snapshot[0].stats.hits, 1);
        assert_eq!(snapshot[0].stats.misses, 1);
        assert_eq!(snapshot[0].hit_rate, 0.5);
    }
}
