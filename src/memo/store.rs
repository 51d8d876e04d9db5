//! Memo Store Module
//!
//! Per-function storage: a HashMap of cache keys to entries with lazy expiry
//! on lookup and eager expiry on sweep.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::memo::{CacheEntry, CacheKey, MemoStats};

// == Sweep Policy ==
/// Decides which entries the periodic sweeper reclaims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepPolicy {
    /// Remove entries whose own TTL has elapsed
    #[default]
    EntryTtl,
    /// Remove expired entries and anything older than the given age
    MaxAge(Duration),
}

impl SweepPolicy {
    /// Returns true if `entry` should be physically removed at `now`.
    ///
    /// [`SweepPolicy::MaxAge`] may reclaim an entry whose TTL is longer than
    /// the limit; the next call simply recomputes it.
    pub fn is_stale<V>(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        match self {
            SweepPolicy::EntryTtl => entry.is_expired_at(now),
            SweepPolicy::MaxAge(max_age) => {
                entry.is_expired_at(now) || entry.is_older_than(*max_age, now)
            }
        }
    }
}

// == Memo Store ==
/// Storage owned by exactly one memoized function.
#[derive(Debug)]
pub struct MemoStore<V> {
    /// Key-entry storage
    entries: HashMap<CacheKey, CacheEntry<V>>,
    /// Performance statistics
    stats: MemoStats,
}

impl<V: Clone> MemoStore<V> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: MemoStats::new(),
        }
    }

    // == Lookup ==
    /// Returns a clone of the value if a valid entry exists at `now`.
    ///
    /// An expired entry is removed and counted as a miss.
    pub fn lookup(&mut self, key: &CacheKey, now: Instant) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_valid_at(now) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expiration();
            self.stats.set_total_entries(self.entries.len());
        }
        self.stats.record_miss();
        None
    }

    // == Insert ==
    /// Stores a freshly computed value, replacing any previous entry.
    pub fn insert(&mut self, key: CacheKey, value: V, ttl: Duration, now: Instant) {
        self.entries.insert(key, CacheEntry::new(value, ttl, now));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Remove ==
    /// Drops the entry for `key`, returning true if one was stored.
    pub fn remove(&mut self, key: &CacheKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Sweep ==
    /// Removes every entry `policy` marks stale at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self, now: Instant, policy: SweepPolicy) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !policy.is_stale(entry, now));
        let removed = before - self.entries.len();

        self.stats.record_swept(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    /// Drops every entry, keeping the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    pub fn stats(&self) -> MemoStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of physically stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `key` is physically stored, valid or not.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }
}

impl<V: Clone> Default for MemoStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> CacheKey {
        CacheKey::derive("test", &(s,)).unwrap()
    }

    #[test]
    fn test_store_new() {
        let store: MemoStore<String> = MemoStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_insert_and_lookup() {
        let mut store = MemoStore::new();
        let now = Instant::now();

        store.insert(key("a"), 6, Duration::from_secs(5), now);

        assert_eq!(store.lookup(&key("a"), now), Some(6));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lookup_absent_is_miss() {
        let mut store: MemoStore<i32> = MemoStore::new();

        assert_eq!(store.lookup(&key("a"), Instant::now()), None);
        assert_eq!(store.stats().misses, 1);
        assert_eq!(store.stats().expirations, 0);
    }

    #[test]
    fn test_store_lookup_expired_removes_lazily() {
        let mut store = MemoStore::new();
        let now = Instant::now();
        store.insert(key("a"), 6, Duration::from_secs(5), now);

        assert_eq!(store.lookup(&key("a"), now + Duration::from_secs(6)), None);

        assert!(!store.contains(&key("a")));
        let stats = store.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_store_overwrite_refreshes() {
        let mut store = MemoStore::new();
        let now = Instant::now();
        store.insert(key("a"), 1, Duration::from_secs(5), now);

        let later = now + Duration::from_secs(4);
        store.insert(key("a"), 2, Duration::from_secs(5), later);

        assert_eq!(store.lookup(&key("a"), now + Duration::from_secs(8)), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_remove() {
        let mut store = MemoStore::new();
        store.insert(key("a"), 1, Duration::from_secs(5), Instant::now());

        assert!(store.remove(&key("a")));
        assert!(!store.remove(&key("a")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_sweep_entry_ttl() {
        let mut store = MemoStore::new();
        let now = Instant::now();
        store.insert(key("short"), 1, Duration::from_secs(1), now);
        store.insert(key("long"), 2, Duration::from_secs(60), now);

        let removed = store.sweep(now + Duration::from_secs(2), SweepPolicy::EntryTtl);

        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup(&key("long"), now + Duration::from_secs(2)), Some(2));
        assert_eq!(store.stats().swept, 1);
    }

    #[test]
    fn test_store_sweep_max_age() {
        let mut store = MemoStore::new();
        let now = Instant::now();
        store.insert(key("old_long_ttl"), 1, Duration::from_secs(3600), now);
        store.insert(key("expired"), 2, Duration::from_secs(300), now);
        store.insert(key("young"), 3, Duration::from_secs(3600), now + Duration::from_secs(500));

        let policy = SweepPolicy::MaxAge(Duration::from_secs(600));
        let removed = store.sweep(now + Duration::from_secs(601), policy);

        assert_eq!(removed, 2);
        assert!(!store.contains(&key("old_long_ttl")));
        assert!(!store.contains(&key("expired")));
        assert!(store.contains(&key("young")));
    }

    #[test]
    fn test_store_sweep_max_age_removes_expired_before_limit() {
        let mut store = MemoStore::new();
        let now = Instant::now();
        store.insert(key("a"), 1, Duration::from_secs(60), now);

        let removed = store.sweep(
            now + Duration::from_secs(120),
            SweepPolicy::MaxAge(Duration::from_secs(600)),
        );

        assert_eq!(removed, 1);
    }

    #[test]
    fn test_store_clear_keeps_counters() {
        let mut store = MemoStore::new();
        let now = Instant::now();
        store.insert(key("a"), 1, Duration::from_secs(5), now);
        store.lookup(&key("a"), now);

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.stats().hits, 1);
    }
}
