//! Cache Entry Module
//!
//! Defines a single memoized result together with its age and TTL.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A memoized value plus the metadata needed to decide whether it is still valid.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the value was computed (monotonic clock)
    pub created_at: Instant,
    /// How long the value stays valid
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry computed at `created_at`.
    pub fn new(value: V, ttl: Duration, created_at: Instant) -> Self {
        Self {
            value,
            created_at,
            ttl,
        }
    }

    /// Age of the entry at `now`. Saturates to zero if `now` precedes creation.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Validity ==
    /// An entry is valid iff `now - created_at < ttl`.
    ///
    /// Boundary condition: once the full TTL has elapsed the entry is expired,
    /// so a zero TTL is never valid.
    pub fn is_valid_at(&self, now: Instant) -> bool {
        self.age_at(now) < self.ttl
    }

    /// Negation of [`CacheEntry::is_valid_at`].
    pub fn is_expired_at(&self, now: Instant) -> bool {
        !self.is_valid_at(now)
    }

    /// Returns true if the entry is older than `max_age`, regardless of its TTL.
    pub fn is_older_than(&self, max_age: Duration, now: Instant) -> bool {
        self.age_at(now) > max_age
    }

    /// Remaining validity at `now`, zero once expired.
    pub fn ttl_remaining_at(&self, now: Instant) -> Duration {
        self.ttl.saturating_sub(self.age_at(now))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_valid_within_ttl() {
        let now = Instant::now();
        let entry = CacheEntry::new(6, Duration::from_secs(5), now);

        assert!(entry.is_valid_at(now));
        assert!(entry.is_valid_at(now + Duration::from_millis(4_999)));
        assert_eq!(entry.value, 6);
    }

    #[test]
    fn test_entry_expires_at_ttl_boundary() {
        let now = Instant::now();
        let entry = CacheEntry::new("v", Duration::from_secs(5), now);

        assert!(entry.is_expired_at(now + Duration::from_secs(5)));
        assert!(entry.is_expired_at(now + Duration::from_secs(6)));
    }

    #[test]
    fn test_zero_ttl_is_never_valid() {
        let now = Instant::now();
        let entry = CacheEntry::new((), Duration::ZERO, now);

        assert!(entry.is_expired_at(now));
    }

    #[test]
    fn test_ttl_remaining() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u8, Duration::from_secs(10), now);

        assert_eq!(
            entry.ttl_remaining_at(now + Duration::from_secs(4)),
            Duration::from_secs(6)
        );
        assert_eq!(
            entry.ttl_remaining_at(now + Duration::from_secs(30)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_age_saturates_before_creation() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u8, Duration::from_secs(1), now + Duration::from_secs(1));

        assert_eq!(entry.age_at(now), Duration::ZERO);
        assert!(entry.is_valid_at(now));
    }

    #[test]
    fn test_older_than() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u8, Duration::from_secs(3600), now);

        assert!(!entry.is_older_than(Duration::from_secs(600), now + Duration::from_secs(600)));
        assert!(entry.is_older_than(Duration::from_secs(600), now + Duration::from_secs(601)));
    }
}
