//! Memoized Function Module
//!
//! Wraps a pure function so repeated calls with equal arguments inside the
//! TTL window return the stored result instead of recomputing it.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::MemoError;
use crate::memo::{CacheKey, MemoRegistry, MemoStats, SharedStore, SweepTarget};

type ComputeFn<A, V, E> = dyn Fn(&A) -> Result<V, E> + Send + Sync;

// == Memoized ==
/// A function wrapped with a per-function TTL cache.
///
/// Errors returned by the wrapped function are passed through unchanged and
/// never stored, so a failed computation is retried on the next call.
///
/// Concurrent callers that miss on the same key each run the function; there
/// is no single-flight de-duplication.
pub struct Memoized<A: ?Sized, V, E = MemoError> {
    ttl: Duration,
    store: Arc<SharedStore<V>>,
    compute: Box<ComputeFn<A, V, E>>,
}

impl<A, V, E> Memoized<A, V, E>
where
    A: Serialize + ?Sized,
    V: Clone + Send + 'static,
    E: From<MemoError>,
{
    // == Constructor ==
    /// Wraps a fallible function and registers its store with `registry`.
    ///
    /// A zero `ttl` is accepted but disables caching: every call recomputes.
    pub fn new<F>(registry: &MemoRegistry, name: impl Into<String>, ttl: Duration, f: F) -> Self
    where
        F: Fn(&A) -> Result<V, E> + Send + Sync + 'static,
    {
        let store = Arc::new(SharedStore::new(name));
        if ttl.is_zero() {
            warn!(function = %store.name(), "Memo TTL is zero, results will always be recomputed");
        }

        let target: Arc<dyn SweepTarget> = store.clone();
        registry.register(Arc::downgrade(&target));

        Self {
            ttl,
            store,
            compute: Box::new(f),
        }
    }

    // == Call ==
    /// Returns the cached result for `args` if still valid, otherwise computes it.
    pub fn call(&self, args: &A) -> Result<V, E> {
        let key = CacheKey::derive(self.name(), args)?;

        let started = Instant::now();
        if let Some(value) = self.store.lock().lookup(&key, started) {
            debug!(function = %self.name(), "Memo hit");
            return Ok(value);
        }

        debug!(function = %self.name(), "Memo miss, computing");
        let value = (self.compute)(args)?;

        if !self.ttl.is_zero() {
            self.store
                .lock()
                .insert(key, value.clone(), self.ttl, started);
        }
        Ok(value)
    }

    // == Invalidate ==
    /// Drops the stored result for `args`. Returns true if one existed.
    pub fn invalidate(&self, args: &A) -> Result<bool, MemoError> {
        let key = CacheKey::derive(self.name(), args)?;
        Ok(self.store.lock().remove(&key))
    }
}

impl<A, V> Memoized<A, V, MemoError>
where
    A: Serialize + ?Sized,
    V: Clone + Send + 'static,
{
    /// Wraps a function that cannot fail. Only key derivation can error.
    pub fn infallible<F>(
        registry: &MemoRegistry,
        name: impl Into<String>,
        ttl: Duration,
        f: F,
    ) -> Self
    where
        F: Fn(&A) -> V + Send + Sync + 'static,
    {
        Self::new(registry, name, ttl, move |args: &A| Ok(f(args)))
    }
}

impl<A: ?Sized, V: Clone, E> Memoized<A, V, E> {
    pub fn name(&self) -> &str {
        self.store.name()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drops every stored result.
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    /// Physically stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> MemoStats {
        self.store.lock().stats()
    }
}

impl<A: ?Sized, V: Clone, E> fmt::Debug for Memoized<A, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("name", &self.name())
            .field("ttl", &self.ttl)
            .finish()
    }
}
