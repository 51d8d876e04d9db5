//! Memo Module
//!
//! Memoize-with-expiry for pure functions: per-function TTL stores, stable
//! argument keys, and a registry the periodic sweeper walks.

mod entry;
mod key;
mod memoized;
mod registry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use memoized::Memoized;
pub use registry::{FunctionStats, MemoRegistry, SharedStore, SweepReport, SweepTarget};
pub use stats::MemoStats;
pub use store::{MemoStore, SweepPolicy};
