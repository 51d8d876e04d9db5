//! App Portal - configuration-driven catalog of internal tools
//!
//! Serves department catalog views built from a YAML document, memoized with
//! per-function TTL caches and swept by a background task.

pub mod api;
pub mod config;
pub mod error;
pub mod memo;
pub mod models;
pub mod portal;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use memo::{MemoRegistry, Memoized, SweepPolicy};
pub use tasks::{spawn_sweeper, SweeperHandle};
