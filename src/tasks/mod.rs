//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Memo sweep: removes expired memo entries at a fixed interval

mod sweeper;

pub use sweeper::{spawn_sweeper, SweeperHandle, MIN_SWEEP_INTERVAL};
