//! Response models for the portal API
//!
//! Catalog views serialize directly; this module holds the operational
//! response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{HealthResponse, StatsResponse};
