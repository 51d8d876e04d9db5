//! API Module
//!
//! HTTP handlers and routing for the portal REST API.
//!
//! # Endpoints
//! - `GET /api/catalog` - Full catalog view
//! - `GET /api/departments/:slug` - One department's cards
//! - `GET /stats` - Memo statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
