//! API Module
//!
//! Diagnostics HTTP surface over the cache registry. It never fetches remote
//! data; it only reports statistics and forces invalidation.
//!
//! # Endpoints
//! - `GET /stats` - Statistics of every partition
//! - `GET /stats/:partition` - Statistics of one partition
//! - `DELETE /partitions/:partition/:key` - Invalidate one entry
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
