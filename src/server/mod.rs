//! HTTP server for the item catalog
//!
//! This module provides a `ServerBuilder` that wires an item store into the
//! REST exposure:
//! - CRUD and merge-patch routes under `/books`
//! - Health check routes

pub mod builder;
pub mod exposure;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use handlers::AppState;
