//! API exposure modules
//!
//! Each exposure type consumes an `ItemService` and produces a Router for its
//! protocol. Only REST is provided.

pub mod rest;

pub use rest::RestExposure;
