//! REST API exposure
//!
//! Consumes an [`ItemService`] and produces an Axum `Router` with the item
//! routes, health checks and request tracing.

use super::super::handlers::AppState;
use super::super::router::build_item_routes;
use crate::core::service::ItemService;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

/// Name reported by the health endpoints
pub const SERVICE_NAME: &str = "catalog";

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Item routes
    /// - Custom routes
    ///
    /// Every request is traced through `tower_http`'s `TraceLayer`.
    pub fn build_router(service: ItemService, custom_routes: Vec<Router>) -> Router {
        let state = AppState::new(service);

        let mut app = Self::health_routes().merge(build_item_routes(state));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.layer(TraceLayer::new_for_http())
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME
        }))
    }
}
