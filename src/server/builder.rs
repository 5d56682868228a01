//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use crate::config::{CatalogConfig, StorageBackend};
use crate::core::error::{CatalogError, CatalogResult};
use crate::core::service::ItemService;
use crate::core::store::ItemStore;
use crate::storage::InMemoryItemStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the catalog HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryItemStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn ItemStore>>,
    config: CatalogConfig,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            config: CatalogConfig::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the item store
    pub fn with_store(mut self, store: impl ItemStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set the configuration used by [`serve_configured`](Self::serve_configured)
    /// and [`with_configured_store`](Self::with_configured_store)
    pub fn with_config(mut self, config: CatalogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Add custom routes to the server
    ///
    /// # Example
    ///
    /// ```ignore
    /// let admin = Router::new().route("/admin/ping", get(|| async { "pong" }));
    ///
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .with_custom_routes(admin)
    ///     .build()?;
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Open the store named by the configuration
    ///
    /// The postgres backend requires the `postgres` feature; its schema is
    /// created on connect.
    pub async fn with_configured_store(mut self) -> CatalogResult<Self> {
        let store: Arc<dyn ItemStore> = match &self.config.storage.backend {
            StorageBackend::InMemory => Arc::new(InMemoryItemStore::new()),
            #[cfg(feature = "postgres")]
            StorageBackend::Postgres {
                url,
                max_connections,
            } => {
                let store =
                    crate::storage::PostgresItemStore::connect(url, *max_connections).await?;
                store.ensure_schema().await?;
                Arc::new(store)
            }
            #[cfg(not(feature = "postgres"))]
            StorageBackend::Postgres { .. } => {
                return Err(crate::core::error::StorageError::Unavailable {
                    backend: "postgres".to_string(),
                }
                .into());
            }
        };
        tracing::info!(backend = self.config.storage.backend.name(), "item store ready");
        self.store = Some(store);
        Ok(self)
    }

    /// Build the item service
    pub fn build_service(&self) -> CatalogResult<ItemService> {
        let store = self.store.clone().ok_or_else(|| {
            CatalogError::Internal("ItemStore is required. Call .with_store()".to_string())
        })?;
        Ok(ItemService::new(store))
    }

    /// Build the final REST router
    pub fn build(mut self) -> CatalogResult<Router> {
        let service = self.build_service()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(RestExposure::build_router(service, custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on the configured bind address
    pub async fn serve_configured(self) -> Result<()> {
        let addr = self.config.server.socket_addr()?.to_string();
        self.serve(&addr).await
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
