//! # Catalog
//!
//! A record service for catalog items (books) with composable filters and two
//! partial-update semantics.
//!
//! ## Features
//!
//! - **Filter Builder**: sparse list criteria become a flat conjunction of typed predicates
//! - **Merge Patch**: RFC 7386 updates where `null` clears an optional attribute
//! - **Sparse Replace**: full-shape updates where `null` always means "unchanged"
//! - **Storage Port**: async `ItemStore` trait with in-memory and PostgreSQL backends
//! - **REST Exposure**: axum routes under `/books` with typed JSON errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog::prelude::*;
//!
//! let service = ItemService::new(Arc::new(InMemoryItemStore::new()));
//!
//! let dune = service
//!     .create_item(NewItem {
//!         title: Some("Dune".into()),
//!         language: Some("en".into()),
//!         price: Some("19.99".parse()?),
//!         category_id: Some(1),
//!         author_id: Some(5),
//!         image: Some("dune.jpg".into()),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let patched = service
//!     .merge_patch_item(dune.id.unwrap(), &json!({ "reviewScore": 5 }))
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{CatalogError, CatalogResult},
        field::FieldValue,
        item::{Item, ItemId, ItemUpdate, NewItem},
        patch::{MergePatch, Reconcile, SparseCopy},
        price::Price,
        query::{FilterSpec, ListCriteria, Operator, Predicate},
        service::ItemService,
        store::ItemStore,
    };

    // === Storage ===
    pub use crate::storage::InMemoryItemStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresItemStore;

    // === Config ===
    pub use crate::config::{CatalogConfig, ServerConfig, StorageBackend, StorageConfig};

    // === Server ===
    pub use crate::server::{RestExposure, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::json;
    pub use std::sync::Arc;
}
