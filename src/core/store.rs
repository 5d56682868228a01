//! The storage port consumed by the item service

use crate::core::error::CatalogResult;
use crate::core::item::{Item, ItemId};
use crate::core::query::FilterSpec;
use async_trait::async_trait;

/// Persistence capability for items
///
/// Implementations own every storage concern (transactions, pooling,
/// uniqueness of `isbn`). The service never retries, batches or caches
/// against a store, and failures are propagated unchanged.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Items matching every predicate of `filter`
    async fn query(&self, filter: &FilterSpec) -> CatalogResult<Vec<Item>>;

    /// Get an item by id
    async fn get(&self, id: ItemId) -> CatalogResult<Option<Item>>;

    /// Persist an item
    ///
    /// Items without an id are inserted and receive one; items with an id
    /// replace the stored record.
    async fn put(&self, item: Item) -> CatalogResult<Item>;

    /// Remove an item. Returns `false` when nothing was stored under `id`.
    async fn delete(&self, id: ItemId) -> CatalogResult<bool>;
}
