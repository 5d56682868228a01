//! In-memory item store for testing and development

use crate::core::error::{CatalogError, CatalogResult, StorageError};
use crate::core::item::{Item, ItemId};
use crate::core::query::FilterSpec;
use crate::core::store::ItemStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

const BACKEND: &str = "in-memory";

#[derive(Debug, Default)]
struct Inner {
    items: BTreeMap<ItemId, Item>,
    last_id: i64,
}

/// In-memory item store
///
/// Ids are assigned sequentially from 1 and results come back ordered by id.
/// Enforces isbn uniqueness the way a unique column would. Uses RwLock for
/// thread-safe access; clones share the same data.
#[derive(Clone, Debug, Default)]
pub struct InMemoryItemStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryItemStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items
    pub fn len(&self) -> CatalogResult<usize> {
        let inner = self.inner.read().map_err(lock_error)?;
        Ok(inner.items.len())
    }

    pub fn is_empty(&self) -> CatalogResult<bool> {
        self.len().map(|n| n == 0)
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> CatalogError {
    StorageError::QueryError {
        backend: BACKEND.to_string(),
        message: format!("Failed to acquire lock: {}", e),
    }
    .into()
}

fn check_unique_isbn(items: &BTreeMap<ItemId, Item>, item: &Item) -> CatalogResult<()> {
    let Some(isbn) = item.isbn.as_deref() else {
        return Ok(());
    };
    let taken = items
        .values()
        .any(|other| other.id != item.id && other.isbn.as_deref() == Some(isbn));
    if taken {
        return Err(StorageError::IntegrityError {
            message: format!("isbn '{}' is already used by another item", isbn),
        }
        .into());
    }
    Ok(())
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn query(&self, filter: &FilterSpec) -> CatalogResult<Vec<Item>> {
        let inner = self.inner.read().map_err(lock_error)?;

        Ok(inner
            .items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect())
    }

    async fn get(&self, id: ItemId) -> CatalogResult<Option<Item>> {
        let inner = self.inner.read().map_err(lock_error)?;

        Ok(inner.items.get(&id).cloned())
    }

    async fn put(&self, mut item: Item) -> CatalogResult<Item> {
        let mut inner = self.inner.write().map_err(lock_error)?;

        check_unique_isbn(&inner.items, &item)?;

        let id = match item.id {
            Some(id) => {
                if !inner.items.contains_key(&id) {
                    return Err(CatalogError::not_found(id));
                }
                id
            }
            None => {
                inner.last_id += 1;
                ItemId(inner.last_id)
            }
        };

        item.id = Some(id);
        inner.items.insert(id, item.clone());

        Ok(item)
    }

    async fn delete(&self, id: ItemId) -> CatalogResult<bool> {
        let mut inner = self.inner.write().map_err(lock_error)?;

        Ok(inner.items.remove(&id).is_some())
    }
}
