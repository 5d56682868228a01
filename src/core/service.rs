//! Caller-facing item operations

use crate::core::error::{CatalogError, CatalogResult};
use crate::core::item::{Item, ItemId, ItemUpdate, NewItem};
use crate::core::patch::{MergePatch, Reconcile, SparseCopy};
use crate::core::query::ListCriteria;
use crate::core::store::ItemStore;
use serde_json::Value;
use std::sync::Arc;

/// Item operations over an injected [`ItemStore`]
///
/// Stateless apart from the store handle, so it is cheap to clone and share
/// across request handlers.
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// List items matching the criteria.
    ///
    /// Returns `None` when no criterion is set and the store holds no item,
    /// and `Some(vec![])` when criteria are set but nothing matches.
    pub async fn list_items(&self, criteria: &ListCriteria) -> CatalogResult<Option<Vec<Item>>> {
        let filter = criteria.to_filter();
        tracing::info!(
            title = ?criteria.title,
            language = ?criteria.language,
            category_id = ?criteria.category_id,
            status = ?criteria.status,
            predicates = filter.len(),
            "listing items"
        );

        let items = self.store.query(&filter).await?;
        if filter.is_empty() && items.is_empty() {
            tracing::debug!("store is empty");
            return Ok(None);
        }
        Ok(Some(items))
    }

    pub async fn get_item(&self, id: ItemId) -> CatalogResult<Option<Item>> {
        let item = self.store.get(id).await?;
        if item.is_none() {
            tracing::debug!(item_id = %id, "item not found");
        }
        Ok(item)
    }

    /// Delete an item, returning whether it existed
    pub async fn delete_item(&self, id: ItemId) -> CatalogResult<bool> {
        let removed = self.store.delete(id).await?;
        if removed {
            tracing::info!(item_id = %id, "item deleted");
        } else {
            tracing::warn!(item_id = %id, "delete of unknown item");
        }
        Ok(removed)
    }

    /// Validate and persist a new item
    pub async fn create_item(&self, fields: NewItem) -> CatalogResult<Item> {
        let item = fields.into_item().inspect_err(|e| {
            tracing::warn!(error = %e, "item creation rejected");
        })?;
        let created = self.store.put(item).await?;
        if let Some(id) = created.id {
            tracing::info!(item_id = %id, title = %created.title, "item created");
        }
        Ok(created)
    }

    /// Apply an RFC 7386 merge patch and persist the result
    pub async fn merge_patch_item(&self, id: ItemId, patch: &Value) -> CatalogResult<Item> {
        self.reconcile(id, &MergePatch, patch).await
    }

    /// Overwrite the attributes supplied in `update` and persist the result
    pub async fn replace_item(&self, id: ItemId, update: &ItemUpdate) -> CatalogResult<Item> {
        self.reconcile(id, &SparseCopy, update).await
    }

    async fn reconcile<R>(&self, id: ItemId, strategy: &R, document: &R::Document) -> CatalogResult<Item>
    where
        R: Reconcile + Sync,
        R::Document: Sync,
    {
        let existing = self.store.get(id).await?.ok_or_else(|| {
            tracing::warn!(item_id = %id, strategy = R::NAME, "update of unknown item");
            CatalogError::not_found(id)
        })?;

        let candidate = strategy.reconcile(&existing, document).inspect_err(|e| {
            tracing::warn!(item_id = %id, strategy = R::NAME, error = %e, "update rejected");
        })?;

        let updated = self.store.put(candidate).await?;
        tracing::info!(item_id = %id, strategy = R::NAME, "item updated");
        Ok(updated)
    }
}
