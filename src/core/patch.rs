//! Partial-update reconciliation
//!
//! Two strategies share the [`Reconcile`] interface and differ only in how
//! they read `null`:
//!
//! - [`MergePatch`] (RFC 7386): an explicit `null` clears an optional
//!   attribute, and is rejected on a required one.
//! - [`SparseCopy`] (full-shape update document): `null` or absent always
//!   means "leave unchanged". Optional attributes cannot be cleared this way.
//!
//! Both return a new, re-validated [`Item`]. Persisting it is up to the caller.

use crate::core::error::{
    CatalogError, CatalogResult, FieldValidationError, ItemError, ValidationError,
};
use crate::core::item::{Item, ItemUpdate, attr, has_length, non_blank, trimmed};
use serde_json::{Map, Value};

/// A strategy applying an update document to an existing item
pub trait Reconcile {
    /// Shape of the update document
    type Document: ?Sized;

    /// Name used in logs
    const NAME: &'static str;

    /// Produce the updated item without touching `existing`
    fn reconcile(&self, existing: &Item, document: &Self::Document) -> CatalogResult<Item>;
}

/// RFC 7386 JSON merge patch
#[derive(Debug, Clone, Copy, Default)]
pub struct MergePatch;

impl MergePatch {
    /// Parse a raw request body into a patch document
    pub fn parse(body: &[u8]) -> CatalogResult<Value> {
        serde_json::from_slice(body).map_err(|e| {
            ItemError::MalformedPatch {
                message: e.to_string(),
            }
            .into()
        })
    }
}

impl Reconcile for MergePatch {
    type Document = Value;

    const NAME: &'static str = "merge-patch";

    fn reconcile(&self, existing: &Item, document: &Value) -> CatalogResult<Item> {
        let Value::Object(patch) = document else {
            return Err(ItemError::MalformedPatch {
                message: format!("expected a JSON object, got {}", json_kind(document)),
            }
            .into());
        };

        // Only scalar item attributes take part; `id` is immutable
        let patch: Map<String, Value> = patch
            .iter()
            .filter(|(key, _)| key.as_str() != attr::ID && Item::ATTRIBUTES.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let cleared_required: Vec<FieldValidationError> = patch
            .iter()
            .filter(|(key, value)| value.is_null() && Item::is_required(key))
            .map(|(key, _)| FieldValidationError::new(key.as_str(), "is required"))
            .collect();
        if !cleared_required.is_empty() {
            return Err(ValidationError::FieldErrors(cleared_required).into());
        }

        let mut target = serde_json::to_value(existing).map_err(serialization_fault)?;
        merge_json(&mut target, &Value::Object(patch));

        let mut candidate: Item =
            serde_json::from_value(target).map_err(|e| ItemError::MalformedPatch {
                message: e.to_string(),
            })?;
        candidate.id = existing.id;
        candidate.description = non_blank(candidate.description);
        candidate.isbn = non_blank(candidate.isbn);
        candidate.validate()?;

        Ok(candidate)
    }
}

/// Apply `patch` onto `target` following RFC 7386
pub fn merge_json(target: &mut Value, patch: &Value) {
    let Value::Object(patch) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(target) = target {
        for (key, value) in patch {
            if value.is_null() {
                target.remove(key);
            } else {
                merge_json(target.entry(key.as_str()).or_insert(Value::Null), value);
            }
        }
    }
}

/// A stored item that cannot be rendered as JSON is a server fault, never a client error
fn serialization_fault(err: serde_json::Error) -> CatalogError {
    CatalogError::Internal(format!("cannot serialize stored item: {err}"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Overwrite-if-present copy from an [`ItemUpdate`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SparseCopy;

impl Reconcile for SparseCopy {
    type Document = ItemUpdate;

    const NAME: &'static str = "sparse-copy";

    fn reconcile(&self, existing: &Item, update: &ItemUpdate) -> CatalogResult<Item> {
        let mut candidate = existing.clone();

        // Required text: empty strings are ignored
        if has_length(&update.title) {
            candidate.title = trimmed(update.title.clone()).unwrap_or_default();
        }
        if has_length(&update.language) {
            candidate.language = trimmed(update.language.clone()).unwrap_or_default();
        }
        if has_length(&update.image) {
            candidate.image = trimmed(update.image.clone()).unwrap_or_default();
        }

        // Optional text: blank values are ignored, so nothing is cleared here
        if let Some(description) = non_blank(update.description.clone()) {
            candidate.description = Some(description);
        }
        if let Some(isbn) = non_blank(update.isbn.clone()) {
            candidate.isbn = Some(isbn);
        }
        if let Some(date) = update.publication_date {
            candidate.publication_date = Some(date);
        }
        if let Some(pages) = update.number_pages {
            candidate.number_pages = Some(pages);
        }
        if let Some(price) = update.price {
            candidate.price = price;
        }
        if let Some(category_id) = update.category_id {
            candidate.category_id = category_id;
        }
        if let Some(author_id) = update.author_id {
            candidate.author_id = author_id;
        }
        if let Some(score) = update.review_score {
            candidate.review_score = score;
        }
        if let Some(status) = update.status {
            candidate.status = status;
        }

        candidate.validate()?;
        Ok(candidate)
    }
}
