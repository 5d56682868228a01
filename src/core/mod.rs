//! Core module containing the item model, filters, reconcilers and the storage port

pub mod error;
pub mod field;
pub mod item;
pub mod patch;
pub mod price;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{CatalogError, CatalogResult};
pub use field::FieldValue;
pub use item::{Item, ItemId, ItemUpdate, NewItem};
pub use patch::{MergePatch, Reconcile, SparseCopy};
pub use price::Price;
pub use query::{FilterSpec, ListCriteria, Operator, Predicate};
pub use service::ItemService;
pub use store::ItemStore;
