//! Shared test harness for item store testing
//!
//! Provides fixture builders for items and the macro-generated contract
//! suites every `ItemStore` backend must pass.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//!
//! item_store_tests!(InMemoryItemStore::new());
//! rest_integration_tests!(InMemoryItemStore::new());
//! ```

#![allow(dead_code)]

pub mod item_store_tests;
pub mod rest_tests;

use catalog::core::item::{Item, NewItem};
use catalog::core::price::Price;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// The reference book: Dune, en, 19.99, category 1, author 5
pub fn dune_fields() -> NewItem {
    NewItem {
        title: Some("Dune".to_string()),
        language: Some("en".to_string()),
        price: Some(Price::from_cents(1999)),
        category_id: Some(1),
        author_id: Some(5),
        image: Some("dune.jpg".to_string()),
        ..Default::default()
    }
}

/// A valid book with the four filterable attributes chosen by the caller
pub fn book_fields(title: &str, language: &str, category_id: i64, status: bool) -> NewItem {
    NewItem {
        title: Some(title.to_string()),
        language: Some(language.to_string()),
        price: Some(Price::from_cents(1000)),
        category_id: Some(category_id),
        author_id: Some(1),
        image: Some(format!("{}.jpg", title.to_lowercase().replace(' ', "-"))),
        status: Some(status),
        ..Default::default()
    }
}

/// An unpersisted item, ready for `ItemStore::put`
pub fn unsaved(fields: NewItem) -> Item {
    fields.into_item().expect("fixture must be valid")
}

/// Unpersisted item with an isbn
pub fn unsaved_with_isbn(title: &str, isbn: &str) -> Item {
    unsaved(NewItem {
        isbn: Some(isbn.to_string()),
        ..book_fields(title, "en", 1, true)
    })
}
