//! Macro-generated test suite for `ItemStore` contract validation.
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_put_assigns_id`: new item receives an id, get returns it
//! - `test_get_nonexistent`: unknown id returns None
//! - `test_put_replaces_existing`: put with id overwrites the record
//! - `test_put_unknown_id_not_found`: put with an id nothing holds
//! - `test_delete_existing` / `test_delete_nonexistent`
//!
//! ## Query
//! - `test_query_empty_filter_returns_all`
//! - `test_query_each_operator`: EQ, NEQ, CONTAINS, STARTS_WITH, GT, LTE
//! - `test_query_null_predicates`
//! - `test_query_conjunction`
//!
//! ## Integrity
//! - `test_duplicate_isbn_rejected`
//! - `test_concurrent_puts`

/// Generate a full `ItemStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh, empty store. It is re-evaluated for
/// each test. For the concurrency test the store must be `Clone + 'static`.
#[macro_export]
macro_rules! item_store_tests {
    ($factory:expr) => {
        mod item_store_contract_tests {
            use super::*;
            use catalog::core::error::{CatalogError, StorageError};
            use catalog::core::field::FieldValue;
            use catalog::core::item::ItemId;
            use catalog::core::price::Price;
            use catalog::core::query::{FilterSpec, Predicate};
            use catalog::core::store::ItemStore;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_put_assigns_id() {
                let store = $factory;
                let created = store.put(unsaved(dune_fields())).await.unwrap();
                let id = created.id.expect("id must be assigned");

                let fetched = store.get(id).await.unwrap().unwrap();
                assert_eq!(fetched, created);
                assert_eq!(fetched.title, "Dune");
                assert_eq!(fetched.price, Price::from_cents(1999));
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                assert!(store.get(ItemId(9_999)).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_put_replaces_existing() {
                let store = $factory;
                let mut item = store.put(unsaved(dune_fields())).await.unwrap();
                item.title = "Dune Messiah".to_string();
                item.isbn = Some("978-0593098233".to_string());

                let updated = store.put(item.clone()).await.unwrap();
                assert_eq!(updated, item);

                let all = store.query(&FilterSpec::new()).await.unwrap();
                assert_eq!(all.len(), 1);
                assert_eq!(all[0].title, "Dune Messiah");
            }

            #[tokio::test]
            async fn test_put_unknown_id_not_found() {
                let store = $factory;
                let mut item = unsaved(dune_fields());
                item.id = Some(ItemId(9_999));
                let err = store.put(item).await.unwrap_err();
                assert!(err.is_not_found());
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                let id = store.put(unsaved(dune_fields())).await.unwrap().id.unwrap();

                assert!(store.delete(id).await.unwrap());
                assert!(store.get(id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                assert!(!store.delete(ItemId(9_999)).await.unwrap());
            }

            // ==================================================================
            // Query
            // ==================================================================

            async fn seed<S: ItemStore>(store: &S) {
                for fields in [
                    book_fields("Dune", "en", 1, true),
                    book_fields("Dune Messiah", "en", 1, false),
                    book_fields("Le Petit Prince", "fr", 2, true),
                    book_fields("Cien años de soledad", "es", 3, true),
                ] {
                    store.put(unsaved(fields)).await.unwrap();
                }
            }

            fn titles(items: &[catalog::core::item::Item]) -> Vec<&str> {
                let mut titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
                titles.sort();
                titles
            }

            #[tokio::test]
            async fn test_query_empty_filter_returns_all() {
                let store = $factory;
                assert!(store.query(&FilterSpec::new()).await.unwrap().is_empty());

                seed(&store).await;
                assert_eq!(store.query(&FilterSpec::new()).await.unwrap().len(), 4);
            }

            #[tokio::test]
            async fn test_query_each_operator() {
                let store = $factory;
                seed(&store).await;

                let found = store
                    .query(&FilterSpec::new().with(Predicate::eq("language", "en")))
                    .await
                    .unwrap();
                assert_eq!(titles(&found), vec!["Dune", "Dune Messiah"]);

                let found = store
                    .query(&FilterSpec::new().with(Predicate::neq("language", "en")))
                    .await
                    .unwrap();
                assert_eq!(found.len(), 2);

                let found = store
                    .query(&FilterSpec::new().with(Predicate::contains("title", "PRINCE")))
                    .await
                    .unwrap();
                assert_eq!(titles(&found), vec!["Le Petit Prince"]);

                let found = store
                    .query(&FilterSpec::new().with(Predicate::starts_with("title", "dune")))
                    .await
                    .unwrap();
                assert_eq!(found.len(), 2);

                let found = store
                    .query(&FilterSpec::new().with(Predicate::gt("categoryId", 1_i64)))
                    .await
                    .unwrap();
                assert_eq!(found.len(), 2);

                let found = store
                    .query(&FilterSpec::new().with(Predicate::lte("price", Price::from_cents(999))))
                    .await
                    .unwrap();
                assert!(found.is_empty());
            }

            #[tokio::test]
            async fn test_query_null_predicates() {
                let store = $factory;
                seed(&store).await;
                store.put(unsaved_with_isbn("Hyperion", "978-0553283686")).await.unwrap();

                let found = store
                    .query(&FilterSpec::new().with(Predicate::neq("isbn", FieldValue::Null)))
                    .await
                    .unwrap();
                assert_eq!(titles(&found), vec!["Hyperion"]);

                let found = store
                    .query(&FilterSpec::new().with(Predicate::eq("isbn", FieldValue::Null)))
                    .await
                    .unwrap();
                assert_eq!(found.len(), 4);
            }

            #[tokio::test]
            async fn test_query_conjunction() {
                let store = $factory;
                seed(&store).await;

                let filter = FilterSpec::new()
                    .with(Predicate::contains("title", "dune"))
                    .with(Predicate::eq("status", true));
                let found = store.query(&filter).await.unwrap();
                assert_eq!(titles(&found), vec!["Dune"]);

                let filter = filter.with(Predicate::eq("categoryId", 2_i64));
                assert!(store.query(&filter).await.unwrap().is_empty());
            }

            // ==================================================================
            // Integrity
            // ==================================================================

            #[tokio::test]
            async fn test_duplicate_isbn_rejected() {
                let store = $factory;
                store.put(unsaved_with_isbn("First", "123-456")).await.unwrap();

                let err = store
                    .put(unsaved_with_isbn("Second", "123-456"))
                    .await
                    .unwrap_err();
                assert!(matches!(
                    err,
                    CatalogError::Storage(StorageError::IntegrityError { .. })
                ));
                assert_eq!(store.query(&FilterSpec::new()).await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_concurrent_puts() {
                let store = $factory;
                let mut handles = Vec::new();
                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store
                            .put(unsaved(book_fields(&format!("Book {i}"), "en", 1, true)))
                            .await
                            .unwrap()
                    }));
                }

                let mut ids = Vec::new();
                for handle in handles {
                    ids.push(handle.await.unwrap().id.unwrap());
                }
                ids.sort();
                ids.dedup();
                assert_eq!(ids.len(), 10);
            }
        }
    };
}
