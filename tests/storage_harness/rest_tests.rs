//! REST integration test macro for item stores.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that drive
//! an `ItemStore` through full REST round-trips:
//! JSON → HTTP request → handler → ItemService → store → HTTP response → JSON.
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_rest_create`: POST 201 + body with assigned id
//! - `test_rest_create_missing_fields`: POST 400 with field details
//! - `test_rest_get` / `test_rest_get_unknown` / `test_rest_get_unparseable_id`
//! - `test_rest_delete`: 200, then 404
//!
//! ## List
//! - `test_rest_list_empty_store`: `[]`, never null
//! - `test_rest_list_filters`
//! - `test_rest_list_empty_query_values`: `categoryId=&status=` filter nothing
//! - `test_rest_list_bad_query`: 400
//!
//! ## Updates
//! - `test_rest_patch` / `test_rest_patch_clears_optional` / `test_rest_patch_errors`
//! - `test_rest_put` / `test_rest_put_unknown`
//!
//! ## Health
//! - `test_rest_health`

/// Generate a REST integration test suite for a storage backend.
///
/// `$store_factory` must produce an `impl ItemStore + 'static`.
#[macro_export]
macro_rules! rest_integration_tests {
    ($store_factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use catalog::server::ServerBuilder;
            use serde_json::{Value, json};

            async fn make_server() -> TestServer {
                let store = $store_factory;
                let router = ServerBuilder::new().with_store(store).build().unwrap();
                TestServer::try_new(router).unwrap()
            }

            fn dune_json() -> Value {
                json!({
                    "title": "Dune",
                    "language": "en",
                    "price": 19.99,
                    "categoryId": 1,
                    "authorId": 5,
                    "image": "dune.jpg",
                    "isbn": "978-0441013593",
                    "description": "Desert planet"
                })
            }

            async fn create_dune(server: &TestServer) -> i64 {
                let response = server.post("/books").json(&dune_json()).await;
                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                body["id"].as_i64().unwrap()
            }

            // ==============================================================
            // CRUD
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create() {
                let server = make_server().await;

                let response = server.post("/books").json(&dune_json()).await;
                response.assert_status(StatusCode::CREATED);

                let body: Value = response.json();
                assert!(body["id"].as_i64().is_some());
                assert_eq!(body["title"], "Dune");
                assert_eq!(body["price"], 19.99);
                assert_eq!(body["reviewScore"], 0);
                assert_eq!(body["status"], true);
            }

            #[tokio::test]
            async fn test_rest_create_missing_fields() {
                let server = make_server().await;

                let response = server
                    .post("/books")
                    .json(&json!({ "title": "", "language": "en" }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);

                let body: Value = response.json();
                assert_eq!(body["code"], "VALIDATION_FAILED");
                let fields: Vec<&str> = body["details"]["fields"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|f| f["field"].as_str().unwrap())
                    .collect();
                assert_eq!(fields, vec!["title", "price", "categoryId", "authorId", "image"]);
            }

            #[tokio::test]
            async fn test_rest_create_invalid_json() {
                let server = make_server().await;

                let response = server
                    .post("/books")
                    .json(&json!({ "title": "Dune", "price": true }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_BODY");
            }

            #[tokio::test]
            async fn test_rest_get() {
                let server = make_server().await;
                let id = create_dune(&server).await;

                let response = server.get(&format!("/books/{}", id)).await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["id"], id);
                assert_eq!(body["isbn"], "978-0441013593");
            }

            #[tokio::test]
            async fn test_rest_get_unknown() {
                let server = make_server().await;

                let response = server.get("/books/424242").await;
                response.assert_status(StatusCode::NOT_FOUND);
                let body: Value = response.json();
                assert_eq!(body["code"], "ITEM_NOT_FOUND");
            }

            #[tokio::test]
            async fn test_rest_get_unparseable_id() {
                let server = make_server().await;

                let response = server.get("/books/not-a-number").await;
                response.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_delete() {
                let server = make_server().await;
                let id = create_dune(&server).await;

                server
                    .delete(&format!("/books/{}", id))
                    .await
                    .assert_status(StatusCode::OK);
                server
                    .delete(&format!("/books/{}", id))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
                server
                    .get(&format!("/books/{}", id))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // List
            // ==============================================================

            #[tokio::test]
            async fn test_rest_list_empty_store() {
                let server = make_server().await;

                let response = server.get("/books").await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body, json!([]));
            }

            #[tokio::test]
            async fn test_rest_list_filters() {
                let server = make_server().await;
                create_dune(&server).await;
                server
                    .post("/books")
                    .json(&json!({
                        "title": "Le Petit Prince",
                        "language": "fr",
                        "price": "8.99",
                        "categoryId": 2,
                        "authorId": 9,
                        "image": "petit-prince.jpg",
                        "status": false
                    }))
                    .await
                    .assert_status(StatusCode::CREATED);

                let all: Value = server.get("/books").await.json();
                assert_eq!(all.as_array().unwrap().len(), 2);

                let response = server.get("/books").add_query_param("language", "en").await;
                let body: Value = response.json();
                assert_eq!(body.as_array().unwrap().len(), 1);
                assert_eq!(body[0]["title"], "Dune");

                let response = server
                    .get("/books")
                    .add_query_param("title", "PETIT")
                    .add_query_param("status", "false")
                    .await;
                let body: Value = response.json();
                assert_eq!(body.as_array().unwrap().len(), 1);
                assert_eq!(body[0]["language"], "fr");

                let response = server
                    .get("/books")
                    .add_query_param("language", "de")
                    .await;
                response.assert_status(StatusCode::OK);
                assert_eq!(response.json::<Value>(), json!([]));
            }

            #[tokio::test]
            async fn test_rest_list_empty_query_values() {
                let server = make_server().await;
                create_dune(&server).await;
                server
                    .post("/books")
                    .json(&json!({
                        "title": "Solaris",
                        "language": "pl",
                        "price": 12.5,
                        "categoryId": 4,
                        "authorId": 3,
                        "image": "solaris.jpg",
                        "status": false
                    }))
                    .await
                    .assert_status(StatusCode::CREATED);

                let response = server
                    .get("/books")
                    .add_query_param("title", "")
                    .add_query_param("language", "")
                    .add_query_param("categoryId", "")
                    .add_query_param("status", "")
                    .await;
                response.assert_status(StatusCode::OK);
                assert_eq!(response.json::<Value>().as_array().unwrap().len(), 2);

                let response = server
                    .get("/books")
                    .add_query_param("categoryId", "4")
                    .add_query_param("status", "")
                    .await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body.as_array().unwrap().len(), 1);
                assert_eq!(body[0]["title"], "Solaris");
            }

            #[tokio::test]
            async fn test_rest_list_bad_query() {
                let server = make_server().await;

                let response = server
                    .get("/books")
                    .add_query_param("categoryId", "fiction")
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_QUERY");
            }

            // ==============================================================
            // Updates
            // ==============================================================

            #[tokio::test]
            async fn test_rest_patch() {
                let server = make_server().await;
                let id = create_dune(&server).await;

                let response = server
                    .patch(&format!("/books/{}", id))
                    .json(&json!({ "reviewScore": 5 }))
                    .await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["reviewScore"], 5);
                assert_eq!(body["title"], "Dune");
                assert_eq!(body["isbn"], "978-0441013593");
            }

            #[tokio::test]
            async fn test_rest_patch_clears_optional() {
                let server = make_server().await;
                let id = create_dune(&server).await;

                let response = server
                    .patch(&format!("/books/{}", id))
                    .json(&json!({ "isbn": null }))
                    .await;
                response.assert_status(StatusCode::OK);

                let stored: Value = server.get(&format!("/books/{}", id)).await.json();
                assert!(stored["isbn"].is_null());
                assert_eq!(stored["description"], "Desert planet");
            }

            #[tokio::test]
            async fn test_rest_patch_errors() {
                let server = make_server().await;
                let id = create_dune(&server).await;
                let path = format!("/books/{}", id);

                let response = server.patch(&path).json(&json!({ "title": null })).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["code"], "VALIDATION_FAILED");

                let response = server.patch(&path).text("{ not json").await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["code"], "MALFORMED_PATCH");

                let response = server.patch(&path).json(&json!(["title"])).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["code"], "MALFORMED_PATCH");

                server
                    .patch("/books/424242")
                    .json(&json!({ "reviewScore": 1 }))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);

                // nothing changed
                let stored: Value = server.get(&path).await.json();
                assert_eq!(stored["title"], "Dune");
            }

            #[tokio::test]
            async fn test_rest_put() {
                let server = make_server().await;
                let id = create_dune(&server).await;

                let response = server
                    .put(&format!("/books/{}", id))
                    .json(&json!({ "title": " Dune Messiah ", "isbn": null }))
                    .await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["title"], "Dune Messiah");
                assert_eq!(body["isbn"], "978-0441013593");
                assert_eq!(body["description"], "Desert planet");
            }

            #[tokio::test]
            async fn test_rest_put_unknown() {
                let server = make_server().await;

                server
                    .put("/books/424242")
                    .json(&json!({ "title": "Nothing" }))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // Health
            // ==============================================================

            #[tokio::test]
            async fn test_rest_health() {
                let server = make_server().await;

                for path in ["/health", "/healthz"] {
                    let response = server.get(path).await;
                    response.assert_status(StatusCode::OK);
                    let body: Value = response.json();
                    assert_eq!(body["status"], "ok");
                    assert_eq!(body["service"], "catalog");
                }
            }
        }
    };
}
