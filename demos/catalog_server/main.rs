//! Catalog server demo
//!
//! Loads `demos/catalog_server/catalog.yaml` (or the path given as the first
//! argument), seeds a few books into the in-memory store and serves the REST API.
//!
//! ```sh
//! cargo run --example catalog_server
//! curl 'http://127.0.0.1:8080/books?language=en'
//! curl -X PATCH http://127.0.0.1:8080/books/1 -d '{"reviewScore": 5, "isbn": null}'
//! ```

use anyhow::Result;
use catalog::prelude::*;
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "demos/catalog_server/catalog.yaml";

fn seed() -> Vec<NewItem> {
    vec![
        NewItem {
            title: Some("Dune".to_string()),
            description: Some("A desert planet and the spice that rules it".to_string()),
            publication_date: NaiveDate::from_ymd_opt(1965, 8, 1),
            language: Some("en".to_string()),
            isbn: Some("978-0441013593".to_string()),
            number_pages: Some(412),
            price: Some(Price::from_cents(1999)),
            category_id: Some(1),
            author_id: Some(5),
            image: Some("dune.jpg".to_string()),
            review_score: Some(5),
            status: Some(true),
        },
        NewItem {
            title: Some("Cien años de soledad".to_string()),
            language: Some("es".to_string()),
            price: Some(Price::from_cents(1550)),
            category_id: Some(2),
            author_id: Some(7),
            image: Some("cien-anos.jpg".to_string()),
            ..Default::default()
        },
        NewItem {
            title: Some("Le Petit Prince".to_string()),
            language: Some("fr".to_string()),
            price: Some(Price::from_cents(899)),
            category_id: Some(3),
            author_id: Some(9),
            image: Some("petit-prince.jpg".to_string()),
            status: Some(false),
            ..Default::default()
        },
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = CatalogConfig::from_yaml_file(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let builder = ServerBuilder::new()
        .with_config(config)
        .with_configured_store()
        .await?;

    // Seed only an empty store so a postgres backend can be restarted
    let service = builder.build_service()?;
    if service.list_items(&ListCriteria::default()).await?.is_none() {
        for item in seed() {
            let created = service.create_item(item).await?;
            tracing::info!(id = ?created.id, title = %created.title, "seeded");
        }
    }

    builder.serve_configured().await
}
