//! PostgreSQL item store using sqlx.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! catalog-rs = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! Items live in a `books` table with one column per attribute. Prices are
//! `NUMERIC(10,2)`; they cross the wire as text to avoid float rounding.

use crate::core::error::{CatalogError, CatalogResult, StorageError};
use crate::core::field::FieldValue;
use crate::core::item::{Item, ItemId};
use crate::core::price::{Price, PriceParseError};
use crate::core::query::FilterSpec;
use crate::core::store::ItemStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

const BACKEND: &str = "postgres";

const SELECT_COLUMNS: &str = "id, title, description, publication_date, language, isbn, \
     number_pages, price::TEXT AS price, fk_id_category, fk_id_author, image, review_score, status";

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Create the `books` table if it does not exist (idempotent).
pub async fn ensure_schema(pool: &PgPool) -> CatalogResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS books (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(150) NOT NULL,
            description VARCHAR(300),
            publication_date DATE,
            language VARCHAR(100) NOT NULL,
            isbn VARCHAR(150) UNIQUE,
            number_pages INTEGER,
            price NUMERIC(10, 2) NOT NULL,
            fk_id_category BIGINT NOT NULL,
            fk_id_author BIGINT NOT NULL,
            image VARCHAR(300) NOT NULL,
            review_score INTEGER NOT NULL DEFAULT 0,
            status BOOLEAN NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

fn map_sqlx_error(err: sqlx::Error) -> CatalogError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StorageError::IntegrityError {
                message: db.message().to_string(),
            }
            .into();
        }
    }
    StorageError::QueryError {
        backend: BACKEND.to_string(),
        message: err.to_string(),
    }
    .into()
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &'q FieldValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        FieldValue::String(s) => query.bind(s.as_str()),
        FieldValue::Integer(i) => query.bind(*i),
        FieldValue::Decimal(p) => query.bind(p.to_string()),
        FieldValue::Boolean(b) => query.bind(*b),
        FieldValue::Date(d) => query.bind(*d),
        FieldValue::Null => query.bind(None::<String>),
    }
}

fn item_from_row(row: &PgRow) -> CatalogResult<Item> {
    let price: String = row.try_get("price").map_err(map_sqlx_error)?;
    let price: Price = price.parse().map_err(|e: PriceParseError| {
        StorageError::QueryError {
            backend: BACKEND.to_string(),
            message: e.to_string(),
        }
    })?;

    Ok(Item {
        id: Some(ItemId(row.try_get("id").map_err(map_sqlx_error)?)),
        title: row.try_get("title").map_err(map_sqlx_error)?,
        description: row.try_get("description").map_err(map_sqlx_error)?,
        publication_date: row
            .try_get::<Option<NaiveDate>, _>("publication_date")
            .map_err(map_sqlx_error)?,
        language: row.try_get("language").map_err(map_sqlx_error)?,
        isbn: row.try_get("isbn").map_err(map_sqlx_error)?,
        number_pages: row.try_get("number_pages").map_err(map_sqlx_error)?,
        price,
        category_id: row.try_get("fk_id_category").map_err(map_sqlx_error)?,
        author_id: row.try_get("fk_id_author").map_err(map_sqlx_error)?,
        image: row.try_get("image").map_err(map_sqlx_error)?,
        review_score: row.try_get("review_score").map_err(map_sqlx_error)?,
        status: row.try_get("status").map_err(map_sqlx_error)?,
    })
}

// ---------------------------------------------------------------------------
// PostgresItemStore
// ---------------------------------------------------------------------------

/// Item store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// use catalog::storage::PostgresItemStore;
///
/// let store = PostgresItemStore::connect("postgres://localhost/catalog", 5).await?;
/// store.ensure_schema().await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool
    pub async fn connect(url: &str, max_connections: u32) -> CatalogResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> CatalogResult<()> {
        ensure_schema(&self.pool).await
    }
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    async fn query(&self, filter: &FilterSpec) -> CatalogResult<Vec<Item>> {
        let condition = filter.to_sql(1)?;
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM books WHERE {} ORDER BY id",
            condition.clause
        );

        let mut query = sqlx::query(&sql);
        for param in &condition.params {
            query = bind_value(query, param);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(map_sqlx_error)?;
        rows.iter().map(item_from_row).collect()
    }

    async fn get(&self, id: ItemId) -> CatalogResult<Option<Item>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM books WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(item_from_row).transpose()
    }

    async fn put(&self, item: Item) -> CatalogResult<Item> {
        let price = item.price.to_string();

        let sql = match item.id {
            Some(_) => format!(
                "UPDATE books SET title = $1, description = $2, publication_date = $3, \
                 language = $4, isbn = $5, number_pages = $6, price = $7::NUMERIC, \
                 fk_id_category = $8, fk_id_author = $9, image = $10, review_score = $11, \
                 status = $12 WHERE id = $13 RETURNING {SELECT_COLUMNS}"
            ),
            None => format!(
                "INSERT INTO books (title, description, publication_date, language, isbn, \
                 number_pages, price, fk_id_category, fk_id_author, image, review_score, status) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7::NUMERIC, $8, $9, $10, $11, $12) \
                 RETURNING {SELECT_COLUMNS}"
            ),
        };

        let mut query = sqlx::query(&sql)
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.publication_date)
            .bind(&item.language)
            .bind(&item.isbn)
            .bind(item.number_pages)
            .bind(&price)
            .bind(item.category_id)
            .bind(item.author_id)
            .bind(&item.image)
            .bind(item.review_score)
            .bind(item.status);
        if let Some(id) = item.id {
            query = query.bind(id.0);
        }

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => item_from_row(&row),
            None => Err(CatalogError::not_found(
                item.id.map(|id| id.to_string()).unwrap_or_default(),
            )),
        }
    }

    async fn delete(&self, id: ItemId) -> CatalogResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
