//! Typed error handling for the catalog service
//!
//! Every operation reports failures as a [`CatalogError`] so callers can match
//! on the specific kind instead of inspecting strings.
//!
//! # Error Categories
//!
//! - [`ItemError`]: the targeted item is absent, or a patch document cannot be interpreted
//! - [`ValidationError`]: an item violates one of its invariants
//! - [`StorageError`]: the storage port itself failed (I/O, uniqueness, ...)
//! - [`ConfigError`]: configuration parsing and loading
//! - [`RequestError`]: malformed HTTP input (query string, body)
//!
//! # Example
//!
//! ```rust,ignore
//! match service.merge_patch_item(id, &patch).await {
//!     Ok(item) => println!("patched: {:?}", item),
//!     Err(CatalogError::Item(ItemError::NotFound { id })) => println!("{id} is gone"),
//!     Err(CatalogError::Validation(e)) => println!("rejected: {e}"),
//!     Err(e) => eprintln!("other error: {e}"),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type of the catalog service
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Item-level failures (missing item, unreadable patch)
    #[error(transparent)]
    Item(#[from] ItemError),

    /// Invariant violations
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage port failures, propagated unchanged
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CatalogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Item(e) => e.status_code(),
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::Storage(e) => e.status_code(),
            CatalogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Request(_) => StatusCode::BAD_REQUEST,
            CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Item(e) => e.error_code(),
            CatalogError::Validation(_) => "VALIDATION_FAILED",
            CatalogError::Storage(e) => e.error_code(),
            CatalogError::Config(_) => "CONFIG_ERROR",
            CatalogError::Request(e) => e.error_code(),
            CatalogError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Shorthand for a not-found error on the given key
    pub fn not_found(id: impl ToString) -> Self {
        CatalogError::Item(ItemError::NotFound { id: id.to_string() })
    }

    /// Whether this error reports an absent item
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Item(ItemError::NotFound { .. }))
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            CatalogError::Item(ItemError::NotFound { id }) => {
                Some(serde_json::json!({ "id": id }))
            }
            CatalogError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Item Errors
// =============================================================================

/// Errors related to a single item operation
#[derive(Debug, Error)]
pub enum ItemError {
    /// No item is stored under the requested key
    #[error("item with id '{id}' not found")]
    NotFound { id: String },

    /// The patch document cannot be interpreted as an item patch
    #[error("malformed patch document: {message}")]
    MalformedPatch { message: String },
}

impl ItemError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ItemError::NotFound { .. } => StatusCode::NOT_FOUND,
            ItemError::MalformedPatch { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ItemError::NotFound { .. } => "ITEM_NOT_FOUND",
            ItemError::MalformedPatch { .. } => "MALFORMED_PATCH",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to item invariants
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Multiple field validation errors
    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// A predicate references an attribute the item does not have
    #[error("Unknown attribute: {attribute}")]
    UnknownAttribute { attribute: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ValidationError {
    /// Names of the fields this error reports on
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::FieldErrors(errors) => {
                errors.iter().map(|e| e.field.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection error
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    /// Query execution error
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },

    /// Data integrity error (e.g. duplicate isbn)
    #[error("Data integrity error: {message}")]
    IntegrityError { message: String },

    /// Backend not available
    #[error("Storage backend '{backend}' is unavailable")]
    Unavailable { backend: String },
}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::IntegrityError { .. } => StatusCode::CONFLICT,
            StorageError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::ConnectionError { .. } => "STORAGE_CONNECTION_ERROR",
            StorageError::QueryError { .. } => "STORAGE_QUERY_ERROR",
            StorageError::IntegrityError { .. } => "STORAGE_INTEGRITY_ERROR",
            StorageError::Unavailable { .. } => "STORAGE_UNAVAILABLE",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{f}'")).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    /// Invalid query string
    #[error("Invalid query string: {message}")]
    InvalidQuery { message: String },

    /// Invalid request body
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },
}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for CatalogError {
    fn from(err: serde_yaml::Error) -> Self {
        CatalogError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<CatalogError>() {
            Ok(catalog_err) => catalog_err,
            Err(err) => CatalogError::Internal(err.to_string()),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
