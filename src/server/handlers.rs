//! HTTP handlers for item operations
//!
//! Handlers only translate between HTTP and [`ItemService`]; every rule lives
//! in the service and the reconcilers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::core::error::{CatalogError, CatalogResult, RequestError};
use crate::core::item::{Item, ItemId, ItemUpdate, NewItem};
use crate::core::patch::MergePatch;
use crate::core::query::ListCriteria;
use crate::core::service::ItemService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: ItemService,
}

impl AppState {
    pub fn new(service: ItemService) -> Self {
        Self { service }
    }
}

/// Path ids that are not integers cannot name a stored item
fn parse_id(raw: &str) -> CatalogResult<ItemId> {
    raw.parse().map_err(|_| {
        tracing::debug!(id = raw, "unparseable item id");
        CatalogError::not_found(raw)
    })
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> CatalogResult<T> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        RequestError::InvalidBody {
            message: rejection.body_text(),
        }
        .into()
    })
}

/// List items
///
/// GET /books?title=&language=&categoryId=&status=
pub async fn list_items(
    State(state): State<AppState>,
    criteria: Result<Query<ListCriteria>, QueryRejection>,
) -> CatalogResult<Json<Vec<Item>>> {
    let Query(criteria) = criteria.map_err(|rejection| RequestError::InvalidQuery {
        message: rejection.body_text(),
    })?;

    let items = state.service.list_items(&criteria).await?;
    Ok(Json(items.unwrap_or_default()))
}

/// Get a specific item
///
/// GET /books/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> CatalogResult<Json<Item>> {
    let id = parse_id(&id)?;
    state
        .service
        .get_item(id)
        .await?
        .map(Json)
        .ok_or_else(|| CatalogError::not_found(id))
}

/// Delete an item
///
/// DELETE /books/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> CatalogResult<StatusCode> {
    let id = parse_id(&id)?;
    if state.service.delete_item(id).await? {
        Ok(StatusCode::OK)
    } else {
        Err(CatalogError::not_found(id))
    }
}

/// Create an item
///
/// POST /books
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> CatalogResult<impl IntoResponse> {
    let fields = body(payload)?;
    let created = state.service.create_item(fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Apply a JSON merge patch to an item
///
/// PATCH /books/{id}
///
/// The body is read raw so that any content type is accepted and explicit
/// `null` members survive until the reconciler sees them.
pub async fn patch_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    raw: Bytes,
) -> CatalogResult<Json<Item>> {
    let id = parse_id(&id)?;
    let patch = MergePatch::parse(&raw)?;
    let patched = state.service.merge_patch_item(id, &patch).await?;
    Ok(Json(patched))
}

/// Replace the supplied attributes of an item
///
/// PUT /books/{id}
pub async fn replace_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ItemUpdate>, JsonRejection>,
) -> CatalogResult<Json<Item>> {
    let id = parse_id(&id)?;
    let update = body(payload)?;
    let replaced = state.service.replace_item(id, &update).await?;
    Ok(Json(replaced))
}
