//! Router builder for item routes

use super::handlers::{
    AppState, create_item, delete_item, get_item, list_items, patch_item, replace_item,
};
use axum::{Router, routing::get};

/// Base path of the item collection
pub const ITEMS_PATH: &str = "/books";

/// Build the item routes
///
/// - GET /books - List items matching the query criteria
/// - POST /books - Create an item
/// - GET /books/{id} - Get an item
/// - PATCH /books/{id} - Apply a JSON merge patch
/// - PUT /books/{id} - Overwrite the supplied attributes
/// - DELETE /books/{id} - Delete an item
pub fn build_item_routes(state: AppState) -> Router {
    Router::new()
        .route(ITEMS_PATH, get(list_items).post(create_item))
        .route(
            &format!("{ITEMS_PATH}/{{id}}"),
            get(get_item)
                .patch(patch_item)
                .put(replace_item)
                .delete(delete_item),
        )
        .with_state(state)
}
