//! HTTP API endpoints for word list management.
//!
//! Rooms and rounds live entirely on the websocket; this surface only
//! maintains the word pair lists games draw from.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateListBody {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddItemBody {
    item: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemQuery {
    item: Option<String>,
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

/// Liveness probe.
///
/// GET /health
pub async fn health() -> &'static str {
    "OK"
}

/// List the names of all word lists.
///
/// GET /wordlists
pub async fn list_names(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.words.names().await)
}

/// Create an empty word list.
///
/// POST /wordlists
pub async fn create_list(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateListBody>,
) -> Response {
    let Some(name) = body.name.filter(|n| !n.is_empty()) else {
        return bad_request("invalid or exists");
    };
    if !state.words.create(&name).await {
        return bad_request("invalid or exists");
    }
    tracing::info!(name = %name, "Word list created");
    Json(json!({})).into_response()
}

/// Delete a word list. Deleting an unknown name is a no-op.
///
/// DELETE /wordlists/{name}
pub async fn delete_list(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Json<serde_json::Value> {
    state.words.delete(&name).await;
    tracing::info!(name = %name, "Word list deleted");
    Json(json!({}))
}

/// List the "word,word" entries of one list. Unknown names read as empty.
///
/// GET /wordlists/{name}
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Json<Vec<String>> {
    Json(state.words.items(&name).await)
}

/// Append an entry to a list, creating the list if needed.
///
/// POST /wordlists/{name}/items
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(body): Json<AddItemBody>,
) -> Response {
    let Some(item) = body.item.filter(|i| !i.is_empty()) else {
        return bad_request("invalid");
    };
    state.words.add_item(&name, &item).await;
    Json(json!({})).into_response()
}

/// Remove an entry from a list, creating the list if needed.
///
/// DELETE /wordlists/{name}/items?item=...
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<RemoveItemQuery>,
) -> Json<serde_json::Value> {
    state.words.remove_item(&name, query.item.as_deref()).await;
    Json(json!({}))
}
