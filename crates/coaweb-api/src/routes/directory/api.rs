//! Directory API endpoints - navigation, search and expansion as JSON
//!
//! Every navigation call answers with the resulting view so a client
//! never needs a second round trip.

use crate::{ApiError, AppState};
use axum::extract::{Path, Query};
use axum::Json;
use coaweb_core::{AccountId, CoreError, DirectoryView};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub async fn api_directory(state: axum::extract::State<AppState>) -> Json<DirectoryView> {
    Json(state.directory.read().await.view())
}

/// Open a folder; leaves and unknown ids leave the view unchanged
pub async fn api_directory_enter(
    state: axum::extract::State<AppState>,
    Path(id): Path<AccountId>,
) -> Json<DirectoryView> {
    let mut directory = state.directory.write().await;
    directory.enter(id);
    Json(directory.view())
}

pub async fn api_directory_goto(
    state: axum::extract::State<AppState>,
    Path(index): Path<i64>,
) -> Json<DirectoryView> {
    let mut directory = state.directory.write().await;
    directory.goto(index);
    Json(directory.view())
}

pub async fn api_directory_toggle(
    state: axum::extract::State<AppState>,
    Path(id): Path<AccountId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut directory = state.directory.write().await;
    let open = directory
        .toggle(id)
        .ok_or(CoreError::AccountNotFound { id })?;
    Ok(Json(serde_json::json!({ "id": id, "open": open })))
}

/// Set the query; an empty `q` ends search at the root folder
pub async fn api_directory_search(
    state: axum::extract::State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<DirectoryView> {
    let mut directory = state.directory.write().await;
    directory.set_query(&params.q);
    Json(directory.view())
}
