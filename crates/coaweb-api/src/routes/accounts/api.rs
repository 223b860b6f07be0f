//! Accounts API endpoints - JSON API and HTMX partial responses

use crate::{ApiError, AppState};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use coaweb_core::{AccountDraft, AccountId, AccountRecord, Directory};
use serde::Deserialize;

/// Directory actions carried on `/accounts/list` links
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryParams {
    pub q: Option<String>,
    pub enter: Option<AccountId>,
    pub goto: Option<i64>,
    pub toggle: Option<AccountId>,
}

impl DirectoryParams {
    /// Apply the requested actions to the directory
    pub fn apply(&self, directory: &mut Directory) {
        if let Some(id) = self.toggle {
            directory.toggle(id);
        }
        if let Some(query) = &self.q {
            directory.set_query(query);
        }
        if let Some(id) = self.enter {
            directory.enter(id);
        }
        if let Some(index) = self.goto {
            directory.goto(index);
        }
    }
}

/// Flat account list, ordered by code
pub async fn api_accounts(state: axum::extract::State<AppState>) -> Result<Json<Vec<AccountRecord>>, ApiError> {
    let accounts = state.store.list().await?;
    Ok(Json(accounts))
}

pub async fn api_account_create(
    state: axum::extract::State<AppState>,
    Json(draft): Json<AccountDraft>,
) -> Result<(StatusCode, Json<AccountRecord>), ApiError> {
    let mut directory = state.directory.write().await;
    let record = directory
        .create_account(state.store.as_ref(), state.reports.as_ref(), draft)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn api_account_update(
    state: axum::extract::State<AppState>,
    Path(id): Path<AccountId>,
    Json(draft): Json<AccountDraft>,
) -> Result<Json<AccountRecord>, ApiError> {
    let mut directory = state.directory.write().await;
    let record = directory
        .update_account(state.store.as_ref(), state.reports.as_ref(), id, draft)
        .await?;
    Ok(Json(record))
}

pub async fn api_account_delete(
    state: axum::extract::State<AppState>,
    Path(id): Path<AccountId>,
) -> Result<StatusCode, ApiError> {
    let mut directory = state.directory.write().await;
    directory
        .delete_account(state.store.as_ref(), state.reports.as_ref(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Directory fragment after applying the link's action
pub async fn htmx_accounts_list(
    state: axum::extract::State<AppState>,
    Query(params): Query<DirectoryParams>,
) -> axum::response::Html<String> {
    let mut directory = state.directory.write().await;
    params.apply(&mut directory);
    let mut html = super::page::render_directory(&directory.view(), &state);
    // Typing keeps the box as it is; any other action may have cleared the query
    if params.q.is_none() {
        html.push_str(&super::page::search_input(directory.query(), true));
    }
    axum::response::Html(html)
}
