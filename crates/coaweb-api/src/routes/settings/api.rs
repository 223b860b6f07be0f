//! Settings API endpoints - JSON API

use crate::AppState;
use axum::Json;
use coaweb_config::Config;

pub async fn api_settings(state: axum::extract::State<AppState>) -> Json<Config> {
    Json(state.config.clone())
}
