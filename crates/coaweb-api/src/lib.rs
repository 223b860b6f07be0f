//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::accounts: Account CRUD and the directory page
//! - routes::directory: Folder navigation and search as JSON
//! - routes::settings: Configuration display

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use coaweb_config::Config;
use coaweb_core::{Directory, DirectorySummary};
use coaweb_store::{ReportRef, StoreRef};
use coaweb_utils::format_balance;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<RwLock<Directory>>,
    pub store: StoreRef,
    pub reports: ReportRef,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, directory: Directory, store: StoreRef, reports: ReportRef) -> Self {
        Self {
            directory: Arc::new(RwLock::new(directory)),
            store,
            reports,
            config,
        }
    }

    /// Format a balance with the configured number of decimal places
    pub fn money(&self, value: Decimal) -> String {
        format_balance(value, self.config.currency.decimal_places)
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::accounts::{api_account_create, api_account_delete, api_account_update, api_accounts, htmx_accounts_list, page_accounts};
    use routes::directory::{api_directory, api_directory_enter, api_directory_goto, api_directory_search, api_directory_toggle};
    use routes::settings::{api_settings, page_settings};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/accounts", get(api_accounts).post(api_account_create))
        .route("/api/accounts/:id", put(api_account_update).delete(api_account_delete))
        .route("/api/directory", get(api_directory))
        .route("/api/directory/enter/:id", post(api_directory_enter))
        .route("/api/directory/goto/:index", post(api_directory_goto))
        .route("/api/directory/toggle/:id", post(api_directory_toggle))
        .route("/api/directory/search", get(api_directory_search))
        .route("/api/summary", get(api_summary))
        .route("/api/settings", get(api_settings))
        .route("/api/reload", post(api_reload))
        // HTMX page routes
        .route("/", get(index_page))
        .route("/accounts", get(page_accounts))
        .route("/settings", get(page_settings))
        // HTMX partial routes
        .route("/accounts/list", get(htmx_accounts_list))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Directory counts and pass-through totals (JSON API)
async fn api_summary(state: axum::extract::State<AppState>) -> Json<DirectorySummary> {
    let directory = state.directory.read().await;
    Json(directory.summary())
}

/// Re-read the store and rebuild the directory
async fn api_reload(state: axum::extract::State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let mut directory = state.directory.write().await;
    directory
        .refresh(state.store.as_ref(), state.reports.as_ref())
        .await?;
    log::info!("Directory reloaded: {} accounts", directory.forest().len());
    Ok(Json(serde_json::json!({
        "success": true,
        "accounts": directory.forest().len(),
    })))
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Coaweb</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        title, content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/", "Dashboard"),
        ("/accounts", "Accounts"),
        ("/settings", "Settings"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Coaweb</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label) in &links {
        let is_active = if *path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path)
        };
        let active_class = if is_active { "bg-indigo-50 text-indigo-600" } else { "text-gray-600 hover:bg-gray-50" };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'><span>{}</span></a></li>"#,
            path, active_class, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, current_path: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!(r#"<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>"#, inner_content)
    } else {
        base_html(title, &format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path), inner_content))
    }
}

/// Dashboard: pass-through totals and directory counts
async fn index_page(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let summary = state.directory.read().await.summary();
    let totals = &summary.totals;
    let currency = &state.config.currency.default_currency;

    let cards = [
        ("Total assets", &totals.total_assets, "green"),
        ("Total liabilities", &totals.total_liabilities, "red"),
        ("Total income", &totals.total_income, "blue"),
        ("Total expenses", &totals.total_expenses, "yellow"),
        ("Net profit", &totals.net_profit, "indigo"),
    ];
    let cards_html: String = cards
        .iter()
        .map(|(label, value, color)| {
            format!(
                "<div class='bg-{color}-50 p-4 rounded-lg border border-{color}-200'><p class='text-sm text-{color}-600'>{}</p><p class='text-2xl font-bold text-{color}-700'>{} {}</p></div>",
                label,
                state.money(**value),
                currency,
                color = color
            )
        })
        .collect();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Dashboard</h2></div>
        <div class='grid grid-cols-1 md:grid-cols-3 lg:grid-cols-5 gap-4 mb-6'>{}</div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Chart of accounts</h3>
            <div class='grid grid-cols-2 md:grid-cols-4 gap-4'>
                <div class='text-center p-4 bg-gray-50 rounded-lg'><p class='text-sm text-gray-600'>Accounts</p><p class='text-xl font-bold'>{}</p></div>
                <div class='text-center p-4 bg-gray-50 rounded-lg'><p class='text-sm text-gray-600'>Top level</p><p class='text-xl font-bold'>{}</p></div>
                <div class='text-center p-4 bg-gray-50 rounded-lg'><p class='text-sm text-gray-600'>Folders</p><p class='text-xl font-bold'>{}</p></div>
                <div class='text-center p-4 bg-gray-50 rounded-lg'><p class='text-sm text-gray-600'>Posting accounts</p><p class='text-xl font-bold'>{}</p></div>
            </div>
        </div>"#,
        cards_html,
        summary.total_accounts,
        summary.root_accounts,
        summary.container_accounts,
        summary.leaf_accounts,
    );

    axum::response::Html(page_response(&headers, "Dashboard", "/", &inner_content))
}

/// Start the HTTP server
///
/// Binds to the configured address and serves until Ctrl-C.
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Coaweb server on http://{}", addr);
    log::info!("  - / (Dashboard)");
    log::info!("  - /accounts (Account directory)");
    log::info!("  - /settings (Configuration)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use coaweb_store::{default_chart, MemoryAccountStore};
    use tower::ServiceExt;

    pub(crate) async fn test_state() -> AppState {
        let store = Arc::new(MemoryAccountStore::with_records(default_chart()));
        let config = Config::default();
        let mut directory = Directory::new(&config.directory);
        directory.refresh(store.as_ref(), store.as_ref()).await.unwrap();
        AppState::new(config, directory, store.clone(), store)
    }

    async fn send(state: &AppState, method: &str, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = create_router(state.clone())
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let state = test_state().await;
        let response = create_router(state)
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_directory_folder_flow() {
        let state = test_state().await;

        let (status, view) = send(&state, "GET", "/api/directory", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["mode"]["state"], "root_folder");
        assert_eq!(view["rows"].as_array().unwrap().len(), 5);

        let (_, view) = send(&state, "POST", "/api/directory/enter/1", None).await;
        assert_eq!(view["mode"], serde_json::json!({"state": "subfolder", "value": 1}));
        assert_eq!(view["breadcrumb"][0]["code"], "1");
        assert_eq!(view["rows"].as_array().unwrap().len(), 2);

        let (_, view) = send(&state, "POST", "/api/directory/goto/-1", None).await;
        assert_eq!(view["mode"]["state"], "root_folder");
    }

    #[tokio::test]
    async fn test_directory_search_and_clear() {
        let state = test_state().await;
        send(&state, "POST", "/api/directory/enter/1", None).await;

        let (_, view) = send(&state, "GET", "/api/directory/search?q=vat", None).await;
        assert_eq!(view["mode"], serde_json::json!({"state": "search", "value": "vat"}));
        assert_eq!(view["rows"].as_array().unwrap().len(), 6);

        let (_, view) = send(&state, "GET", "/api/directory/search?q=", None).await;
        assert_eq!(view["mode"]["state"], "root_folder");
    }

    #[tokio::test]
    async fn test_toggle_unknown_account() {
        let state = test_state().await;
        let (status, body) = send(&state, "POST", "/api/directory/toggle/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ACCOUNT_NOT_FOUND");

        let (status, body) = send(&state, "POST", "/api/directory/toggle/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["open"], true);
    }

    #[tokio::test]
    async fn test_account_mutations() {
        let state = test_state().await;

        let draft = serde_json::json!({
            "parent_id": 3,
            "code": "1111",
            "name": "Main Safe",
            "account_type": "asset"
        });
        let (status, created) = send(&state, "POST", "/api/accounts", Some(draft)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Main Safe");
        assert_eq!(created["balance"], "0");

        let (_, list) = send(&state, "GET", "/api/accounts", None).await;
        assert_eq!(list.as_array().unwrap().len(), 19);

        let (_, summary) = send(&state, "GET", "/api/summary", None).await;
        assert_eq!(summary["total_accounts"], 19);

        let id = created["id"].as_u64().unwrap();
        let (status, _) = send(&state, "DELETE", &format!("/api/accounts/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_rejected_delete_is_reported() {
        let state = test_state().await;
        let (status, body) = send(&state, "DELETE", "/api/accounts/1", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "HAS_CHILDREN");
        assert!(body["error"].as_str().unwrap().contains("child"));
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let state = test_state().await;
        let draft = serde_json::json!({"code": "11", "name": "Again", "account_type": "asset"});
        let (status, body) = send(&state, "POST", "/api/accounts", Some(draft)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "DUPLICATE_CODE");
    }

    #[tokio::test]
    async fn test_reload() {
        let state = test_state().await;
        let (status, body) = send(&state, "POST", "/api/reload", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["accounts"], 18);
    }

    #[tokio::test]
    async fn test_htmx_partial_has_no_layout() {
        let state = test_state().await;
        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/accounts")
                    .header("hx-request", "true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!html.contains("<!DOCTYPE html>"));
        assert!(html.contains("Assets"));
    }
}
