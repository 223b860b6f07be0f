//! Settings page rendering - Full page endpoints

use crate::AppState;
use coaweb_utils::escape_html;

fn enabled(flag: bool) -> &'static str {
    if flag { "Enabled" } else { "Disabled" }
}

pub async fn page_settings(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let config = &state.config;
    let refreshed_at = state
        .directory
        .read()
        .await
        .refreshed_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Settings</h2></div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Server</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Host</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Port</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Data</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Account file</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Seed standard chart</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Last refresh</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Display</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Open top-level accounts on load</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Currency</p><p class='font-medium'>{} ({} decimal places)</p></div>
            </div>
        </div>"#,
        escape_html(&config.server.host),
        config.server.port,
        escape_html(&config.accounts_path().display().to_string()),
        enabled(config.data.seed_default_chart),
        refreshed_at,
        enabled(config.directory.open_roots_on_load),
        escape_html(&config.currency.default_currency),
        config.currency.decimal_places,
    );

    axum::response::Html(crate::page_response(&headers, "Settings", "/settings", &inner_content))
}
