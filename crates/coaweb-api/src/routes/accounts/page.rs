//! Accounts page rendering - directory with breadcrumb and search

use crate::AppState;
use coaweb_core::{Crumb, DirectoryView, ViewMode, ViewRow};
use coaweb_utils::escape_html;

const LIST_URL: &str = "/accounts/list";

fn directory_link(query: &str, label: &str, class: &str) -> String {
    format!(
        r##"<a href='#' hx-get='{}?{}' hx-target='#directory' class='{}'>{}</a>"##,
        LIST_URL, query, class, label
    )
}

fn render_breadcrumb(crumbs: &[Crumb]) -> String {
    let mut html = String::from("<nav class='flex items-center gap-1 text-sm mb-4'>");
    html.push_str(&directory_link("goto=-1", "All accounts", "text-indigo-600 hover:underline"));
    for crumb in crumbs {
        html.push_str("<span class='text-gray-400'>/</span>");
        let label = escape_html(&format!("{} {}", crumb.code, crumb.name));
        html.push_str(&directory_link(
            &format!("goto={}", crumb.index),
            &label,
            "text-indigo-600 hover:underline",
        ));
    }
    html.push_str("</nav>");
    html
}

fn render_row(row: &ViewRow, in_tree: bool, state: &AppState) -> String {
    let record = &row.node;
    let indent = if in_tree { row.depth * 20 } else { 0 };

    let toggle = if in_tree && row.is_container {
        let arrow = if row.is_open { "&#9662;" } else { "&#9656;" };
        directory_link(&format!("toggle={}", record.id), arrow, "w-4 text-gray-500")
    } else {
        "<span class='w-4'></span>".to_string()
    };

    let label = escape_html(&record.name);
    let name = if row.is_container {
        directory_link(
            &format!("enter={}", record.id),
            &format!("{} <span class='text-xs text-gray-400'>({})</span>", label, row.child_count),
            "font-medium text-gray-900 hover:text-indigo-600",
        )
    } else {
        format!("<span>{}</span>", label)
    };

    let highlight = if row.is_match { " bg-yellow-50" } else { "" };
    let balance_class = if record.balance.is_sign_negative() { "text-red-600" } else { "text-gray-700" };

    format!(
        r#"<div class='flex items-center gap-2 px-3 py-2 border-b{}' style='padding-left: {}px'>
            {}
            <span class='font-mono text-sm text-gray-500 w-20'>{}</span>
            <span class='flex-1'>{}</span>
            <span class='text-xs text-gray-400 w-20'>{}</span>
            <span class='font-mono text-sm {}'>{}</span>
        </div>"#,
        highlight,
        indent + 12,
        toggle,
        escape_html(&record.code),
        name,
        record.account_type,
        balance_class,
        state.money(record.balance),
    )
}

/// The search box
///
/// Fragments that change the query without the box knowing (entering a
/// folder, following a crumb) send it again out of band so its text
/// matches the directory.
pub fn search_input(query: &str, out_of_band: bool) -> String {
    format!(
        r#"<input id='directory-search' type='search' name='q' value='{}' placeholder='Search by code or name'
                class='px-3 py-2 border rounded-lg w-72'
                hx-get='{}' hx-trigger='keyup changed delay:300ms, search' hx-target='#directory'{}>"#,
        escape_html(query),
        LIST_URL,
        if out_of_band { " hx-swap-oob='true'" } else { "" },
    )
}

/// Directory body: breadcrumb plus either one folder level or the search tree
pub fn render_directory(view: &DirectoryView, state: &AppState) -> String {
    let mut html = render_breadcrumb(&view.breadcrumb);

    let (rows, in_tree): (Vec<&ViewRow>, bool) = match &view.mode {
        ViewMode::Search(query) => {
            let hits = view.rows.iter().filter(|r| r.is_match).count();
            html.push_str(&format!(
                "<p class='text-sm text-gray-500 mb-2'>{} match(es) for &quot;{}&quot; <a class='text-indigo-600 ml-2' href='/api/directory/search?q={}'>JSON</a></p>",
                hits,
                escape_html(query),
                urlencoding::encode(query)
            ));
            (view.visible(), true)
        }
        _ => (view.rows.iter().collect(), false),
    };

    if rows.is_empty() {
        let message = if view.mode.is_search() { "No matching accounts" } else { "This folder is empty" };
        html.push_str(&format!(
            "<div class='text-center py-12 text-gray-500'><p>{}</p></div>",
            message
        ));
        return html;
    }

    html.push_str("<div class='bg-white rounded-xl shadow-sm'>");
    for row in rows {
        html.push_str(&render_row(row, in_tree, state));
    }
    html.push_str("</div>");
    html
}

pub async fn page_accounts(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let directory = state.directory.read().await;
    let view = directory.view();

    let inner_content = format!(
        r#"<div class='mb-6 flex items-center justify-between'>
            <h2 class='text-2xl font-bold'>Accounts</h2>
            {}
        </div>
        <div id='directory'>{}</div>"#,
        search_input(directory.query(), false),
        render_directory(&view, &state),
    );

    axum::response::Html(crate::page_response(&headers, "Accounts", "/accounts", &inner_content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_state;

    #[tokio::test]
    async fn test_root_folder_lists_top_level() {
        let state = test_state().await;
        let view = state.directory.read().await.view();
        let html = render_directory(&view, &state);
        assert!(html.contains("All accounts"));
        assert!(html.contains("enter=1"));
        assert!(html.contains("Expenses"));
        assert!(!html.contains("toggle="));
    }

    #[tokio::test]
    async fn test_search_tree_has_toggles_and_hides_closed() {
        let state = test_state().await;
        let view = {
            let mut directory = state.directory.write().await;
            directory.set_query("sales");
            directory.toggle(14);
            directory.view()
        };
        let html = render_directory(&view, &state);
        assert!(html.contains("1 match(es)"));
        assert!(html.contains("toggle=14"));
        // Revenue was closed again, so the hit below it is hidden
        assert!(!html.contains(">Sales<"));
    }

    #[tokio::test]
    async fn test_empty_search_message() {
        let state = test_state().await;
        let view = {
            let mut directory = state.directory.write().await;
            directory.set_query("no such account");
            directory.view()
        };
        let html = render_directory(&view, &state);
        assert!(html.contains("No matching accounts"));
        assert!(html.contains("q=no%20such%20account"));
    }

    #[test]
    fn test_search_input_out_of_band() {
        let inline = search_input("o'brien", false);
        assert!(inline.contains("id='directory-search'"));
        assert!(inline.contains("value='o&#39;brien'"));
        assert!(!inline.contains("hx-swap-oob"));
        assert!(search_input("", true).contains("hx-swap-oob='true'"));
    }

    #[tokio::test]
    async fn test_names_are_escaped() {
        let state = test_state().await;
        let view = {
            let mut directory = state.directory.write().await;
            directory.enter(1);
            directory.enter(2);
            directory.view()
        };
        let html = render_directory(&view, &state);
        assert!(html.contains("Cash &amp; Banks"));
    }
}
