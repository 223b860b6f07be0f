//! Account routes - CRUD and the directory page
//!
//! Features:
//! - Flat account list and create/update/delete as JSON
//! - Folder browsing with a breadcrumb trail
//! - Tree search with automatic expansion of matching branches
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    api_accounts,
    api_account_create,
    api_account_update,
    api_account_delete,
    htmx_accounts_list,
    DirectoryParams,
};
pub use page::{page_accounts, render_directory, search_input};
