//! Directory routes - navigation state as JSON

pub mod api;

pub use api::{api_directory, api_directory_enter, api_directory_goto, api_directory_search, api_directory_toggle};
