//! Error types for coaweb-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coaweb_core::CoreError;
use coaweb_store::{StoreError, StoreErrorCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::Core(CoreError::Store(error))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(CoreError::AccountNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Core(CoreError::Store(e)) => match e.code() {
                StoreErrorCode::AccountNotFound => StatusCode::NOT_FOUND,
                StoreErrorCode::ParentNotFound | StoreErrorCode::ValidationError => StatusCode::BAD_REQUEST,
                StoreErrorCode::DuplicateCode | StoreErrorCode::CyclicParent | StoreErrorCode::HasChildren => {
                    StatusCode::CONFLICT
                }
                StoreErrorCode::IoError | StoreErrorCode::InvalidFormat => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Machine-readable code; store rejections keep the store's own code
    pub fn code(&self) -> String {
        match self {
            ApiError::Core(CoreError::Store(e)) => e.code().to_string(),
            ApiError::Core(e) => e.code().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }
        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        }));
        (status, body).into_response()
    }
}
