//! Error types for coaweb-store

use serde::{Deserialize, Serialize};
use thiserror::Error;
use std::io;

use crate::types::AccountId;

/// Error codes for store rejections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreErrorCode {
    AccountNotFound,
    ParentNotFound,
    DuplicateCode,
    CyclicParent,
    HasChildren,
    ValidationError,
    IoError,
    InvalidFormat,
}

impl std::fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreErrorCode::AccountNotFound => write!(f, "ACCOUNT_NOT_FOUND"),
            StoreErrorCode::ParentNotFound => write!(f, "PARENT_NOT_FOUND"),
            StoreErrorCode::DuplicateCode => write!(f, "DUPLICATE_CODE"),
            StoreErrorCode::CyclicParent => write!(f, "CYCLIC_PARENT"),
            StoreErrorCode::HasChildren => write!(f, "HAS_CHILDREN"),
            StoreErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            StoreErrorCode::IoError => write!(f, "IO_ERROR"),
            StoreErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Account not found: {id}")]
    AccountNotFound { id: AccountId },

    #[error("Parent account not found: {id}")]
    ParentNotFound { id: AccountId },

    #[error("Account code already in use: {code}")]
    DuplicateCode { code: String },

    #[error("Account {id} cannot be placed under its own descendant {parent_id}")]
    CyclicParent { id: AccountId, parent_id: AccountId },

    #[error("Account {id} still has {count} child account(s)")]
    HasChildren { id: AccountId, count: usize },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid account file: {message}")]
    InvalidFormat { message: String },
}

impl StoreError {
    /// Get the error code
    pub fn code(&self) -> StoreErrorCode {
        match self {
            StoreError::AccountNotFound { .. } => StoreErrorCode::AccountNotFound,
            StoreError::ParentNotFound { .. } => StoreErrorCode::ParentNotFound,
            StoreError::DuplicateCode { .. } => StoreErrorCode::DuplicateCode,
            StoreError::CyclicParent { .. } => StoreErrorCode::CyclicParent,
            StoreError::HasChildren { .. } => StoreErrorCode::HasChildren,
            StoreError::ValidationError { .. } => StoreErrorCode::ValidationError,
            StoreError::IoError(_) => StoreErrorCode::IoError,
            StoreError::InvalidFormat { .. } => StoreErrorCode::InvalidFormat,
        }
    }

    /// Whether the request itself was at fault (as opposed to the store)
    pub fn is_rejection(&self) -> bool {
        !matches!(self, StoreError::IoError(_) | StoreError::InvalidFormat { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::InvalidFormat { message: error.to_string() }
    }
}

/// Result type with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
