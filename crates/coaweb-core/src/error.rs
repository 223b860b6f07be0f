//! Error types for coaweb-core
//!
//! The directory core itself never fails on account data: malformed
//! parent links are repaired at build time and stale navigation targets
//! degrade to the root view. Errors only come from the store, and those
//! are carried through untouched.

use coaweb_store::{AccountId, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Account not found
    AccountNotFound,
    /// Mutation rejected by the store
    StoreRejected,
    /// Store could not be read or written
    StoreUnavailable,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::AccountNotFound => write!(f, "ACCOUNT_NOT_FOUND"),
            ErrorCode::StoreRejected => write!(f, "STORE_REJECTED"),
            ErrorCode::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for coaweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Account not found: {id}")]
    AccountNotFound { id: AccountId },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::AccountNotFound { .. } => ErrorCode::AccountNotFound,
            CoreError::Store(e) if e.is_rejection() => ErrorCode::StoreRejected,
            CoreError::Store(_) => ErrorCode::StoreUnavailable,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::AccountNotFound { .. } => ErrorSeverity::Info,
            CoreError::Store(e) if e.is_rejection() => ErrorSeverity::Warning,
            CoreError::Store(_) => ErrorSeverity::Error,
        }
    }

    /// The store error carried by this error, if any
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            CoreError::Store(e) => Some(e),
            _ => None,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::AccountNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/accounts endpoint to list all accounts.".to_string()
                );
            }
            CoreError::Store(e) => {
                details = details.with_detail(serde_json::json!({ "store_code": e.code() }));
                if let StoreError::HasChildren { .. } = e {
                    details = details.with_suggestion(
                        "Move or delete the child accounts first.".to_string()
                    );
                }
            }
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Info | ErrorSeverity::Warning => log::warn!(
                target: "coaweb::error",
                "[{}] {} - Operation: {} - Data: {}",
                error.code(),
                error,
                context.operation,
                context.data
            ),
            ErrorSeverity::Error => log::error!(
                target: "coaweb::error",
                "[{}] {} - Operation: {} - Data: {}",
                error.code(),
                error.to_details(),
                context.operation,
                context.data
            ),
        }
    }
}

// ==================== Tests ====================
