//! Error types and handling.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// Record is referenced elsewhere (HTTP 409)
    #[error("Conflict: {}", .0.as_deref().unwrap_or("record is referenced elsewhere"))]
    Conflict(Option<String>),

    /// Backend accepted the request but reported `success: false`
    #[error("Request rejected: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),

    /// Login was refused
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Workflow gate refused an action
    #[error("Not permitted: {0}")]
    Forbidden(String),

    /// Data parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excel export error
    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a parse error with message
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error with message
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a forbidden error with message
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Whether this is a delete conflict (record referenced elsewhere).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Message suitable for a dialog.
    ///
    /// Prefers the backend-provided message and falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        let backend = match self {
            Self::Api { message, .. } | Self::Conflict(message) | Self::Rejected(message) => message.clone(),
            Self::LoginFailed(msg) | Self::Forbidden(msg) | Self::Validation(msg) | Self::NotFound(msg) => {
                Some(msg.clone())
            }
            _ => None,
        };

        backend
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Message for a failed delete of `record` (e.g. "customer").
    pub fn delete_message(&self, record: &str) -> String {
        if self.is_conflict() {
            format!("This {record} is associated with other data.")
        } else {
            self.user_message(&format!("Error deleting {record}. Please try again."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend() {
        let err = AppError::Api {
            status: 500,
            message: Some("Duplicate code".to_string()),
        };
        assert_eq!(err.user_message("Failed"), "Duplicate code");
    }

    #[test]
    fn test_user_message_fallback() {
        let err = AppError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Failed to load"), "Failed to load");

        let err = AppError::Rejected(Some("   ".to_string()));
        assert_eq!(err.user_message("Failed"), "Failed");
    }

    #[test]
    fn test_delete_message_conflict() {
        let err = AppError::Conflict(None);
        assert_eq!(err.delete_message("customer"), "This customer is associated with other data.");
    }

    #[test]
    fn test_delete_message_generic() {
        let err = AppError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.delete_message("item"), "Error deleting item. Please try again.");
    }
}
