//! Error types for the portal
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Memo Error Enum ==
/// Failures raised by the memoization layer itself.
///
/// Errors produced by a wrapped function never appear here; they are
/// returned to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoError {
    /// Arguments could not be turned into a stable cache key
    #[error("Cannot derive cache key for '{function}': {reason}")]
    KeyDerivation { function: String, reason: String },

    /// A store lock was poisoned by a panicking holder
    #[error("Cache store for '{0}' is poisoned")]
    Poisoned(String),
}

// == Portal Error Enum ==
/// Unified error type for the portal server.
#[derive(Error, Debug)]
pub enum PortalError {
    /// Configuration file could not be read
    #[error("Cannot read configuration {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML for the portal schema
    #[error("Invalid configuration {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Requested department or resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Memoization layer failure
    #[error(transparent)]
    Memo(#[from] MemoError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = match &self {
            PortalError::NotFound(_) => StatusCode::NOT_FOUND,
            PortalError::Io { .. } | PortalError::Yaml { .. } => StatusCode::SERVICE_UNAVAILABLE,
            PortalError::Memo(_) | PortalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the portal server.
pub type Result<T> = std::result::Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_error_converts_into_portal_error() {
        let err: PortalError = MemoError::Poisoned("settings".to_string()).into();
        assert!(matches!(err, PortalError::Memo(MemoError::Poisoned(_))));
        assert_eq!(err.to_string(), "Cache store for 'settings' is poisoned");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = PortalError::NotFound("department 'x'".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_config_errors_map_to_503() {
        let err = PortalError::Io {
            path: "missing.yaml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
