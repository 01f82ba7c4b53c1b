//! Error types module
//!
//! All errors are unified under the `AppError` enum, which covers database,
//! storage, validation, and authorization failures. The `ErrorMetadata` trait
//! lets each variant self-describe its HTTP response characteristics so the
//! API layer never has to match on variants itself.

use std::io;

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like conflicts
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) | AppError::BadRequest(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::PayloadTooLarge(_) => 413,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            // Never leak query or driver detail to clients
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Storage(_) => "A storage error occurred".to_string(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_)
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_)
            | AppError::BadRequest(_)
            | AppError::NotFound(_)
            | AppError::Unauthorized(_) => LogLevel::Debug,
            AppError::Forbidden(_) | AppError::Conflict(_) | AppError::PayloadTooLarge(_) => {
                LogLevel::Warn
            }
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::BadRequest("missing title".into()).http_status_code(),
            400
        );
        assert_eq!(
            AppError::Unauthorized("no token".into()).http_status_code(),
            401
        );
        assert_eq!(
            AppError::Forbidden("not the owner".into()).http_status_code(),
            403
        );
        assert_eq!(
            AppError::NotFound("post not found".into()).http_status_code(),
            404
        );
        assert_eq!(
            AppError::Conflict("email already exists".into()).http_status_code(),
            409
        );
        assert_eq!(
            AppError::PayloadTooLarge("image too big".into()).http_status_code(),
            413
        );
        assert_eq!(
            AppError::Internal("boom".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_sensitive_errors_hide_detail() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains("pool"));

        let err = AppError::NotFound("Post not found".to_string());
        assert!(!err.is_sensitive());
        assert!(err.client_message().contains("Post not found"));
    }

    #[test]
    fn test_database_error_maps_to_500() {
        let err: AppError = SqlxError::PoolTimedOut.into();
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert_eq!(err.log_level(), LogLevel::Error);
    }
}
