//! Error type and JSON error body

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the only error type that crosses the HTTP boundary:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (e.g. `available` / `requested` seats)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create an invalid token error
    pub fn invalid_token() -> Self {
        Self::new(ErrorCode::TokenInvalid)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    /// Booking rejected because the event has fewer seats left than requested
    pub fn capacity_exceeded(available: i64, requested: i64) -> Self {
        Self::with_message(
            ErrorCode::CapacityExceeded,
            format!(
                "Not enough seats available. Available: {}, Requested: {}",
                available, requested
            ),
        )
        .with_detail("available", available)
        .with_detail("requested", requested)
    }

    /// Whether the message may be shown to clients as-is
    pub fn is_client_safe(&self) -> bool {
        self.code.category() != ErrorCategory::System
    }
}

/// JSON body of every failed response
///
/// `error` always carries a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ErrorBody {
    /// Build the client-facing body; system errors are reduced to the
    /// generic message for their code
    pub fn from_error(err: &AppError) -> Self {
        if err.is_client_safe() {
            Self {
                error: err.message.clone(),
                code: err.code.code(),
                details: err.details.clone(),
            }
        } else {
            Self {
                error: err.code.message().to_string(),
                code: err.code.code(),
                details: None,
            }
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();

        if !self.is_client_safe() {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(ErrorBody::from_error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::EventNotFound);
        assert_eq!(err.code, ErrorCode::EventNotFound);
        assert_eq!(err.message, "Event not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "venue")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "venue");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_capacity_exceeded_message_and_details() {
        let err = AppError::capacity_exceeded(4, 5);
        assert_eq!(err.code, ErrorCode::CapacityExceeded);
        assert_eq!(
            err.message,
            "Not enough seats available. Available: 4, Requested: 5"
        );
        let details = err.details.as_ref().unwrap();
        assert_eq!(details.get("available").unwrap(), 4);
        assert_eq!(details.get("requested").unwrap(), 5);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_app_error_convenience_constructors() {
        assert_eq!(AppError::not_authenticated().http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::permission_denied("Organizers only").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::conflict("Email already registered").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::database("disk I/O").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_hides_system_detail() {
        let err = AppError::database("no such table: bookings")
            .with_detail("sql", "SELECT * FROM bookings");
        let body = ErrorBody::from_error(&err);
        assert_eq!(body.error, "Database error");
        assert_eq!(body.code, 9002);
        assert!(body.details.is_none());
    }

    #[test]
    fn test_error_body_serialize() {
        let body = ErrorBody::from_error(&AppError::capacity_exceeded(0, 1));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json["error"],
            "Not enough seats available. Available: 0, Requested: 1"
        );
        assert_eq!(json["code"], 4002);
        assert_eq!(json["details"]["available"], 0);

        let body = ErrorBody::from_error(&AppError::invalid_credentials());
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::BookingNotFound, "Booking not found");
        assert_eq!(format!("{}", err), "Booking not found");
    }
}
