//! `AppError` and the JSON error body

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A failure as the client sees it: a code, a message and optional context
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    /// Structured context such as the offending field or the current status
    pub details: Option<Map<String, Value>>,
}

impl AppError {
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// `"{resource} {id} not found"` with both values echoed in details
    pub fn not_found(code: ErrorCode, resource: &str, id: &str) -> Self {
        Self::with_message(code, format!("{resource} {id} not found"))
            .with_detail("resource", resource)
            .with_detail("id", id)
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    pub fn conflict(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self::with_message(code, msg)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// Body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl From<&AppError> for ApiResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            retryable: err.code.is_retryable(),
            details: err.details.clone(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.code.is_server_fault() {
            tracing::error!(code = %self.code, message = %self.message, "Request failed on the server side");
        }
        let body = ApiResponse::from(&self);
        (self.http_status(), axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_not_found_carries_id() {
        let err = AppError::not_found(ErrorCode::OrderNotFound, "Order", "ORD-ABC123");
        assert_eq!(err.to_string(), "Order ORD-ABC123 not found");
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.details.unwrap()["id"], "ORD-ABC123");
    }

    #[test]
    fn test_response_body() {
        let err = AppError::conflict(ErrorCode::TransitionConflict, "order changed")
            .with_detail("orderId", "ORD-1");
        let body = ApiResponse::from(&err);
        assert_eq!(body.code, 4003);
        assert!(body.retryable);
        assert_eq!(body.details.unwrap()["orderId"], "ORD-1");

        let json = serde_json::to_value(ApiResponse::from(&AppError::validation("bad"))).unwrap();
        assert_eq!(json["code"], 2);
        assert_eq!(json["retryable"], false);
        assert!(json.get("details").is_none());
    }
}
