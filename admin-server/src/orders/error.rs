use shared::error::{AppError, ErrorCode};
use shared::order::OrderStatus;
use thiserror::Error;

use crate::db::repository::RepoError;

/// Lifecycle engine errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order {0} not found")]
    NotFound(String),

    #[error("Cannot {action} an order in {status} status")]
    InvalidTransition {
        action: &'static str,
        status: OrderStatus,
    },

    #[error("Order {0} was modified concurrently; re-fetch and retry")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Could not allocate a unique order number")]
    OrderNumberUnavailable,

    #[error("Failed to record order activity: {0}")]
    ActivityLog(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Storage(err.into())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => AppError::not_found(ErrorCode::OrderNotFound, "Order", &id),
            OrderError::InvalidTransition { action, status } => AppError::with_message(
                ErrorCode::InvalidTransition,
                format!("Cannot {action} an order in {status} status"),
            )
            .with_detail("action", action)
            .with_detail("currentStatus", status.as_str()),
            OrderError::Conflict(id) => AppError::conflict(
                ErrorCode::TransitionConflict,
                format!("Order {id} was modified concurrently; re-fetch and retry"),
            )
            .with_detail("orderId", id),
            OrderError::Validation(msg) => AppError::validation(msg),
            OrderError::PermissionDenied(msg) => AppError::permission_denied(msg),
            OrderError::OrderNumberUnavailable => AppError::new(ErrorCode::OrderNumberUnavailable),
            OrderError::ActivityLog(msg) => {
                tracing::error!(error = %msg, "Activity log append failed; transition rolled back");
                AppError::with_message(ErrorCode::ActivityLogFailed, msg)
            }
            OrderError::Storage(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_taxonomy_maps_to_distinct_codes() {
        let cases: Vec<(OrderError, ErrorCode, StatusCode)> = vec![
            (OrderError::NotFound("ORD-1".into()), ErrorCode::OrderNotFound, StatusCode::NOT_FOUND),
            (
                OrderError::InvalidTransition {
                    action: "approve",
                    status: OrderStatus::Available,
                },
                ErrorCode::InvalidTransition,
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (OrderError::Conflict("ORD-1".into()), ErrorCode::TransitionConflict, StatusCode::CONFLICT),
            (OrderError::Validation("x".into()), ErrorCode::ValidationFailed, StatusCode::BAD_REQUEST),
            (OrderError::PermissionDenied("x".into()), ErrorCode::PermissionDenied, StatusCode::FORBIDDEN),
            (
                OrderError::ActivityLog("disk full".into()),
                ErrorCode::ActivityLogFailed,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, code, status) in cases {
            let app: AppError = err.into();
            assert_eq!(app.code, code);
            assert_eq!(app.http_status(), status);
        }
    }

    #[test]
    fn test_conflict_is_retryable() {
        let app: AppError = OrderError::Conflict("ORD-1".into()).into();
        assert!(app.code.is_retryable());
    }
}
