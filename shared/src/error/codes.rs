//! Numeric error codes
//!
//! One table row per code: value, HTTP status and default message. Ranges:
//!
//! | range | area |
//! |-------|------|
//! | 0xxx  | request shape, generic lookups |
//! | 1xxx  | login |
//! | 2xxx  | permissions |
//! | 3xxx  | users and writers |
//! | 4xxx  | orders, POD orders, activity log |
//! | 5xxx  | invoices, fines, payments, withdrawals |
//! | 6xxx  | reviews |
//! | 7xxx  | notifications and messages |
//! | 9xxx  | server faults |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! error_codes {
    ($( $(#[$doc:meta])* $name:ident = $value:literal, $status:ident, $msg:literal; )*) => {
        /// Error code sent to clients as a bare number
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$doc])* $name = $value, )*
        }

        impl ErrorCode {
            pub const ALL: &'static [ErrorCode] = &[$( ErrorCode::$name, )*];

            pub fn http_status(&self) -> StatusCode {
                match self {
                    $( ErrorCode::$name => StatusCode::$status, )*
                }
            }

            /// Default English message
            pub const fn message(&self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $msg, )*
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(ErrorCode::$name), )*
                    other => Err(InvalidErrorCode(other)),
                }
            }
        }
    };
}

error_codes! {
    ValidationFailed = 2, BAD_REQUEST, "Validation failed";
    NotFound = 3, NOT_FOUND, "Resource not found";
    AlreadyExists = 4, CONFLICT, "Resource already exists";

    InvalidCredentials = 1002, UNAUTHORIZED, "Invalid email or password";

    /// Actor role may not run this lifecycle action
    PermissionDenied = 2001, FORBIDDEN, "Permission denied";

    UserNotFound = 3001, NOT_FOUND, "User not found";
    UserEmailExists = 3002, CONFLICT, "A user with this email already exists";
    WriterNotFound = 3101, NOT_FOUND, "Writer not found";
    WriterEmailExists = 3102, CONFLICT, "A writer with this email already exists";

    OrderNotFound = 4001, NOT_FOUND, "Order not found";
    /// Action not allowed from the order's current status
    InvalidTransition = 4002, UNPROCESSABLE_ENTITY, "Order status does not allow this action";
    /// Order changed between read and write
    TransitionConflict = 4003, CONFLICT, "Order was modified concurrently, re-fetch and retry";
    OrderNumberUnavailable = 4004, SERVICE_UNAVAILABLE, "Could not allocate a unique order number";
    /// Write rolled back because its activity record could not be stored
    ActivityLogFailed = 4005, INTERNAL_SERVER_ERROR, "Activity log append failed, order left unchanged";
    PodOrderNotFound = 4101, NOT_FOUND, "POD order not found";

    InvoiceNotFound = 5001, NOT_FOUND, "Invoice not found";
    FineNotFound = 5002, NOT_FOUND, "Fine not found";
    PaymentNotFound = 5003, NOT_FOUND, "Payment not found";
    WithdrawalNotFound = 5004, NOT_FOUND, "Withdrawal request not found";
    InvalidAmount = 5005, BAD_REQUEST, "Amount is invalid";

    ReviewNotFound = 6001, NOT_FOUND, "Review not found";
    InvalidRating = 6002, BAD_REQUEST, "Rating must be between 1 and 5";

    NotificationNotFound = 7001, NOT_FOUND, "Notification not found";
    MessageNotFound = 7101, NOT_FOUND, "Message not found";

    InternalError = 9001, INTERNAL_SERVER_ERROR, "Internal server error";
    DatabaseError = 9002, INTERNAL_SERVER_ERROR, "Database error";
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Re-reading the order and sending the request again may succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::TransitionConflict | ErrorCode::OrderNumberUnavailable
        )
    }

    /// Failures the server is at fault for; these get logged at error level
    pub fn is_server_fault(&self) -> bool {
        self.http_status().is_server_error()
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A number that names no [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown error code {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_values_are_unique_and_round_trip() {
        let mut seen = HashSet::new();
        for &code in ErrorCode::ALL {
            assert!(seen.insert(code.code()), "duplicate value {code}");
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_lifecycle_statuses() {
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::InvalidTransition.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ErrorCode::TransitionConflict.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::OrderNumberUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert!(ErrorCode::ActivityLogFailed.is_server_fault());
        assert!(!ErrorCode::InvalidRating.is_server_fault());
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorCode::TransitionConflict.is_retryable());
        assert!(ErrorCode::OrderNumberUnavailable.is_retryable());
        assert!(!ErrorCode::InvalidTransition.is_retryable());
    }

    #[test]
    fn test_serialized_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::InvalidTransition).unwrap(), "4002");
        let code: ErrorCode = serde_json::from_str("4003").unwrap();
        assert_eq!(code, ErrorCode::TransitionConflict);
        assert!(serde_json::from_str::<ErrorCode>("10").is_err());
    }
}
