//! Error codes and the error type every handler returns
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::validation("title must not be empty").with_detail("field", "title");
//! assert_eq!(ApiResponse::from(&err).code, ErrorCode::ValidationFailed.code());
//! ```

mod codes;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
