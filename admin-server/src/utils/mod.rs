//! Utilities: logging, input validation and shutdown

pub mod logger;
pub mod shutdown;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCode};
