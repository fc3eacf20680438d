//! Shared types for the writers admin backend
//!
//! Error system, entity models and the order domain vocabulary used by the
//! server and by API clients.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
