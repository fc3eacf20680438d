//! Data models
//!
//! Shared between the admin server and its clients (via API). JSON uses
//! camelCase; timestamps are Unix milliseconds.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

pub mod activity;
pub mod financial;
pub mod message;
pub mod notification;
pub mod order;
pub mod pod_order;
pub mod review;
pub mod user;
pub mod writer;

// Re-exports
pub use activity::*;
pub use financial::*;
pub use message::*;
pub use notification::*;
pub use order::*;
pub use pod_order::*;
pub use review::*;
pub use user::*;
pub use writer::*;
