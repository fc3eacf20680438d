//! Writers admin backend
//!
//! Order lifecycle engine with an append-only activity log, plus the CRUD
//! surface for accounts, POD orders, reviews, finances and inboxes.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod notify;
pub mod orders;
pub mod state;
pub mod utils;

pub use config::{Config, LifecycleRules};
pub use orders::{OrderError, OrdersManager};
pub use state::AppState;
