//! Order Activity API Module
//!
//! Append-only: there is no PUT or DELETE route.

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/order-activities", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{order_id}", get(handler::list_by_order))
}
