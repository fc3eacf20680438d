//! Order API Module
//!
//! Descriptive CRUD plus `POST /{id}/transitions`, which runs one lifecycle
//! command through the [`OrdersManager`](crate::orders::OrdersManager).

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/by-number/{number}", get(handler::get_by_number))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/transitions", post(handler::transition))
}
