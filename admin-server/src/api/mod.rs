//! HTTP API
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - register / login
//! - [`orders`] - order CRUD and lifecycle transitions
//! - [`activities`] - order activity log
//! - [`users`], [`writers`] - accounts
//! - [`pod_orders`] - pay-on-delivery orders
//! - [`reviews`] - client reviews
//! - [`financial`] - invoices, fines, payments, funds, withdrawals, ledger
//! - [`notifications`], [`messages`] - inboxes

use axum::Router;
use http::{Method, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod activities;
pub mod auth;
pub mod financial;
pub mod health;
pub mod messages;
pub mod notifications;
pub mod orders;
pub mod pod_orders;
pub mod reviews;
pub mod users;
pub mod writers;

/// Every route, without middleware or state
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(orders::router())
        .merge(activities::router())
        .merge(users::router())
        .merge(writers::router())
        .merge(pod_orders::router())
        .merge(reviews::router())
        .merge(financial::router())
        .merge(notifications::router())
        .merge(messages::router())
}

/// Fully configured application, used by the server and by tests
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    build_router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
