//! Financial API Module
//!
//! Mounted at `/api/financial`:
//!
//! | Path | Methods |
//! |------|---------|
//! | /invoices | GET POST |
//! | /invoices/{id} | GET PUT |
//! | /fines | GET POST |
//! | /fines/{id} | GET PUT |
//! | /payments | GET POST |
//! | /payments/{id} | GET |
//! | /clientPayments | GET POST |
//! | /platformFunds | GET POST |
//! | /withdrawals | GET POST |
//! | /withdrawals/{id} | GET PUT |
//! | /transactionLogs | GET POST |

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/financial", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(handler::list_invoices).post(handler::create_invoice))
        .route("/invoices/{id}", get(handler::get_invoice).put(handler::update_invoice))
        .route("/fines", get(handler::list_fines).post(handler::create_fine))
        .route("/fines/{id}", get(handler::get_fine).put(handler::update_fine))
        .route("/payments", get(handler::list_payments).post(handler::create_payment))
        .route("/payments/{id}", get(handler::get_payment))
        .route(
            "/clientPayments",
            get(handler::list_client_payments).post(handler::create_client_payment),
        )
        .route(
            "/platformFunds",
            get(handler::list_platform_funds).post(handler::create_platform_fund),
        )
        .route(
            "/withdrawals",
            get(handler::list_withdrawals).post(handler::create_withdrawal),
        )
        .route(
            "/withdrawals/{id}",
            get(handler::get_withdrawal).put(handler::update_withdrawal),
        )
        .route(
            "/transactionLogs",
            get(handler::list_transaction_logs).post(handler::create_transaction_log),
        )
}
