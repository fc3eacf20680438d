//! Financial API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::error::ErrorCode;
use shared::models::{
    ClientPayment, ClientPaymentCreate, FinancialQuery, Fine, FineCreate, FineUpdate, Invoice,
    InvoiceCreate, InvoiceUpdate, Payment, PaymentCreate, PlatformFund, PlatformFundCreate,
    TransactionLog, TransactionLogCreate, WithdrawalCreate, WithdrawalRequest, WithdrawalUpdate,
};

use crate::db::repository::financial;
use crate::state::AppState;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

type Created<T> = AppResult<(StatusCode, Json<T>)>;

/// Amount checks report `InvalidAmount` instead of the generic validation code
fn check_amount(value: f64, strict: bool) -> Result<(), AppError> {
    validate_amount(value, "amount", strict).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidAmount, e.message).with_detail("field", "amount")
    })
}

fn check_status(status: &Option<String>, allowed: &[&str]) -> Result<(), AppError> {
    if let Some(s) = status
        && !allowed.contains(&s.as_str())
    {
        return Err(AppError::validation(format!(
            "Unknown status '{s}', expected one of {}",
            allowed.join(", ")
        ))
        .with_detail("field", "status"));
    }
    Ok(())
}

// ── Invoices ────────────────────────────────────────────────────────

const INVOICE_STATUSES: &[&str] = &["pending", "approved", "paid", "rejected"];

/// GET /api/financial/invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(q): Query<FinancialQuery>,
) -> AppResult<Json<Vec<Invoice>>> {
    Ok(Json(financial::list_invoices(&state.pool, &q).await?))
}

/// GET /api/financial/invoices/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Invoice>> {
    let inv = financial::find_invoice(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::InvoiceNotFound, "Invoice", &id))?;
    Ok(Json(inv))
}

/// POST /api/financial/invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<InvoiceCreate>,
) -> Created<Invoice> {
    check_amount(payload.amount, false)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let inv = financial::create_invoice(&state.pool, &payload).await?;
    tracing::info!(invoice_id = %inv.id, amount = inv.amount, "Invoice created");
    Ok((StatusCode::CREATED, Json(inv)))
}

/// PUT /api/financial/invoices/{id}
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<InvoiceUpdate>,
) -> AppResult<Json<Invoice>> {
    check_status(&payload.status, INVOICE_STATUSES)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let inv = financial::update_invoice(&state.pool, &id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::InvoiceNotFound, "Invoice", &id))?;
    Ok(Json(inv))
}

// ── Fines ───────────────────────────────────────────────────────────

const FINE_STATUSES: &[&str] = &["pending", "applied", "waived"];

/// GET /api/financial/fines
pub async fn list_fines(
    State(state): State<AppState>,
    Query(q): Query<FinancialQuery>,
) -> AppResult<Json<Vec<Fine>>> {
    Ok(Json(financial::list_fines(&state.pool, &q).await?))
}

/// GET /api/financial/fines/{id}
pub async fn get_fine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Fine>> {
    let fine = financial::find_fine(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::FineNotFound, "Fine", &id))?;
    Ok(Json(fine))
}

/// POST /api/financial/fines
pub async fn create_fine(
    State(state): State<AppState>,
    Json(payload): Json<FineCreate>,
) -> Created<Fine> {
    check_amount(payload.amount, false)?;
    validate_optional_text(&payload.reason, "reason", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let fine = financial::create_fine(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(fine)))
}

/// PUT /api/financial/fines/{id}
pub async fn update_fine(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<FineUpdate>,
) -> AppResult<Json<Fine>> {
    check_status(&payload.status, FINE_STATUSES)?;
    validate_optional_text(&payload.waived_reason, "waivedReason", MAX_NOTE_LEN)?;
    let fine = financial::update_fine(&state.pool, &id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::FineNotFound, "Fine", &id))?;
    Ok(Json(fine))
}

// ── Payments ────────────────────────────────────────────────────────

/// GET /api/financial/payments
pub async fn list_payments(
    State(state): State<AppState>,
    Query(q): Query<FinancialQuery>,
) -> AppResult<Json<Vec<Payment>>> {
    Ok(Json(financial::list_payments(&state.pool, &q).await?))
}

/// GET /api/financial/payments/{id}
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Payment>> {
    let payment = financial::find_payment(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::PaymentNotFound, "Payment", &id))?;
    Ok(Json(payment))
}

/// POST /api/financial/payments
pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<PaymentCreate>,
) -> Created<Payment> {
    check_amount(payload.amount, true)?;
    validate_optional_text(&payload.reference, "reference", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let payment = financial::create_payment(&state.pool, &payload).await?;
    tracing::info!(payment_id = %payment.id, amount = payment.amount, "Payment recorded");
    Ok((StatusCode::CREATED, Json(payment)))
}

// ── Client payments ─────────────────────────────────────────────────

/// GET /api/financial/clientPayments
pub async fn list_client_payments(
    State(state): State<AppState>,
    Query(q): Query<FinancialQuery>,
) -> AppResult<Json<Vec<ClientPayment>>> {
    Ok(Json(financial::list_client_payments(&state.pool, &q).await?))
}

/// POST /api/financial/clientPayments
pub async fn create_client_payment(
    State(state): State<AppState>,
    Json(payload): Json<ClientPaymentCreate>,
) -> Created<ClientPayment> {
    check_amount(payload.amount, false)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let payment = financial::create_client_payment(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

// ── Platform funds ──────────────────────────────────────────────────

/// GET /api/financial/platformFunds
pub async fn list_platform_funds(
    State(state): State<AppState>,
    Query(q): Query<FinancialQuery>,
) -> AppResult<Json<Vec<PlatformFund>>> {
    Ok(Json(financial::list_platform_funds(&state.pool, &q).await?))
}

/// POST /api/financial/platformFunds
pub async fn create_platform_fund(
    State(state): State<AppState>,
    Json(payload): Json<PlatformFundCreate>,
) -> Created<PlatformFund> {
    check_amount(payload.amount, false)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let fund = financial::create_platform_fund(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(fund)))
}

// ── Withdrawals ─────────────────────────────────────────────────────

const WITHDRAWAL_STATUSES: &[&str] = &["pending", "approved", "rejected", "paid"];

/// GET /api/financial/withdrawals
pub async fn list_withdrawals(
    State(state): State<AppState>,
    Query(q): Query<FinancialQuery>,
) -> AppResult<Json<Vec<WithdrawalRequest>>> {
    Ok(Json(financial::list_withdrawals(&state.pool, &q).await?))
}

/// GET /api/financial/withdrawals/{id}
pub async fn get_withdrawal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<WithdrawalRequest>> {
    let request = financial::find_withdrawal(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::WithdrawalNotFound, "Withdrawal", &id))?;
    Ok(Json(request))
}

/// POST /api/financial/withdrawals
pub async fn create_withdrawal(
    State(state): State<AppState>,
    Json(payload): Json<WithdrawalCreate>,
) -> Created<WithdrawalRequest> {
    validate_required_text(&payload.writer_id, "writerId", MAX_SHORT_TEXT_LEN)?;
    check_amount(payload.amount, true)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let request = financial::create_withdrawal(&state.pool, &payload).await?;
    tracing::info!(withdrawal_id = %request.id, writer_id = %request.writer_id, "Withdrawal requested");
    Ok((StatusCode::CREATED, Json(request)))
}

/// PUT /api/financial/withdrawals/{id}
pub async fn update_withdrawal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<WithdrawalUpdate>,
) -> AppResult<Json<WithdrawalRequest>> {
    check_status(&payload.status, WITHDRAWAL_STATUSES)?;
    validate_optional_text(&payload.rejection_reason, "rejectionReason", MAX_NOTE_LEN)?;
    let request = financial::update_withdrawal(&state.pool, &id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::WithdrawalNotFound, "Withdrawal", &id))?;
    Ok(Json(request))
}

// ── Transaction logs ────────────────────────────────────────────────

/// GET /api/financial/transactionLogs
pub async fn list_transaction_logs(
    State(state): State<AppState>,
    Query(q): Query<FinancialQuery>,
) -> AppResult<Json<Vec<TransactionLog>>> {
    Ok(Json(financial::list_transaction_logs(&state.pool, &q).await?))
}

/// POST /api/financial/transactionLogs
pub async fn create_transaction_log(
    State(state): State<AppState>,
    Json(payload): Json<TransactionLogCreate>,
) -> Created<TransactionLog> {
    validate_required_text(&payload.kind, "type", MAX_SHORT_TEXT_LEN)?;
    check_amount(payload.amount, false)?;
    let log = financial::create_transaction_log(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(log)))
}
