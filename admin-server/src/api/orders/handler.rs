//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{Order, OrderCreate, OrderUpdate};
use shared::order::OrderCommand;

use crate::state::AppState;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_LONG_TEXT_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_TITLE_LEN, validate_optional_amount,
    validate_optional_text, validate_required_text,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub writer_id: Option<String>,
}

/// Length and amount checks shared by create and update
macro_rules! validate_descriptive {
    ($p:expr) => {{
        validate_optional_text(&$p.description, "description", MAX_LONG_TEXT_LEN)?;
        validate_optional_text(&$p.requirements, "requirements", MAX_LONG_TEXT_LEN)?;
        validate_optional_text(&$p.subject, "subject", MAX_NAME_LEN)?;
        validate_optional_text(&$p.discipline, "discipline", MAX_NAME_LEN)?;
        validate_optional_text(&$p.paper_type, "paperType", MAX_NAME_LEN)?;
        validate_optional_text(&$p.format, "format", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&$p.client_name, "clientName", MAX_NAME_LEN)?;
        validate_optional_text(&$p.client_phone, "clientPhone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_amount($p.price, "price")?;
        validate_optional_amount($p.price_kes, "priceKes")?;
        validate_optional_amount($p.cpp, "cpp")?;
        validate_optional_amount($p.total_price_kes, "totalPriceKes")?;
    }};
}

/// GET /api/orders
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state
        .orders
        .list(query.status.as_deref(), query.writer_id.as_deref())
        .await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get(&id).await?))
}

/// GET /api/orders/by-number/{number}
pub async fn get_by_number(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get_by_number(&number).await?))
}

/// POST /api/orders
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_descriptive!(payload);

    let order = state.orders.create(payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PUT /api/orders/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    validate_optional_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_descriptive!(payload);

    Ok(Json(state.orders.update(&id, payload).await?))
}

/// DELETE /api/orders/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.orders.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/orders/{id}/transitions
pub async fn transition(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(command): Json<OrderCommand>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.execute(&id, &command).await?))
}
