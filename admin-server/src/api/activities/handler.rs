//! Order Activity API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::models::{ActivityQuery, OrderActivity, OrderActivityCreate};

use crate::db::repository::activity;
use crate::state::AppState;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_LONG_TEXT_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};

/// GET /api/order-activities
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<Vec<OrderActivity>>> {
    Ok(Json(activity::find_all(&state.pool, &query).await?))
}

/// GET /api/order-activities/{order_id}
///
/// History outlives the order, so a deleted order still lists its entries.
pub async fn list_by_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Vec<OrderActivity>>> {
    Ok(Json(activity::find_by_order(&state.pool, &order_id).await?))
}

/// POST /api/order-activities
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<OrderActivityCreate>,
) -> AppResult<(StatusCode, Json<OrderActivity>)> {
    validate_required_text(&payload.order_id, "orderId", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.action_type, "actionType", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.action_by, "actionBy", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.action_by_name, "actionByName", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_LONG_TEXT_LEN)?;

    let entry = state.orders.record_activity(payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
