//! POD Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{PodOrder, PodOrderInput};

use crate::db::repository::pod_order;
use crate::state::AppState;
use crate::utils::validation::{
    MAX_LONG_TEXT_LEN, MAX_SHORT_TEXT_LEN, MAX_TITLE_LEN, validate_optional_amount,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub writer_id: Option<String>,
}

fn not_found(id: &str) -> AppError {
    AppError::not_found(ErrorCode::PodOrderNotFound, "POD order", id)
}

fn validate(payload: &PodOrderInput) -> Result<(), AppError> {
    validate_optional_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_LONG_TEXT_LEN)?;
    validate_optional_text(&payload.status, "status", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.delivery_notes, "deliveryNotes", MAX_LONG_TEXT_LEN)?;
    validate_optional_text(
        &payload.additional_instructions,
        "additionalInstructions",
        MAX_LONG_TEXT_LEN,
    )?;
    validate_optional_amount(payload.price, "price")?;
    validate_optional_amount(payload.price_kes, "priceKes")?;
    validate_optional_amount(payload.cpp, "cpp")?;
    validate_optional_amount(payload.pod_amount, "podAmount")
}

/// GET /api/pod-orders
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<PodOrder>>> {
    let rows = pod_order::find_all(
        &state.pool,
        query.status.as_deref(),
        query.writer_id.as_deref(),
    )
    .await?;
    Ok(Json(rows))
}

/// GET /api/pod-orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PodOrder>> {
    let pod = pod_order::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(pod))
}

/// POST /api/pod-orders
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<PodOrderInput>,
) -> AppResult<(StatusCode, Json<PodOrder>)> {
    validate_required_text(payload.title.as_deref().unwrap_or_default(), "title", MAX_TITLE_LEN)?;
    validate(&payload)?;

    let pod = pod_order::create(&state.pool, &payload).await?;
    tracing::info!(pod_order_id = %pod.id, "POD order created");
    Ok((StatusCode::CREATED, Json(pod)))
}

/// PUT /api/pod-orders/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PodOrderInput>,
) -> AppResult<Json<PodOrder>> {
    validate(&payload)?;
    let pod = pod_order::update(&state.pool, &id, &payload)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(pod))
}

/// DELETE /api/pod-orders/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !pod_order::delete(&state.pool, &id).await? {
        return Err(not_found(&id));
    }
    Ok(StatusCode::NO_CONTENT)
}
