//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{Notification, NotificationCreate};

use crate::db::repository::notification;
use crate::state::AppState;
use crate::utils::validation::{
    MAX_LONG_TEXT_LEN, MAX_SHORT_TEXT_LEN, MAX_TITLE_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub is_read: Option<bool>,
}

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let rows = notification::find_all(&state.pool, query.user_id.as_deref(), query.is_read).await?;
    Ok(Json(rows))
}

/// POST /api/notifications
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NotificationCreate>,
) -> AppResult<(StatusCode, Json<Notification>)> {
    validate_required_text(&payload.user_id, "userId", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_optional_text(&payload.kind, "type", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.message, "message", MAX_LONG_TEXT_LEN)?;

    let n = notification::create(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(n)))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Notification>> {
    let n = notification::mark_read(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::NotificationNotFound, "Notification", &id))?;
    Ok(Json(n))
}
