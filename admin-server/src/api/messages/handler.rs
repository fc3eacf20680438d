//! Message API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{Message, MessageCreate};

use crate::db::repository::message;
use crate::state::AppState;
use crate::utils::validation::{
    MAX_LONG_TEXT_LEN, MAX_SHORT_TEXT_LEN, MAX_TITLE_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Matches sender or recipient
    pub user_id: Option<String>,
    pub related_order_id: Option<String>,
}

/// GET /api/messages
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Message>>> {
    let rows = message::find_all(
        &state.pool,
        query.user_id.as_deref(),
        query.related_order_id.as_deref(),
    )
    .await?;
    Ok(Json(rows))
}

/// POST /api/messages
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<MessageCreate>,
) -> AppResult<(StatusCode, Json<Message>)> {
    validate_required_text(&payload.sender_id, "senderId", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.recipient_id, "recipientId", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.content, "content", MAX_LONG_TEXT_LEN)?;
    validate_optional_text(&payload.subject, "subject", MAX_TITLE_LEN)?;

    let m = message::create(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(m)))
}

/// PUT /api/messages/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Message>> {
    let m = message::mark_read(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::MessageNotFound, "Message", &id))?;
    Ok(Json(m))
}
