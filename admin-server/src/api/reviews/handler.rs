//! Review API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{Review, ReviewCreate, ReviewUpdate};

use crate::db::repository::review::{self, ReviewFilter};
use crate::state::AppState;
use crate::utils::validation::{
    MAX_LONG_TEXT_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_amount,
    validate_optional_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub writer_id: Option<String>,
    pub order_id: Option<String>,
    pub status: Option<String>,
}

fn validate_rating(rating: i64) -> Result<(), AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::with_message(
            ErrorCode::InvalidRating,
            format!("rating must be between 1 and 5, got {rating}"),
        )
        .with_detail("field", "rating"));
    }
    Ok(())
}

/// GET /api/reviews
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Review>>> {
    let filter = ReviewFilter {
        writer_id: query.writer_id.as_deref(),
        order_id: query.order_id.as_deref(),
        status: query.status.as_deref(),
    };
    Ok(Json(review::find_all(&state.pool, &filter).await?))
}

/// GET /api/reviews/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Review>> {
    let r = review::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::ReviewNotFound, "Review", &id))?;
    Ok(Json(r))
}

/// POST /api/reviews
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<(StatusCode, Json<Review>)> {
    validate_rating(payload.rating)?;
    validate_optional_text(&payload.comment, "comment", MAX_LONG_TEXT_LEN)?;
    validate_optional_amount(payload.order_value, "orderValue")?;

    let r = review::create(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(r)))
}

/// PUT /api/reviews/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReviewUpdate>,
) -> AppResult<Json<Review>> {
    if let Some(rating) = payload.rating {
        validate_rating(rating)?;
    }
    validate_optional_text(&payload.comment, "comment", MAX_LONG_TEXT_LEN)?;
    validate_optional_text(&payload.status, "status", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.admin_notes, "adminNotes", MAX_NOTE_LEN)?;

    let r = review::update(&state.pool, &id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::ReviewNotFound, "Review", &id))?;
    Ok(Json(r))
}
