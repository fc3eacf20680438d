//! Writer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{Writer, WriterCreate, WriterUpdate};

use crate::db::repository::{RepoError, writer};
use crate::state::AppState;
use crate::utils::validation::{
    MAX_LONG_TEXT_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_amount,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

fn email_conflict(err: RepoError, email: &str) -> AppError {
    match err {
        RepoError::Duplicate(_) => AppError::conflict(
            ErrorCode::WriterEmailExists,
            format!("A writer with email {email} already exists"),
        ),
        other => other.into(),
    }
}

fn not_found(id: &str) -> AppError {
    AppError::not_found(ErrorCode::WriterNotFound, "Writer", id)
}

/// GET /api/writers
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Writer>>> {
    let writers = writer::find_all(&state.pool, query.status.as_deref()).await?;
    Ok(Json(writers))
}

/// GET /api/writers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Writer>> {
    let w = writer::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(w))
}

/// POST /api/writers
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<WriterCreate>,
) -> AppResult<(StatusCode, Json<Writer>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_email(&payload.email)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.status, "status", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.bio, "bio", MAX_LONG_TEXT_LEN)?;

    let w = writer::create(&state.pool, &payload)
        .await
        .map_err(|e| email_conflict(e, &payload.email))?;
    tracing::info!(writer_id = %w.id, "Writer created");
    Ok((StatusCode::CREATED, Json(w)))
}

/// PUT /api/writers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<WriterUpdate>,
) -> AppResult<Json<Writer>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    validate_optional_text(&payload.status, "status", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.bio, "bio", MAX_LONG_TEXT_LEN)?;
    validate_optional_amount(payload.total_earnings, "totalEarnings")?;
    if let Some(rating) = payload.rating
        && !(0.0..=5.0).contains(&rating)
    {
        return Err(AppError::with_message(
            ErrorCode::InvalidRating,
            format!("rating must be between 0 and 5, got {rating}"),
        ));
    }

    let email = payload.email.clone().unwrap_or_default();
    let w = writer::update(&state.pool, &id, &payload)
        .await
        .map_err(|e| email_conflict(e, &email))?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(w))
}

/// DELETE /api/writers/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !writer::delete(&state.pool, &id).await? {
        return Err(not_found(&id));
    }
    Ok(StatusCode::NO_CONTENT)
}
