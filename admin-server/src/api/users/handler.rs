//! User API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{User, UserCreate, UserUpdate};

use super::{hash_or_internal, validate_role, validate_user_create, with_email_conflict};
use crate::db::repository::user;
use crate::state::AppState;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_email, validate_optional_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub role: Option<String>,
}

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<User>>> {
    let users = user::find_all(&state.pool, query.role.as_deref()).await?;
    Ok(Json(users))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let u = user::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User", &id))?;
    Ok(Json(u))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<User>)> {
    validate_user_create(&payload)?;
    let hash = hash_or_internal(&payload.password)?;
    let u = user::create(&state.pool, &payload, &hash)
        .await
        .map_err(|e| with_email_conflict(e, &payload.email))?;
    Ok((StatusCode::CREATED, Json(u)))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    validate_optional_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    validate_role(payload.role.as_deref())?;

    let hash = payload.password.as_deref().map(hash_or_internal).transpose()?;
    let email = payload.email.clone().unwrap_or_default();
    let u = user::update(&state.pool, &id, &payload, hash.as_deref())
        .await
        .map_err(|e| with_email_conflict(e, &email))?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User", &id))?;
    Ok(Json(u))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !user::delete(&state.pool, &id).await? {
        return Err(AppError::not_found(ErrorCode::UserNotFound, "User", &id));
    }
    Ok(StatusCode::NO_CONTENT)
}
