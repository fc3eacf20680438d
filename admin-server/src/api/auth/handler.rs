//! Auth API Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use shared::models::{User, UserCreate};

use crate::api::users::{hash_or_internal, validate_user_create, with_email_conflict};
use crate::auth::{create_token, verify_password};
use crate::db::repository::user;
use crate::state::AppState;
use crate::utils::validation::{MAX_PASSWORD_LEN, validate_email, validate_required_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

fn issue(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let token = create_token(&user.id, &user.email, &state.config.jwt_secret).map_err(|e| {
        tracing::error!(error = %e, "Failed to sign login token");
        AppError::internal("Failed to issue token")
    })?;
    Ok(AuthResponse { token, user })
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_user_create(&payload)?;
    let hash = hash_or_internal(&payload.password)?;
    let created = user::create(&state.pool, &payload, &hash)
        .await
        .map_err(|e| with_email_conflict(e, &payload.email))?;

    tracing::info!(user_id = %created.id, "User registered");
    Ok((StatusCode::CREATED, Json(issue(&state, created)?)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_email(&payload.email)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;

    let email = payload.email.trim().to_lowercase();
    let Some(credentials) = user::find_credentials(&state.pool, &email).await? else {
        return Err(AppError::invalid_credentials());
    };
    if !verify_password(&payload.password, &credentials.password_hash) {
        tracing::debug!(user_id = %credentials.user.id, "Login rejected: wrong password");
        return Err(AppError::invalid_credentials());
    }

    Ok(Json(issue(&state, credentials.user)?))
}
