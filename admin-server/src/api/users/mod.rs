//! User API Module

mod handler;

use axum::{Router, routing::get};
use shared::error::ErrorCode;
use shared::models::UserCreate;

use crate::auth::hash_password;
use crate::db::repository::RepoError;
use crate::state::AppState;
use crate::utils::AppError;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_email, validate_required_text,
};

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}

const ROLES: &[&str] = &["writer", "admin"];

pub(crate) fn validate_role(role: Option<&str>) -> Result<(), AppError> {
    if let Some(role) = role
        && !ROLES.contains(&role)
    {
        return Err(AppError::validation(format!("Unknown role: {role}")).with_detail("field", "role"));
    }
    Ok(())
}

pub(crate) fn validate_user_create(payload: &UserCreate) -> Result<(), AppError> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_email(&payload.email)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    validate_role(payload.role.as_deref())
}

pub(crate) fn hash_or_internal(password: &str) -> Result<String, AppError> {
    hash_password(password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        AppError::internal("Failed to hash password")
    })
}

/// Turn a UNIQUE violation on `users.email` into a 409 with a specific code
pub(crate) fn with_email_conflict(err: RepoError, email: &str) -> AppError {
    match err {
        RepoError::Duplicate(_) => AppError::conflict(
            ErrorCode::UserEmailExists,
            format!("Email {email} is already registered"),
        ),
        other => other.into(),
    }
}
