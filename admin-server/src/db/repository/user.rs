//! User Repository

use super::RepoResult;
use shared::models::{User, UserCreate, UserUpdate};
use shared::util::{now_millis, prefixed_id};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, email, role, created_at";

/// User row together with its password hash, for login only
#[derive(Debug, sqlx::FromRow)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

pub async fn find_all(pool: &SqlitePool, role: Option<&str>) -> RepoResult<Vec<User>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM users WHERE (?1 IS NULL OR role = ?1) ORDER BY created_at DESC"
    );
    let users = sqlx::query_as::<_, User>(&sql)
        .bind(role)
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_credentials(pool: &SqlitePool, email: &str) -> RepoResult<Option<UserCredentials>> {
    let sql = format!("SELECT {COLUMNS}, password_hash FROM users WHERE email = ?");
    let row = sqlx::query_as::<_, UserCredentials>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a user; a taken email surfaces as `RepoError::Duplicate`
pub async fn create(pool: &SqlitePool, data: &UserCreate, password_hash: &str) -> RepoResult<User> {
    let user = User {
        id: prefixed_id("USR", 8),
        name: data.name.trim().to_string(),
        email: data.email.trim().to_lowercase(),
        role: data.role.clone().unwrap_or_else(|| "writer".to_string()),
        created_at: now_millis(),
    };
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(password_hash)
    .bind(&user.role)
    .bind(user.created_at)
    .execute(pool)
    .await?;
    Ok(user)
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    data: &UserUpdate,
    password_hash: Option<&str>,
) -> RepoResult<Option<User>> {
    let email = data.email.as_deref().map(|e| e.trim().to_lowercase());
    let rows = sqlx::query(
        r#"
        UPDATE users SET
            name = COALESCE(?1, name),
            email = COALESCE(?2, email),
            role = COALESCE(?3, role),
            password_hash = COALESCE(?4, password_hash)
        WHERE id = ?5
        "#,
    )
    .bind(&data.name)
    .bind(email)
    .bind(&data.role)
    .bind(password_hash)
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    if rows == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}
