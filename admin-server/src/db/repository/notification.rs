//! Notification Repository

use super::RepoResult;
use shared::models::{Notification, NotificationCreate};
use shared::util::{now_millis, prefixed_id};
use sqlx::SqlitePool;

pub async fn find_all(
    pool: &SqlitePool,
    user_id: Option<&str>,
    is_read: Option<bool>,
) -> RepoResult<Vec<Notification>> {
    let rows = sqlx::query_as::<_, Notification>(
        r#"
        SELECT * FROM notifications
        WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR is_read = ?2)
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .bind(is_read)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Notification>> {
    let row = sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &NotificationCreate) -> RepoResult<Notification> {
    let notification = Notification {
        id: prefixed_id("NTF", 8),
        user_id: data.user_id.clone(),
        kind: data.kind.clone().unwrap_or_else(|| "info".to_string()),
        title: data.title.clone(),
        message: data.message.clone(),
        related_entity_id: data.related_entity_id.clone(),
        related_entity_type: data.related_entity_type.clone(),
        is_read: false,
        read_at: None,
        created_at: now_millis(),
    };
    sqlx::query(
        r#"
        INSERT INTO notifications (
            id, user_id, kind, title, message, related_entity_id, related_entity_type,
            is_read, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?)
        "#,
    )
    .bind(&notification.id)
    .bind(&notification.user_id)
    .bind(&notification.kind)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(&notification.related_entity_id)
    .bind(&notification.related_entity_type)
    .bind(notification.created_at)
    .execute(pool)
    .await?;
    Ok(notification)
}

/// Idempotent: an already read notification keeps its first `read_at`
pub async fn mark_read(pool: &SqlitePool, id: &str) -> RepoResult<Option<Notification>> {
    sqlx::query(
        "UPDATE notifications SET is_read = 1, read_at = COALESCE(read_at, ?) WHERE id = ?",
    )
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    find_by_id(pool, id).await
}
