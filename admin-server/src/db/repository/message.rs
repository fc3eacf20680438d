//! Message Repository

use super::RepoResult;
use shared::models::{Message, MessageCreate};
use shared::util::{now_millis, prefixed_id};
use sqlx::SqlitePool;

/// Messages sent or received by `user_id`, optionally about one order
pub async fn find_all(
    pool: &SqlitePool,
    user_id: Option<&str>,
    related_order_id: Option<&str>,
) -> RepoResult<Vec<Message>> {
    let rows = sqlx::query_as::<_, Message>(
        r#"
        SELECT * FROM messages
        WHERE (?1 IS NULL OR sender_id = ?1 OR recipient_id = ?1)
          AND (?2 IS NULL OR related_order_id = ?2)
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .bind(related_order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Message>> {
    let row = sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &MessageCreate) -> RepoResult<Message> {
    let message = Message {
        id: prefixed_id("MSG", 8),
        sender_id: data.sender_id.clone(),
        sender_name: data.sender_name.clone(),
        sender_role: data.sender_role.clone(),
        recipient_id: data.recipient_id.clone(),
        recipient_name: data.recipient_name.clone(),
        recipient_role: data.recipient_role.clone(),
        subject: data.subject.clone(),
        content: data.content.clone(),
        related_order_id: data.related_order_id.clone(),
        is_read: false,
        read_at: None,
        created_at: now_millis(),
    };
    sqlx::query(
        r#"
        INSERT INTO messages (
            id, sender_id, sender_name, sender_role, recipient_id, recipient_name,
            recipient_role, subject, content, related_order_id, is_read, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?)
        "#,
    )
    .bind(&message.id)
    .bind(&message.sender_id)
    .bind(&message.sender_name)
    .bind(&message.sender_role)
    .bind(&message.recipient_id)
    .bind(&message.recipient_name)
    .bind(&message.recipient_role)
    .bind(&message.subject)
    .bind(&message.content)
    .bind(&message.related_order_id)
    .bind(message.created_at)
    .execute(pool)
    .await?;
    Ok(message)
}

pub async fn mark_read(pool: &SqlitePool, id: &str) -> RepoResult<Option<Message>> {
    sqlx::query("UPDATE messages SET is_read = 1, read_at = COALESCE(read_at, ?) WHERE id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    find_by_id(pool, id).await
}
