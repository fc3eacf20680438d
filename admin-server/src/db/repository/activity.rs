//! Order Activity Repository
//!
//! Append-only: there is no update or delete here.

use super::RepoResult;
use shared::models::{ActivityQuery, OrderActivity};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, order_id, order_number, action_type, action_by, action_by_name, action_by_role, old_status, new_status, description, metadata, created_at";

/// Append one record. Called inside the transaction that mutates the order.
pub async fn insert(conn: &mut SqliteConnection, activity: &OrderActivity) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_activities (id, order_id, order_number, action_type, action_by, action_by_name, action_by_role, old_status, new_status, description, metadata, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&activity.id)
    .bind(&activity.order_id)
    .bind(&activity.order_number)
    .bind(&activity.action_type)
    .bind(&activity.action_by)
    .bind(&activity.action_by_name)
    .bind(&activity.action_by_role)
    .bind(&activity.old_status)
    .bind(&activity.new_status)
    .bind(&activity.description)
    .bind(Json(&activity.metadata))
    .bind(activity.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Newest first, filtered by order, action type, or current order owner
pub async fn find_all(pool: &SqlitePool, query: &ActivityQuery) -> RepoResult<Vec<OrderActivity>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM order_activities \
         WHERE (?1 IS NULL OR order_id = ?1) \
         AND (?2 IS NULL OR action_type = ?2) \
         AND (?3 IS NULL OR order_id IN (SELECT id FROM orders WHERE writer_id = ?3)) \
         ORDER BY created_at DESC, rowid DESC"
    );
    let activities = sqlx::query_as::<_, OrderActivity>(&sql)
        .bind(&query.order_id)
        .bind(&query.action_type)
        .bind(&query.writer_id)
        .fetch_all(pool)
        .await?;
    Ok(activities)
}

/// Full history of one order, newest first
pub async fn find_by_order(pool: &SqlitePool, order_id: &str) -> RepoResult<Vec<OrderActivity>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM order_activities WHERE order_id = ? ORDER BY created_at DESC, rowid DESC"
    );
    let activities = sqlx::query_as::<_, OrderActivity>(&sql)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(activities)
}

pub async fn count_by_order(pool: &SqlitePool, order_id: &str) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM order_activities WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
