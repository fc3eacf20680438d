//! Review Repository

use super::{RepoError, RepoResult};
use shared::models::{Review, ReviewCreate, ReviewUpdate};
use shared::util::{now_millis, prefixed_id};
use sqlx::SqlitePool;
use sqlx::types::Json;

/// Filters for [`find_all`]
#[derive(Debug, Default)]
pub struct ReviewFilter<'a> {
    pub writer_id: Option<&'a str>,
    pub order_id: Option<&'a str>,
    pub status: Option<&'a str>,
}

pub async fn find_all(pool: &SqlitePool, filter: &ReviewFilter<'_>) -> RepoResult<Vec<Review>> {
    let reviews = sqlx::query_as::<_, Review>(
        r#"
        SELECT * FROM reviews
        WHERE (?1 IS NULL OR writer_id = ?1)
          AND (?2 IS NULL OR order_id = ?2)
          AND (?3 IS NULL OR status = ?3)
        ORDER BY created_at DESC
        "#,
    )
    .bind(filter.writer_id)
    .bind(filter.order_id)
    .bind(filter.status)
    .fetch_all(pool)
    .await?;
    Ok(reviews)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Review>> {
    let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(review)
}

pub async fn create(pool: &SqlitePool, data: &ReviewCreate) -> RepoResult<Review> {
    let now = now_millis();
    let id = prefixed_id("REV", 8);
    sqlx::query(
        r#"
        INSERT INTO reviews (
            id, order_id, writer_id, writer_name, client_id, client_name, rating, comment,
            categories, order_title, order_pages, order_value, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&data.order_id)
    .bind(&data.writer_id)
    .bind(&data.writer_name)
    .bind(&data.client_id)
    .bind(&data.client_name)
    .bind(data.rating)
    .bind(&data.comment)
    .bind(Json(&data.categories))
    .bind(&data.order_title)
    .bind(data.order_pages)
    .bind(data.order_value)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Review {id} vanished after insert")))
}

pub async fn update(pool: &SqlitePool, id: &str, data: &ReviewUpdate) -> RepoResult<Option<Review>> {
    let rows = sqlx::query(
        r#"
        UPDATE reviews SET
            rating = COALESCE(?1, rating),
            comment = COALESCE(?2, comment),
            status = COALESCE(?3, status),
            is_verified = COALESCE(?4, is_verified),
            admin_notes = COALESCE(?5, admin_notes),
            updated_at = ?6
        WHERE id = ?7
        "#,
    )
    .bind(data.rating)
    .bind(&data.comment)
    .bind(&data.status)
    .bind(data.is_verified)
    .bind(&data.admin_notes)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    if rows == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}
