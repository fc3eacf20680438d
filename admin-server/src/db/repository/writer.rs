//! Writer Repository

use super::RepoResult;
use shared::models::{Writer, WriterCreate, WriterUpdate};
use shared::util::{now_millis, prefixed_id};
use sqlx::SqlitePool;
use sqlx::types::Json;

/// Status given to a writer created without one
pub const DEFAULT_STATUS: &str = "application_submitted";

pub async fn find_all(pool: &SqlitePool, status: Option<&str>) -> RepoResult<Vec<Writer>> {
    let writers = sqlx::query_as::<_, Writer>(
        "SELECT * FROM writers WHERE (?1 IS NULL OR status = ?1) ORDER BY created_at DESC",
    )
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(writers)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Writer>> {
    let writer = sqlx::query_as::<_, Writer>("SELECT * FROM writers WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(writer)
}

pub async fn create(pool: &SqlitePool, data: &WriterCreate) -> RepoResult<Writer> {
    let now = now_millis();
    let id = prefixed_id("WRT", 8);
    sqlx::query(
        r#"
        INSERT INTO writers (
            id, email, name, phone, status, national_id, country, timezone,
            specializations, languages, bio, max_concurrent_orders,
            preferred_payment_method, created_at, application_submitted_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, COALESCE(?, 3), ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(data.email.trim().to_lowercase())
    .bind(data.name.trim())
    .bind(&data.phone)
    .bind(data.status.as_deref().unwrap_or(DEFAULT_STATUS))
    .bind(&data.national_id)
    .bind(&data.country)
    .bind(&data.timezone)
    .bind(Json(&data.specializations))
    .bind(Json(&data.languages))
    .bind(&data.bio)
    .bind(data.max_concurrent_orders)
    .bind(&data.preferred_payment_method)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| super::RepoError::Database(format!("Writer {id} vanished after insert")))
}

/// Merge present fields; a reviewer id stamps `application_reviewed_at`
pub async fn update(pool: &SqlitePool, id: &str, data: &WriterUpdate) -> RepoResult<Option<Writer>> {
    let reviewed_at = data.application_reviewed_by.as_ref().map(|_| now_millis());
    let rows = sqlx::query(
        r#"
        UPDATE writers SET
            email = COALESCE(?1, email),
            name = COALESCE(?2, name),
            phone = COALESCE(?3, phone),
            status = COALESCE(?4, status),
            national_id = COALESCE(?5, national_id),
            country = COALESCE(?6, country),
            timezone = COALESCE(?7, timezone),
            specializations = COALESCE(?8, specializations),
            languages = COALESCE(?9, languages),
            bio = COALESCE(?10, bio),
            rating = COALESCE(?11, rating),
            total_reviews = COALESCE(?12, total_reviews),
            completed_orders = COALESCE(?13, completed_orders),
            total_earnings = COALESCE(?14, total_earnings),
            success_rate = COALESCE(?15, success_rate),
            max_concurrent_orders = COALESCE(?16, max_concurrent_orders),
            preferred_payment_method = COALESCE(?17, preferred_payment_method),
            email_notifications = COALESCE(?18, email_notifications),
            sms_notifications = COALESCE(?19, sms_notifications),
            is_email_verified = COALESCE(?20, is_email_verified),
            is_document_verified = COALESCE(?21, is_document_verified),
            application_reviewed_by = COALESCE(?22, application_reviewed_by),
            application_reviewed_at = COALESCE(?23, application_reviewed_at)
        WHERE id = ?24
        "#,
    )
    .bind(data.email.as_deref().map(|e| e.trim().to_lowercase()))
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.status)
    .bind(&data.national_id)
    .bind(&data.country)
    .bind(&data.timezone)
    .bind(data.specializations.as_ref().map(Json))
    .bind(data.languages.as_ref().map(Json))
    .bind(&data.bio)
    .bind(data.rating)
    .bind(data.total_reviews)
    .bind(data.completed_orders)
    .bind(data.total_earnings)
    .bind(data.success_rate)
    .bind(data.max_concurrent_orders)
    .bind(&data.preferred_payment_method)
    .bind(data.email_notifications)
    .bind(data.sms_notifications)
    .bind(data.is_email_verified)
    .bind(data.is_document_verified)
    .bind(&data.application_reviewed_by)
    .bind(reviewed_at)
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
    let rows = sqlx::query("DELETE FROM writers WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}
