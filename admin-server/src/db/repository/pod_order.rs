//! POD Order Repository
//!
//! Plain records: rows are read, merged in memory and written back whole.

use super::{RepoError, RepoResult};
use shared::models::{PodOrder, PodOrderInput};
use shared::util::{now_millis, prefixed_id};
use sqlx::SqlitePool;
use sqlx::types::Json;

/// Status of a POD order created without one
pub const DEFAULT_STATUS: &str = "Available";

const WRITE_SQL: &str = r#"
    INSERT OR REPLACE INTO pod_orders (
        id, title, description, subject, discipline, paper_type, pages, words, format,
        price, price_kes, cpp, deadline, deadline_hours, status, writer_id, assigned_writer,
        pod_amount, delivery_date, payment_received_at, delivery_notes,
        admin_review_notes, admin_reviewed_at, admin_reviewed_by,
        revision_notes, revision_requested_at, revision_requested_by, revision_count,
        uploaded_files, additional_instructions, is_overdue, created_at, updated_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub async fn find_all(
    pool: &SqlitePool,
    status: Option<&str>,
    writer_id: Option<&str>,
) -> RepoResult<Vec<PodOrder>> {
    let rows = sqlx::query_as::<_, PodOrder>(
        r#"
        SELECT * FROM pod_orders
        WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR writer_id = ?2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(status)
    .bind(writer_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<PodOrder>> {
    let row = sqlx::query_as::<_, PodOrder>("SELECT * FROM pod_orders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &PodOrderInput) -> RepoResult<PodOrder> {
    let title = data
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RepoError::Validation("title is required".into()))?;
    let now = now_millis();
    let mut pod = PodOrder {
        id: prefixed_id("POD", 6),
        title: title.to_string(),
        description: None,
        subject: None,
        discipline: None,
        paper_type: None,
        pages: None,
        words: None,
        format: None,
        price: None,
        price_kes: None,
        cpp: None,
        deadline: None,
        deadline_hours: None,
        status: DEFAULT_STATUS.to_string(),
        writer_id: None,
        assigned_writer: None,
        pod_amount: None,
        delivery_date: None,
        payment_received_at: None,
        delivery_notes: None,
        admin_review_notes: None,
        admin_reviewed_at: None,
        admin_reviewed_by: None,
        revision_notes: None,
        revision_requested_at: None,
        revision_requested_by: None,
        revision_count: 0,
        uploaded_files: Vec::new(),
        additional_instructions: None,
        is_overdue: false,
        created_at: now,
        updated_at: now,
    };
    merge(&mut pod, data);
    write(pool, &pod).await?;
    Ok(pod)
}

pub async fn update(pool: &SqlitePool, id: &str, data: &PodOrderInput) -> RepoResult<Option<PodOrder>> {
    let Some(mut pod) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    merge(&mut pod, data);
    pod.updated_at = now_millis();
    write(pool, &pod).await?;
    Ok(Some(pod))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM pod_orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

async fn write(pool: &SqlitePool, pod: &PodOrder) -> RepoResult<()> {
    sqlx::query(WRITE_SQL)
        .bind(&pod.id)
        .bind(&pod.title)
        .bind(&pod.description)
        .bind(&pod.subject)
        .bind(&pod.discipline)
        .bind(&pod.paper_type)
        .bind(pod.pages)
        .bind(pod.words)
        .bind(&pod.format)
        .bind(pod.price)
        .bind(pod.price_kes)
        .bind(pod.cpp)
        .bind(pod.deadline)
        .bind(pod.deadline_hours)
        .bind(&pod.status)
        .bind(&pod.writer_id)
        .bind(&pod.assigned_writer)
        .bind(pod.pod_amount)
        .bind(pod.delivery_date)
        .bind(pod.payment_received_at)
        .bind(&pod.delivery_notes)
        .bind(&pod.admin_review_notes)
        .bind(pod.admin_reviewed_at)
        .bind(&pod.admin_reviewed_by)
        .bind(&pod.revision_notes)
        .bind(pod.revision_requested_at)
        .bind(&pod.revision_requested_by)
        .bind(pod.revision_count)
        .bind(Json(&pod.uploaded_files))
        .bind(&pod.additional_instructions)
        .bind(pod.is_overdue)
        .bind(pod.created_at)
        .bind(pod.updated_at)
        .execute(pool)
        .await?;
    Ok(())
}

/// Overwrite every field present in `data`
fn merge(pod: &mut PodOrder, data: &PodOrderInput) {
    macro_rules! overwrite {
        ($($field:ident),* $(,)?) => {
            $(if let Some(v) = &data.$field {
                pod.$field = Some(v.clone());
            })*
        };
    }
    if let Some(title) = data.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        pod.title = title.to_string();
    }
    if let Some(status) = &data.status {
        pod.status = status.clone();
    }
    if let Some(count) = data.revision_count {
        pod.revision_count = count;
    }
    if let Some(files) = &data.uploaded_files {
        pod.uploaded_files = files.clone();
    }
    if let Some(overdue) = data.is_overdue {
        pod.is_overdue = overdue;
    }
    overwrite!(
        description,
        subject,
        discipline,
        paper_type,
        pages,
        words,
        format,
        price,
        price_kes,
        cpp,
        deadline,
        deadline_hours,
        writer_id,
        assigned_writer,
        pod_amount,
        delivery_date,
        payment_received_at,
        delivery_notes,
        admin_review_notes,
        admin_reviewed_at,
        admin_reviewed_by,
        revision_notes,
        revision_requested_at,
        revision_requested_by,
        additional_instructions,
    );
}
