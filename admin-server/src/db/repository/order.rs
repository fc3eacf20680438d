//! Order Repository
//!
//! Orders are always written whole: the lifecycle engine computes the next
//! row in memory and [`save`] persists it with a compare-and-swap on
//! `(id, version, status)`.

use super::{RepoError, RepoResult};
use shared::models::Order;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Columns rewritten on every save, in bind order
const MUTABLE_COLUMNS: &[&str] = &[
    "title",
    "description",
    "subject",
    "discipline",
    "paper_type",
    "pages",
    "words",
    "format",
    "price",
    "price_kes",
    "cpp",
    "total_price_kes",
    "deadline",
    "client_id",
    "client_name",
    "client_email",
    "client_phone",
    "requirements",
    "attachments",
    "status",
    "writer_id",
    "assigned_writer",
    "assigned_at",
    "assigned_by",
    "picked_by",
    "requires_confirmation",
    "confirmed_at",
    "confirmed_by",
    "assignment_notes",
    "assignment_priority",
    "assignment_deadline",
    "started_at",
    "submitted_at",
    "submitted_to_admin_at",
    "submission_notes",
    "files_uploaded_at",
    "completed_at",
    "original_files",
    "revision_files",
    "revision_requests",
    "revision_explanation",
    "revision_score",
    "revision_count",
    "revision_submitted_at",
    "revision_response_notes",
    "admin_review_notes",
    "admin_reviewed_at",
    "admin_reviewed_by",
    "reassignment_reason",
    "reassigned_at",
    "reassigned_by",
    "original_writer_id",
    "made_available_at",
    "made_available_by",
    "fine_amount",
    "fine_reason",
    "fine_history",
    "bids",
    "reviews",
    "client_messages",
    "admin_messages",
    "last_admin_edit",
    "updated_at",
];

static SELECT_COLUMNS: LazyLock<String> = LazyLock::new(|| {
    format!(
        "id, order_number, {}, version, created_at",
        MUTABLE_COLUMNS.join(", ")
    )
});

static INSERT_SQL: LazyLock<String> = LazyLock::new(|| {
    let placeholders = vec!["?"; MUTABLE_COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO orders (id, order_number, {}, version, created_at) VALUES (?, ?, {placeholders}, ?, ?)",
        MUTABLE_COLUMNS.join(", ")
    )
});

static SAVE_SQL: LazyLock<String> = LazyLock::new(|| {
    let sets: Vec<String> = MUTABLE_COLUMNS.iter().map(|c| format!("{c} = ?")).collect();
    format!(
        "UPDATE orders SET {}, version = version + 1 WHERE id = ? AND version = ? AND status = ?",
        sets.join(", ")
    )
});

type OrderQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Bind every column of [`MUTABLE_COLUMNS`], in order
fn bind_mutable<'q>(query: OrderQuery<'q>, order: &'q Order) -> OrderQuery<'q> {
    query
        .bind(&order.title)
        .bind(&order.description)
        .bind(&order.subject)
        .bind(&order.discipline)
        .bind(&order.paper_type)
        .bind(order.pages)
        .bind(order.words)
        .bind(&order.format)
        .bind(order.price)
        .bind(order.price_kes)
        .bind(order.cpp)
        .bind(order.total_price_kes)
        .bind(order.deadline)
        .bind(&order.client_id)
        .bind(&order.client_name)
        .bind(&order.client_email)
        .bind(&order.client_phone)
        .bind(&order.requirements)
        .bind(Json(&order.attachments))
        .bind(order.status.as_str())
        .bind(&order.writer_id)
        .bind(&order.assigned_writer)
        .bind(order.assigned_at)
        .bind(&order.assigned_by)
        .bind(&order.picked_by)
        .bind(order.requires_confirmation)
        .bind(order.confirmed_at)
        .bind(&order.confirmed_by)
        .bind(&order.assignment_notes)
        .bind(&order.assignment_priority)
        .bind(order.assignment_deadline)
        .bind(order.started_at)
        .bind(order.submitted_at)
        .bind(order.submitted_to_admin_at)
        .bind(&order.submission_notes)
        .bind(order.files_uploaded_at)
        .bind(order.completed_at)
        .bind(Json(&order.original_files))
        .bind(Json(&order.revision_files))
        .bind(Json(&order.revision_requests))
        .bind(&order.revision_explanation)
        .bind(order.revision_score)
        .bind(order.revision_count)
        .bind(order.revision_submitted_at)
        .bind(&order.revision_response_notes)
        .bind(&order.admin_review_notes)
        .bind(order.admin_reviewed_at)
        .bind(&order.admin_reviewed_by)
        .bind(&order.reassignment_reason)
        .bind(order.reassigned_at)
        .bind(&order.reassigned_by)
        .bind(&order.original_writer_id)
        .bind(order.made_available_at)
        .bind(&order.made_available_by)
        .bind(order.fine_amount)
        .bind(&order.fine_reason)
        .bind(Json(&order.fine_history))
        .bind(Json(&order.bids))
        .bind(Json(&order.reviews))
        .bind(Json(&order.client_messages))
        .bind(Json(&order.admin_messages))
        .bind(order.last_admin_edit.as_ref().map(Json))
        .bind(order.updated_at)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {} FROM orders WHERE id = ?", *SELECT_COLUMNS);
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

pub async fn find_by_number(pool: &SqlitePool, order_number: &str) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {} FROM orders WHERE order_number = ?", *SELECT_COLUMNS);
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(order_number)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// List orders, newest first, with optional equality filters
pub async fn find_all(
    pool: &SqlitePool,
    status: Option<&str>,
    writer_id: Option<&str>,
) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {} FROM orders WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR writer_id = ?2) ORDER BY created_at DESC, id DESC",
        *SELECT_COLUMNS
    );
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(status)
        .bind(writer_id)
        .fetch_all(pool)
        .await?;
    Ok(orders)
}

/// Every order number currently in use
pub async fn taken_numbers(pool: &SqlitePool) -> RepoResult<HashSet<String>> {
    let numbers = sqlx::query_scalar::<_, String>("SELECT order_number FROM orders")
        .fetch_all(pool)
        .await?;
    Ok(numbers.into_iter().collect())
}

/// Insert a new order row. A clash on `order_number` surfaces as `Duplicate`.
pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    let query = sqlx::query(&INSERT_SQL)
        .bind(&order.id)
        .bind(&order.order_number);
    bind_mutable(query, order)
        .bind(order.version)
        .bind(order.created_at)
        .execute(conn)
        .await?;
    Ok(())
}

/// Persist `order` only if the stored row still has `expected_version` and
/// `expected_status`. Returns `false` when the row changed underneath.
pub async fn save(
    conn: &mut SqliteConnection,
    order: &Order,
    expected_version: i64,
    expected_status: &str,
) -> RepoResult<bool> {
    let rows = bind_mutable(sqlx::query(&SAVE_SQL), order)
        .bind(&order.id)
        .bind(expected_version)
        .bind(expected_status)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() == 1)
}

/// Hard delete; no activity is written for it
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Whether an insert failed on the uniqueness of the order id or number
pub fn is_number_clash(err: &RepoError) -> bool {
    matches!(err, RepoError::Duplicate(msg) if msg.contains("order_number") || msg.contains("orders.id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_bind_counts_match() {
        let insert_marks = INSERT_SQL.matches('?').count();
        assert_eq!(insert_marks, MUTABLE_COLUMNS.len() + 4);

        let save_marks = SAVE_SQL.matches('?').count();
        assert_eq!(save_marks, MUTABLE_COLUMNS.len() + 3);
    }

    #[test]
    fn test_number_clash_detection() {
        let clash = RepoError::Duplicate(
            "UNIQUE constraint failed: orders.order_number".into(),
        );
        assert!(is_number_clash(&clash));
        assert!(!is_number_clash(&RepoError::Duplicate("users.email".into())));
        assert!(!is_number_clash(&RepoError::Database("disk I/O error".into())));
    }
}
