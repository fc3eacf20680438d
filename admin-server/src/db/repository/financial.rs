//! Financial Repository
//!
//! Invoices, fines, payments, client payments, platform funds, withdrawal
//! requests and transaction logs. Every list takes the shared
//! [`FinancialQuery`] and applies the filters its table supports.

use super::{RepoError, RepoResult};
use serde_json::json;
use shared::models::{
    ClientPayment, ClientPaymentCreate, DEFAULT_CURRENCY, FinancialQuery, Fine, FineCreate,
    FineUpdate, Invoice, InvoiceCreate, InvoiceUpdate, Payment, PaymentCreate, PlatformFund,
    PlatformFundCreate, TransactionLog, TransactionLogCreate, WithdrawalCreate, WithdrawalRequest,
    WithdrawalUpdate,
};
use shared::util::{now_millis, prefixed_id};
use sqlx::SqlitePool;
use sqlx::types::Json;

const PENDING: &str = "pending";

fn currency(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(DEFAULT_CURRENCY)
}

async fn fetch_one<T>(pool: &SqlitePool, table: &str, id: &str) -> RepoResult<Option<T>>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
{
    let sql = format!("SELECT * FROM {table} WHERE id = ?");
    let row = sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

async fn inserted<T>(pool: &SqlitePool, table: &str, id: &str) -> RepoResult<T>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
{
    fetch_one(pool, table, id)
        .await?
        .ok_or_else(|| RepoError::Database(format!("{table} row {id} vanished after insert")))
}

// ── Invoices ────────────────────────────────────────────────────────

pub async fn list_invoices(pool: &SqlitePool, q: &FinancialQuery) -> RepoResult<Vec<Invoice>> {
    let rows = sqlx::query_as::<_, Invoice>(
        r#"
        SELECT * FROM invoices
        WHERE (?1 IS NULL OR writer_id = ?1) AND (?2 IS NULL OR status = ?2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(&q.writer_id)
    .bind(&q.status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_invoice(pool: &SqlitePool, id: &str) -> RepoResult<Option<Invoice>> {
    fetch_one(pool, "invoices", id).await
}

pub async fn create_invoice(pool: &SqlitePool, data: &InvoiceCreate) -> RepoResult<Invoice> {
    let id = prefixed_id("INV", 8);
    sqlx::query(
        r#"
        INSERT INTO invoices (
            id, order_id, order_title, writer_id, writer_name, amount, currency, status,
            kind, order_pages, order_deadline, order_completed_at, notes, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&data.order_id)
    .bind(&data.order_title)
    .bind(&data.writer_id)
    .bind(&data.writer_name)
    .bind(data.amount)
    .bind(currency(&data.currency))
    .bind(PENDING)
    .bind(&data.kind)
    .bind(data.order_pages)
    .bind(data.order_deadline)
    .bind(data.order_completed_at)
    .bind(&data.notes)
    .bind(now_millis())
    .execute(pool)
    .await?;
    inserted(pool, "invoices", &id).await
}

/// Moving to `approved` stamps `approved_at`, to `paid` stamps `paid_at`
pub async fn update_invoice(
    pool: &SqlitePool,
    id: &str,
    data: &InvoiceUpdate,
) -> RepoResult<Option<Invoice>> {
    let now = now_millis();
    let status = data.status.as_deref();
    let rows = sqlx::query(
        r#"
        UPDATE invoices SET
            status = COALESCE(?1, status),
            approved_by = COALESCE(?2, approved_by),
            payment_method = COALESCE(?3, payment_method),
            payment_reference = COALESCE(?4, payment_reference),
            notes = COALESCE(?5, notes),
            approved_at = CASE WHEN ?1 = 'approved' THEN ?6 ELSE approved_at END,
            paid_at = CASE WHEN ?1 = 'paid' THEN ?6 ELSE paid_at END
        WHERE id = ?7
        "#,
    )
    .bind(status)
    .bind(&data.approved_by)
    .bind(&data.payment_method)
    .bind(&data.payment_reference)
    .bind(&data.notes)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    if rows == 0 {
        return Ok(None);
    }
    find_invoice(pool, id).await
}

// ── Fines ───────────────────────────────────────────────────────────

pub async fn list_fines(pool: &SqlitePool, q: &FinancialQuery) -> RepoResult<Vec<Fine>> {
    let rows = sqlx::query_as::<_, Fine>(
        r#"
        SELECT * FROM fines
        WHERE (?1 IS NULL OR writer_id = ?1)
          AND (?2 IS NULL OR order_id = ?2)
          AND (?3 IS NULL OR status = ?3)
        ORDER BY applied_at DESC
        "#,
    )
    .bind(&q.writer_id)
    .bind(&q.order_id)
    .bind(&q.status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_fine(pool: &SqlitePool, id: &str) -> RepoResult<Option<Fine>> {
    fetch_one(pool, "fines", id).await
}

pub async fn create_fine(pool: &SqlitePool, data: &FineCreate) -> RepoResult<Fine> {
    let id = prefixed_id("FIN", 8);
    sqlx::query(
        r#"
        INSERT INTO fines (
            id, order_id, writer_id, writer_name, amount, currency, reason, kind, status,
            order_title, notes, applied_at, applied_by
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&data.order_id)
    .bind(&data.writer_id)
    .bind(&data.writer_name)
    .bind(data.amount)
    .bind(currency(&data.currency))
    .bind(&data.reason)
    .bind(&data.kind)
    .bind(PENDING)
    .bind(&data.order_title)
    .bind(&data.notes)
    .bind(now_millis())
    .bind(&data.applied_by)
    .execute(pool)
    .await?;
    inserted(pool, "fines", &id).await
}

/// Moving to `waived` stamps `waived_at`
pub async fn update_fine(pool: &SqlitePool, id: &str, data: &FineUpdate) -> RepoResult<Option<Fine>> {
    let rows = sqlx::query(
        r#"
        UPDATE fines SET
            status = COALESCE(?1, status),
            waived_by = COALESCE(?2, waived_by),
            waived_reason = COALESCE(?3, waived_reason),
            notes = COALESCE(?4, notes),
            waived_at = CASE WHEN ?1 = 'waived' THEN ?5 ELSE waived_at END
        WHERE id = ?6
        "#,
    )
    .bind(&data.status)
    .bind(&data.waived_by)
    .bind(&data.waived_reason)
    .bind(&data.notes)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    if rows == 0 {
        return Ok(None);
    }
    find_fine(pool, id).await
}

// ── Payments ────────────────────────────────────────────────────────

pub async fn list_payments(pool: &SqlitePool, q: &FinancialQuery) -> RepoResult<Vec<Payment>> {
    let rows = sqlx::query_as::<_, Payment>(
        r#"
        SELECT * FROM payments
        WHERE (?1 IS NULL OR writer_id = ?1) AND (?2 IS NULL OR status = ?2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(&q.writer_id)
    .bind(&q.status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_payment(pool: &SqlitePool, id: &str) -> RepoResult<Option<Payment>> {
    fetch_one(pool, "payments", id).await
}

pub async fn create_payment(pool: &SqlitePool, data: &PaymentCreate) -> RepoResult<Payment> {
    let id = prefixed_id("PAY", 8);
    let now = now_millis();
    let status = data.status.as_deref().unwrap_or(PENDING);
    sqlx::query(
        r#"
        INSERT INTO payments (
            id, writer_id, writer_name, amount, currency, kind, status, method, reference,
            related_order_id, related_invoice_id, notes, processed_by, created_at,
            processed_at, completed_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&data.writer_id)
    .bind(&data.writer_name)
    .bind(data.amount)
    .bind(currency(&data.currency))
    .bind(&data.kind)
    .bind(status)
    .bind(&data.method)
    .bind(&data.reference)
    .bind(&data.related_order_id)
    .bind(&data.related_invoice_id)
    .bind(&data.notes)
    .bind(&data.processed_by)
    .bind(now)
    .bind(data.processed_by.as_ref().map(|_| now))
    .bind((status == "completed").then_some(now))
    .execute(pool)
    .await?;
    inserted(pool, "payments", &id).await
}

// ── Client payments ─────────────────────────────────────────────────

pub async fn list_client_payments(
    pool: &SqlitePool,
    q: &FinancialQuery,
) -> RepoResult<Vec<ClientPayment>> {
    let rows = sqlx::query_as::<_, ClientPayment>(
        "SELECT * FROM client_payments WHERE (?1 IS NULL OR status = ?1) ORDER BY created_at DESC",
    )
    .bind(&q.status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_client_payment(
    pool: &SqlitePool,
    data: &ClientPaymentCreate,
) -> RepoResult<ClientPayment> {
    let id = prefixed_id("CPY", 8);
    sqlx::query(
        r#"
        INSERT INTO client_payments (
            id, order_id, order_title, client_id, client_name, amount, currency, status,
            method, reference, notes, received_at, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&data.order_id)
    .bind(&data.order_title)
    .bind(&data.client_id)
    .bind(&data.client_name)
    .bind(data.amount)
    .bind(currency(&data.currency))
    .bind(data.status.as_deref().unwrap_or(PENDING))
    .bind(&data.method)
    .bind(&data.reference)
    .bind(&data.notes)
    .bind(data.received_at)
    .bind(now_millis())
    .execute(pool)
    .await?;
    inserted(pool, "client_payments", &id).await
}

// ── Platform funds ──────────────────────────────────────────────────

pub async fn list_platform_funds(
    pool: &SqlitePool,
    q: &FinancialQuery,
) -> RepoResult<Vec<PlatformFund>> {
    let rows = sqlx::query_as::<_, PlatformFund>(
        "SELECT * FROM platform_funds WHERE (?1 IS NULL OR status = ?1) ORDER BY added_at DESC",
    )
    .bind(&q.status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_platform_fund(
    pool: &SqlitePool,
    data: &PlatformFundCreate,
) -> RepoResult<PlatformFund> {
    let id = prefixed_id("PFD", 8);
    sqlx::query(
        r#"
        INSERT INTO platform_funds (id, amount, currency, source, added_by, reference, notes, status, added_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(data.amount)
    .bind(currency(&data.currency))
    .bind(&data.source)
    .bind(&data.added_by)
    .bind(&data.reference)
    .bind(&data.notes)
    .bind(data.status.as_deref().unwrap_or(PENDING))
    .bind(now_millis())
    .execute(pool)
    .await?;
    inserted(pool, "platform_funds", &id).await
}

// ── Withdrawal requests ─────────────────────────────────────────────

pub async fn list_withdrawals(
    pool: &SqlitePool,
    q: &FinancialQuery,
) -> RepoResult<Vec<WithdrawalRequest>> {
    let rows = sqlx::query_as::<_, WithdrawalRequest>(
        r#"
        SELECT * FROM withdrawal_requests
        WHERE (?1 IS NULL OR writer_id = ?1) AND (?2 IS NULL OR status = ?2)
        ORDER BY requested_at DESC
        "#,
    )
    .bind(&q.writer_id)
    .bind(&q.status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_withdrawal(pool: &SqlitePool, id: &str) -> RepoResult<Option<WithdrawalRequest>> {
    fetch_one(pool, "withdrawal_requests", id).await
}

pub async fn create_withdrawal(
    pool: &SqlitePool,
    data: &WithdrawalCreate,
) -> RepoResult<WithdrawalRequest> {
    let id = prefixed_id("WDR", 8);
    let account_details = data.account_details.clone().unwrap_or_else(|| json!({}));
    sqlx::query(
        r#"
        INSERT INTO withdrawal_requests (
            id, writer_id, writer_name, amount, currency, status, method, account_details,
            invoice_id, notes, requested_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&data.writer_id)
    .bind(&data.writer_name)
    .bind(data.amount)
    .bind(currency(&data.currency))
    .bind(PENDING)
    .bind(&data.method)
    .bind(Json(&account_details))
    .bind(&data.invoice_id)
    .bind(&data.notes)
    .bind(now_millis())
    .execute(pool)
    .await?;
    inserted(pool, "withdrawal_requests", &id).await
}

/// The acting admin and timestamp land in the columns of the new status
/// (`approved`, `rejected` or `paid`)
pub async fn update_withdrawal(
    pool: &SqlitePool,
    id: &str,
    data: &WithdrawalUpdate,
) -> RepoResult<Option<WithdrawalRequest>> {
    let rows = sqlx::query(
        r#"
        UPDATE withdrawal_requests SET
            status = COALESCE(?1, status),
            approved_by = CASE WHEN ?1 = 'approved' THEN ?2 ELSE approved_by END,
            approved_at = CASE WHEN ?1 = 'approved' THEN ?3 ELSE approved_at END,
            rejected_by = CASE WHEN ?1 = 'rejected' THEN ?2 ELSE rejected_by END,
            rejected_at = CASE WHEN ?1 = 'rejected' THEN ?3 ELSE rejected_at END,
            paid_by = CASE WHEN ?1 = 'paid' THEN ?2 ELSE paid_by END,
            paid_at = CASE WHEN ?1 = 'paid' THEN ?3 ELSE paid_at END,
            rejection_reason = COALESCE(?4, rejection_reason),
            payment_reference = COALESCE(?5, payment_reference),
            notes = COALESCE(?6, notes)
        WHERE id = ?7
        "#,
    )
    .bind(&data.status)
    .bind(&data.actor_id)
    .bind(now_millis())
    .bind(&data.rejection_reason)
    .bind(&data.payment_reference)
    .bind(&data.notes)
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    if rows == 0 {
        return Ok(None);
    }
    find_withdrawal(pool, id).await
}

// ── Transaction logs ────────────────────────────────────────────────

pub async fn list_transaction_logs(
    pool: &SqlitePool,
    q: &FinancialQuery,
) -> RepoResult<Vec<TransactionLog>> {
    let rows = sqlx::query_as::<_, TransactionLog>(
        "SELECT * FROM transaction_logs WHERE (?1 IS NULL OR kind = ?1) ORDER BY performed_at DESC",
    )
    .bind(&q.kind)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_transaction_log(
    pool: &SqlitePool,
    data: &TransactionLogCreate,
) -> RepoResult<TransactionLog> {
    let id = prefixed_id("TXN", 8);
    sqlx::query(
        r#"
        INSERT INTO transaction_logs (
            id, kind, amount, currency, description, performed_by, related_entity_id,
            balance_before, balance_after, performed_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&data.kind)
    .bind(data.amount)
    .bind(currency(&data.currency))
    .bind(&data.description)
    .bind(&data.performed_by)
    .bind(&data.related_entity_id)
    .bind(data.balance_before)
    .bind(data.balance_after)
    .bind(now_millis())
    .execute(pool)
    .await?;
    inserted(pool, "transaction_logs", &id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use tempfile::TempDir;

    async fn pool() -> (SqlitePool, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("finance.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        (db.pool, dir)
    }

    #[tokio::test]
    async fn test_invoice_status_stamps() {
        let (pool, _dir) = pool().await;
        let invoice = create_invoice(
            &pool,
            &InvoiceCreate {
                writer_id: Some("W1".into()),
                amount: 1400.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(invoice.status, "pending");
        assert_eq!(invoice.currency, "KES");
        assert_eq!(invoice.approved_at, None);

        let approved = update_invoice(
            &pool,
            &invoice.id,
            &InvoiceUpdate {
                status: Some("approved".into()),
                approved_by: Some("A1".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert!(approved.approved_at.is_some());
        assert_eq!(approved.paid_at, None);

        let missing = update_invoice(&pool, "INV-NOPE", &InvoiceUpdate::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_withdrawal_actor_columns_follow_status() {
        let (pool, _dir) = pool().await;
        let request = create_withdrawal(
            &pool,
            &WithdrawalCreate {
                writer_id: "W1".into(),
                amount: 500.0,
                account_details: Some(json!({"mpesa": "0700000000"})),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(request.account_details["mpesa"], "0700000000");

        let rejected = update_withdrawal(
            &pool,
            &request.id,
            &WithdrawalUpdate {
                status: Some("rejected".into()),
                actor_id: Some("A1".into()),
                rejection_reason: Some("Balance too low".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(rejected.status, "rejected");
        assert_eq!(rejected.rejected_by.as_deref(), Some("A1"));
        assert!(rejected.rejected_at.is_some());
        assert_eq!(rejected.approved_by, None);
        assert_eq!(rejected.paid_at, None);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (pool, _dir) = pool().await;
        for (writer, order) in [("W1", "O1"), ("W1", "O2"), ("W2", "O1")] {
            create_fine(
                &pool,
                &FineCreate {
                    writer_id: Some(writer.into()),
                    order_id: Some(order.into()),
                    amount: 50.0,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }
        let q = FinancialQuery {
            writer_id: Some("W1".into()),
            ..Default::default()
        };
        assert_eq!(list_fines(&pool, &q).await.unwrap().len(), 2);

        let q = FinancialQuery {
            order_id: Some("O1".into()),
            ..Default::default()
        };
        assert_eq!(list_fines(&pool, &q).await.unwrap().len(), 2);
        assert_eq!(list_fines(&pool, &FinancialQuery::default()).await.unwrap().len(), 3);
    }
}
