//! Financial Models
//!
//! Invoices, fines, payments, client payments, platform funds, withdrawal
//! requests and the transaction log. Amounts are KES unless `currency` says
//! otherwise.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default currency for every financial record
pub const DEFAULT_CURRENCY: &str = "KES";

// ── Invoice ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub order_id: Option<String>,
    pub order_title: Option<String>,
    pub writer_id: Option<String>,
    pub writer_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    /// `pending`, `approved`, `paid`, `rejected`
    pub status: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub order_pages: Option<i64>,
    pub order_deadline: Option<i64>,
    pub order_completed_at: Option<i64>,
    pub approved_at: Option<i64>,
    pub paid_at: Option<i64>,
    pub approved_by: Option<String>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceCreate {
    pub order_id: Option<String>,
    pub order_title: Option<String>,
    pub writer_id: Option<String>,
    pub writer_name: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub order_pages: Option<i64>,
    pub order_deadline: Option<i64>,
    pub order_completed_at: Option<i64>,
    pub notes: Option<String>,
}

/// Status change on an invoice; `approved` and `paid` stamp their timestamps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceUpdate {
    pub status: Option<String>,
    pub approved_by: Option<String>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
}

// ── Fine ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Fine {
    pub id: String,
    pub order_id: Option<String>,
    pub writer_id: Option<String>,
    pub writer_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub reason: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `pending`, `applied`, `waived`
    pub status: String,
    pub order_title: Option<String>,
    pub notes: Option<String>,
    pub applied_at: i64,
    pub applied_by: Option<String>,
    pub waived_at: Option<i64>,
    pub waived_by: Option<String>,
    pub waived_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FineCreate {
    pub order_id: Option<String>,
    pub writer_id: Option<String>,
    pub writer_name: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    pub reason: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub order_title: Option<String>,
    pub notes: Option<String>,
    pub applied_by: Option<String>,
}

/// Status change on a fine; `waived` stamps `waivedAt`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FineUpdate {
    pub status: Option<String>,
    pub waived_by: Option<String>,
    pub waived_reason: Option<String>,
    pub notes: Option<String>,
}

// ── Payment ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub writer_id: Option<String>,
    pub writer_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: String,
    pub method: Option<String>,
    pub reference: Option<String>,
    pub related_order_id: Option<String>,
    pub related_invoice_id: Option<String>,
    pub notes: Option<String>,
    pub processed_by: Option<String>,
    pub created_at: i64,
    pub processed_at: Option<i64>,
    pub completed_at: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentCreate {
    pub writer_id: Option<String>,
    pub writer_name: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub method: Option<String>,
    pub reference: Option<String>,
    pub related_order_id: Option<String>,
    pub related_invoice_id: Option<String>,
    pub notes: Option<String>,
    pub processed_by: Option<String>,
}

// ── Client payment ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ClientPayment {
    pub id: String,
    pub order_id: Option<String>,
    pub order_title: Option<String>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub method: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub received_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientPaymentCreate {
    pub order_id: Option<String>,
    pub order_title: Option<String>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub method: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub received_at: Option<i64>,
}

// ── Platform funds ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PlatformFund {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub source: Option<String>,
    pub added_by: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub added_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformFundCreate {
    pub amount: f64,
    pub currency: Option<String>,
    pub source: Option<String>,
    pub added_by: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

// ── Withdrawal request ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub id: String,
    pub writer_id: String,
    pub writer_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    /// `pending`, `approved`, `rejected`, `paid`
    pub status: String,
    pub method: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub account_details: Value,
    pub approved_by: Option<String>,
    pub approved_at: Option<i64>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<i64>,
    pub rejection_reason: Option<String>,
    pub paid_by: Option<String>,
    pub paid_at: Option<i64>,
    pub payment_reference: Option<String>,
    pub invoice_id: Option<String>,
    pub notes: Option<String>,
    pub requested_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WithdrawalCreate {
    pub writer_id: String,
    pub writer_name: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    pub method: Option<String>,
    pub account_details: Option<Value>,
    pub invoice_id: Option<String>,
    pub notes: Option<String>,
}

/// Status change on a withdrawal; the acting admin goes to the column that
/// matches the new status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WithdrawalUpdate {
    pub status: Option<String>,
    pub actor_id: Option<String>,
    pub rejection_reason: Option<String>,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
}

// ── Transaction log ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct TransactionLog {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub currency: String,
    pub description: Option<String>,
    pub performed_by: Option<String>,
    pub related_entity_id: Option<String>,
    pub balance_before: Option<f64>,
    pub balance_after: Option<f64>,
    pub performed_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionLogCreate {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub performed_by: Option<String>,
    pub related_entity_id: Option<String>,
    pub balance_before: Option<f64>,
    pub balance_after: Option<f64>,
}

/// Equality filters shared by the financial list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialQuery {
    pub writer_id: Option<String>,
    pub order_id: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
