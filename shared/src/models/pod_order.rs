//! POD (pay-on-delivery) Order Model
//!
//! Plain records: no lifecycle engine and no activity log.

use crate::order::UploadedFile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PodOrder {
    /// `POD-XXXXXX`
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub discipline: Option<String>,
    pub paper_type: Option<String>,
    pub pages: Option<i64>,
    pub words: Option<i64>,
    pub format: Option<String>,
    pub price: Option<f64>,
    pub price_kes: Option<f64>,
    pub cpp: Option<f64>,
    pub deadline: Option<i64>,
    pub deadline_hours: Option<i64>,
    pub status: String,
    pub writer_id: Option<String>,
    pub assigned_writer: Option<String>,
    pub pod_amount: Option<f64>,
    pub delivery_date: Option<i64>,
    pub payment_received_at: Option<i64>,
    pub delivery_notes: Option<String>,
    pub admin_review_notes: Option<String>,
    pub admin_reviewed_at: Option<i64>,
    pub admin_reviewed_by: Option<String>,
    pub revision_notes: Option<String>,
    pub revision_requested_at: Option<i64>,
    pub revision_requested_by: Option<String>,
    pub revision_count: i64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub uploaded_files: Vec<UploadedFile>,
    pub additional_instructions: Option<String>,
    pub is_overdue: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create / update POD order payload
///
/// On create `title` is required and `status` defaults to `Available`;
/// on update every present field overwrites the stored one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodOrderInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub discipline: Option<String>,
    pub paper_type: Option<String>,
    pub pages: Option<i64>,
    pub words: Option<i64>,
    pub format: Option<String>,
    pub price: Option<f64>,
    pub price_kes: Option<f64>,
    pub cpp: Option<f64>,
    pub deadline: Option<i64>,
    pub deadline_hours: Option<i64>,
    pub status: Option<String>,
    pub writer_id: Option<String>,
    pub assigned_writer: Option<String>,
    pub pod_amount: Option<f64>,
    pub delivery_date: Option<i64>,
    pub payment_received_at: Option<i64>,
    pub delivery_notes: Option<String>,
    pub admin_review_notes: Option<String>,
    pub admin_reviewed_at: Option<i64>,
    pub admin_reviewed_by: Option<String>,
    pub revision_notes: Option<String>,
    pub revision_requested_at: Option<i64>,
    pub revision_requested_by: Option<String>,
    pub revision_count: Option<i64>,
    pub uploaded_files: Option<Vec<UploadedFile>>,
    pub additional_instructions: Option<String>,
    pub is_overdue: Option<bool>,
}
