//! Writer Model

use serde::{Deserialize, Serialize};

/// Writer profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Writer {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    /// Application / account status, `application_submitted` on creation
    pub status: String,
    pub national_id: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub specializations: Vec<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub languages: Vec<String>,
    pub bio: Option<String>,
    pub rating: f64,
    pub total_reviews: i64,
    pub completed_orders: i64,
    pub total_earnings: f64,
    pub success_rate: f64,
    pub max_concurrent_orders: i64,
    pub preferred_payment_method: Option<String>,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub is_email_verified: bool,
    pub is_document_verified: bool,
    pub created_at: i64,
    pub last_active_at: Option<i64>,
    pub application_submitted_at: Option<i64>,
    pub application_reviewed_at: Option<i64>,
    pub application_reviewed_by: Option<String>,
}

/// Create writer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WriterCreate {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub national_id: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub specializations: Vec<String>,
    pub languages: Vec<String>,
    pub bio: Option<String>,
    pub max_concurrent_orders: Option<i64>,
    pub preferred_payment_method: Option<String>,
}

/// Update writer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WriterUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub national_id: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub specializations: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub bio: Option<String>,
    pub rating: Option<f64>,
    pub total_reviews: Option<i64>,
    pub completed_orders: Option<i64>,
    pub total_earnings: Option<f64>,
    pub success_rate: Option<f64>,
    pub max_concurrent_orders: Option<i64>,
    pub preferred_payment_method: Option<String>,
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    pub is_email_verified: Option<bool>,
    pub is_document_verified: Option<bool>,
    /// Admin reviewing the application; stamps `applicationReviewedAt`
    pub application_reviewed_by: Option<String>,
}
