//! Review Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub order_id: Option<String>,
    pub writer_id: Option<String>,
    pub writer_name: Option<String>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    /// 1..=5
    pub rating: i64,
    pub comment: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub categories: Vec<String>,
    pub status: String,
    pub is_verified: bool,
    pub admin_notes: Option<String>,
    pub order_title: Option<String>,
    pub order_pages: Option<i64>,
    pub order_value: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewCreate {
    pub order_id: Option<String>,
    pub writer_id: Option<String>,
    pub writer_name: Option<String>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub rating: i64,
    pub comment: Option<String>,
    pub categories: Vec<String>,
    pub order_title: Option<String>,
    pub order_pages: Option<i64>,
    pub order_value: Option<f64>,
}

/// Moderation update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewUpdate {
    pub rating: Option<i64>,
    pub comment: Option<String>,
    pub status: Option<String>,
    pub is_verified: Option<bool>,
    pub admin_notes: Option<String>,
}
