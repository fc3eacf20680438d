//! Notification Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: Option<String>,
    pub related_entity_id: Option<String>,
    pub related_entity_type: Option<String>,
    pub is_read: bool,
    pub read_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationCreate {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: String,
    pub message: Option<String>,
    pub related_entity_id: Option<String>,
    pub related_entity_type: Option<String>,
}
