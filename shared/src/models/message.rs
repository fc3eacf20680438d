//! Message Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub sender_name: Option<String>,
    pub sender_role: Option<String>,
    pub recipient_id: String,
    pub recipient_name: Option<String>,
    pub recipient_role: Option<String>,
    pub subject: Option<String>,
    pub content: String,
    pub related_order_id: Option<String>,
    pub is_read: bool,
    pub read_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageCreate {
    pub sender_id: String,
    pub sender_name: Option<String>,
    pub sender_role: Option<String>,
    pub recipient_id: String,
    pub recipient_name: Option<String>,
    pub recipient_role: Option<String>,
    pub subject: Option<String>,
    pub content: String,
    pub related_order_id: Option<String>,
}
