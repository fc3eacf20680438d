//! Order Activity Model (append-only audit trail)

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One immutable lifecycle record
///
/// Read order is newest first. Status columns are plain strings because
/// manually appended entries are not constrained to the lifecycle set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderActivity {
    /// `ACT-XXXXXXXX`
    pub id: String,
    pub order_id: String,
    /// Denormalized for lookup without a join
    pub order_number: Option<String>,
    pub action_type: String,
    pub action_by: String,
    pub action_by_name: Option<String>,
    pub action_by_role: Option<String>,
    pub old_status: Option<String>,
    pub new_status: Option<String>,
    pub description: Option<String>,
    /// Open map of extra key/values captured at the time of the action
    #[cfg_attr(feature = "db", sqlx(json))]
    pub metadata: Value,
    pub created_at: i64,
}

/// Manual append payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderActivityCreate {
    pub order_id: String,
    pub action_type: String,
    pub action_by: String,
    pub action_by_name: Option<String>,
    pub action_by_role: Option<String>,
    pub old_status: Option<String>,
    pub new_status: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Value>,
}

/// Query filters for listing activities
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    pub order_id: Option<String>,
    /// Activities of orders currently owned by this writer
    pub writer_id: Option<String>,
    pub action_type: Option<String>,
}
