//! Order sub-records and actor identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of the party performing an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Writer,
    Admin,
}

impl ActorRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Writer => "writer",
            ActorRole::Admin => "admin",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who performed a lifecycle action
///
/// Supplied by the caller and trusted as-is; no authentication happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: ActorRole,
}

impl Actor {
    pub fn writer(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: ActorRole::Writer,
        }
    }

    pub fn admin(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: ActorRole::Admin,
        }
    }
}

/// A writer's bid on an available order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub writer_id: String,
    pub writer_name: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: i64,
}

/// Why a fine was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FineKind {
    Manual,
    Late,
    Rejection,
    AutoReassignment,
}

/// One entry of an order's append-only fine history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FineEvent {
    pub amount: f64,
    pub reason: String,
    #[serde(rename = "type")]
    pub kind: FineKind,
    pub applied_at: i64,
    pub applied_by: String,
}

/// One admin revision request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionRequest {
    pub explanation: String,
    pub requested_at: i64,
    pub requested_by: String,
    /// Revision score right after this request was applied
    pub score_after: i32,
}

/// Metadata of a file attached to an order (storage itself is external)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    pub url: String,
    pub uploaded_at: i64,
}

/// Party a message on an order thread came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    Client,
    Writer,
    Admin,
}

/// One entry of an order's client or admin message thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMessage {
    pub id: String,
    pub sender: MessageSender,
    pub message: String,
    pub timestamp: i64,
    /// File ids or urls
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

/// Client feedback kept on the order itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReview {
    pub id: String,
    #[serde(default)]
    pub client_name: Option<String>,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Stamp of the most recent descriptive edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEdit {
    pub edited_by: String,
    #[serde(default)]
    pub edited_by_name: Option<String>,
    pub edited_at: i64,
    /// camelCase names of the fields the edit touched
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl AssignmentPriority {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssignmentPriority::Low => "low",
            AssignmentPriority::Medium => "medium",
            AssignmentPriority::High => "high",
            AssignmentPriority::Urgent => "urgent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_json_shape() {
        let actor: Actor =
            serde_json::from_str(r#"{"id":"W1","name":"Jane","role":"writer"}"#).unwrap();
        assert_eq!(actor, Actor::writer("W1", "Jane"));
        assert!(serde_json::from_str::<Actor>(r#"{"id":"X","name":"X","role":"client"}"#).is_err());
    }

    #[test]
    fn test_fine_event_uses_type_key() {
        let fine = FineEvent {
            amount: 70.0,
            reason: "Order rejected by admin".into(),
            kind: FineKind::Rejection,
            applied_at: 1,
            applied_by: "A1".into(),
        };
        let json = serde_json::to_value(&fine).unwrap();
        assert_eq!(json["type"], "rejection");
        assert_eq!(json["appliedBy"], "A1");
    }

    #[test]
    fn test_order_message_shape() {
        let msg: OrderMessage = serde_json::from_str(
            r#"{"id":"M1","sender":"client","message":"Use APA","timestamp":5}"#,
        )
        .unwrap();
        assert_eq!(msg.sender, MessageSender::Client);
        assert!(msg.attachments.is_empty());
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("attachments").is_none());
        assert!(serde_json::from_str::<OrderMessage>(
            r#"{"id":"M2","sender":"system","message":"x","timestamp":1}"#
        )
        .is_err());
    }
}
