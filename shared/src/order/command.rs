//! Lifecycle commands - requests to move an order through its states

use super::types::{Actor, AssignmentPriority, UploadedFile};
use serde::{Deserialize, Serialize};

/// Lifecycle command addressed to one order
///
/// ```json
/// { "actor": {"id":"W1","name":"Jane","role":"writer"}, "action": "pick" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCommand {
    pub actor: Actor,
    #[serde(flatten)]
    pub payload: OrderCommandPayload,
}

/// Command payload, tagged by `action`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "action",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum OrderCommandPayload {
    /// Writer takes an available order
    Pick,
    /// Admin hands an available order to a writer
    Assign {
        writer_id: String,
        writer_name: String,
        #[serde(default)]
        requires_confirmation: bool,
        #[serde(default)]
        notes: Option<String>,
        #[serde(default)]
        priority: Option<AssignmentPriority>,
        #[serde(default)]
        deadline: Option<i64>,
    },
    /// Writer accepts an assignment that requires confirmation
    Confirm,
    Start,
    Submit {
        #[serde(default)]
        notes: Option<String>,
        #[serde(default)]
        files: Vec<UploadedFile>,
    },
    Approve {
        #[serde(default)]
        notes: Option<String>,
    },
    RequestRevision {
        explanation: String,
        #[serde(default)]
        notes: Option<String>,
    },
    Resubmit {
        notes: String,
        #[serde(default)]
        files: Vec<UploadedFile>,
    },
    Reject {
        reason: String,
    },
    Reassign {
        reason: String,
        #[serde(default)]
        new_writer_id: Option<String>,
        #[serde(default)]
        new_writer_name: Option<String>,
    },
    MakeAvailable {
        #[serde(default)]
        reason: Option<String>,
    },
    ApplyFine {
        amount: f64,
        reason: String,
    },
    PlaceBid {
        amount: f64,
        #[serde(default)]
        message: Option<String>,
    },
    Cancel {
        #[serde(default)]
        reason: Option<String>,
    },
}

impl OrderCommandPayload {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            OrderCommandPayload::Pick => "pick",
            OrderCommandPayload::Assign { .. } => "assign",
            OrderCommandPayload::Confirm => "confirm",
            OrderCommandPayload::Start => "start",
            OrderCommandPayload::Submit { .. } => "submit",
            OrderCommandPayload::Approve { .. } => "approve",
            OrderCommandPayload::RequestRevision { .. } => "request_revision",
            OrderCommandPayload::Resubmit { .. } => "resubmit",
            OrderCommandPayload::Reject { .. } => "reject",
            OrderCommandPayload::Reassign { .. } => "reassign",
            OrderCommandPayload::MakeAvailable { .. } => "make_available",
            OrderCommandPayload::ApplyFine { .. } => "apply_fine",
            OrderCommandPayload::PlaceBid { .. } => "place_bid",
            OrderCommandPayload::Cancel { .. } => "cancel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::ActorRole;

    #[test]
    fn test_unit_action_deserializes() {
        let cmd: OrderCommand = serde_json::from_str(
            r#"{"actor":{"id":"W1","name":"Jane","role":"writer"},"action":"pick"}"#,
        )
        .unwrap();
        assert_eq!(cmd.actor.role, ActorRole::Writer);
        assert!(matches!(cmd.payload, OrderCommandPayload::Pick));
    }

    #[test]
    fn test_fields_are_camel_case() {
        let cmd: OrderCommand = serde_json::from_str(
            r#"{
                "actor": {"id":"A1","name":"Admin","role":"admin"},
                "action": "assign",
                "writerId": "W2",
                "writerName": "Sam",
                "requiresConfirmation": true,
                "priority": "urgent"
            }"#,
        )
        .unwrap();
        match cmd.payload {
            OrderCommandPayload::Assign {
                writer_id,
                requires_confirmation,
                priority,
                ..
            } => {
                assert_eq!(writer_id, "W2");
                assert!(requires_confirmation);
                assert_eq!(priority, Some(AssignmentPriority::Urgent));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_required_fields_enforced() {
        let missing_explanation = r#"{"actor":{"id":"A1","name":"A","role":"admin"},"action":"request_revision"}"#;
        assert!(serde_json::from_str::<OrderCommand>(missing_explanation).is_err());

        let unknown = r#"{"actor":{"id":"A1","name":"A","role":"admin"},"action":"teleport"}"#;
        assert!(serde_json::from_str::<OrderCommand>(unknown).is_err());
    }
}
