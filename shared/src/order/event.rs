//! Order events - facts published after a transition commits

use super::status::OrderStatus;
use super::types::Actor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Activity type recorded for each lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderActionType {
    Created,
    Picked,
    Assigned,
    Confirmed,
    Started,
    Submitted,
    Approved,
    RevisionRequested,
    RevisionSubmitted,
    Rejected,
    Reassigned,
    MadeAvailable,
    FineApplied,
    BidPlaced,
    Cancelled,
}

impl OrderActionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderActionType::Created => "created",
            OrderActionType::Picked => "picked",
            OrderActionType::Assigned => "assigned",
            OrderActionType::Confirmed => "confirmed",
            OrderActionType::Started => "started",
            OrderActionType::Submitted => "submitted",
            OrderActionType::Approved => "approved",
            OrderActionType::RevisionRequested => "revision_requested",
            OrderActionType::RevisionSubmitted => "revision_submitted",
            OrderActionType::Rejected => "rejected",
            OrderActionType::Reassigned => "reassigned",
            OrderActionType::MadeAvailable => "made_available",
            OrderActionType::FineApplied => "fine_applied",
            OrderActionType::BidPlaced => "bid_placed",
            OrderActionType::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Published on the in-process event bus once an order write has committed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    pub order_id: String,
    pub order_number: String,
    pub action_type: OrderActionType,
    pub actor: Actor,
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
    /// Writer owning the order after the transition
    pub writer_id: Option<String>,
    /// Writer owning the order before the transition (differs on reassignment)
    pub previous_writer_id: Option<String>,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_serde_matches_as_str() {
        let all = [
            OrderActionType::Created,
            OrderActionType::Picked,
            OrderActionType::RevisionRequested,
            OrderActionType::RevisionSubmitted,
            OrderActionType::MadeAvailable,
            OrderActionType::FineApplied,
            OrderActionType::Cancelled,
        ];
        for action in all {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
    }
}
