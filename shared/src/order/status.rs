//! Order lifecycle status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Order status
///
/// Serialized with the display names used on the wire and in the
/// `orders.status` column. Unknown names are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Open for writers to pick or admins to assign
    #[default]
    Available,
    /// A writer owns the order but has not started
    Assigned,
    #[serde(rename = "In Progress")]
    InProgress,
    /// Work handed to admins, awaiting review
    Submitted,
    #[serde(rename = "Revision Requested")]
    RevisionRequested,
    Completed,
    Rejected,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Available,
        OrderStatus::Assigned,
        OrderStatus::InProgress,
        OrderStatus::Submitted,
        OrderStatus::RevisionRequested,
        OrderStatus::Completed,
        OrderStatus::Rejected,
        OrderStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Available => "Available",
            OrderStatus::Assigned => "Assigned",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Submitted => "Submitted",
            OrderStatus::RevisionRequested => "Revision Requested",
            OrderStatus::Completed => "Completed",
            OrderStatus::Rejected => "Rejected",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Terminal statuses accept no further lifecycle transitions except fines
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Rejected | OrderStatus::Cancelled
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_names() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert_eq!(
            "In Progress".parse::<OrderStatus>(),
            Ok(OrderStatus::InProgress)
        );
    }

    #[test]
    fn test_rejects_unknown_and_wrong_case() {
        assert_eq!(
            "Whatever".parse::<OrderStatus>(),
            Err(UnknownStatus("Whatever".into()))
        );
        assert!("available".parse::<OrderStatus>().is_err());
        assert!("InProgress".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_serde_matches_display() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
        assert!(serde_json::from_str::<OrderStatus>("\"Revision\"").is_err());
    }

    #[test]
    fn test_terminal() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Submitted.is_terminal());
        assert_eq!(OrderStatus::default(), OrderStatus::Available);
    }
}
