//! Notification Worker
//!
//! Consumes the order event broadcast and writes notification rows.
//! Stops when the channel closes. Failures are logged and never reach the
//! transition that produced the event.

use shared::models::NotificationCreate;
use shared::order::{OrderActionType, OrderEvent};
use sqlx::SqlitePool;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::db::repository::notification;

/// User id of the shared admin inbox
pub const ADMIN_INBOX: &str = "admin";

pub struct NotificationWorker {
    pool: SqlitePool,
}

impl NotificationWorker {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run the worker (blocks until the channel closes)
    pub async fn run(self, mut rx: broadcast::Receiver<OrderEvent>) {
        tracing::info!("Notification worker started");

        loop {
            match rx.recv().await {
                Ok(event) => self.handle(&event).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification worker lagged, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }

        tracing::info!("Order event channel closed, notification worker stopping");
    }

    async fn handle(&self, event: &OrderEvent) {
        for data in notifications_for(event) {
            match notification::create(&self.pool, &data).await {
                Ok(n) => {
                    tracing::debug!(
                        notification_id = %n.id,
                        user_id = %n.user_id,
                        order_id = %event.order_id,
                        "Notification recorded"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        order_id = %event.order_id,
                        user_id = %data.user_id,
                        error = %e,
                        "Failed to write notification"
                    );
                }
            }
        }
    }
}

/// Notifications an event produces, one per recipient
pub fn notifications_for(event: &OrderEvent) -> Vec<NotificationCreate> {
    let number = &event.order_number;
    let actor = &event.actor.name;
    let note = |user_id: &str, kind: &str, title: String, message: String| NotificationCreate {
        user_id: user_id.to_string(),
        kind: Some(kind.to_string()),
        title,
        message: Some(message),
        related_entity_id: Some(event.order_id.clone()),
        related_entity_type: Some("order".to_string()),
    };
    let current = event.writer_id.as_deref();
    let previous = event.previous_writer_id.as_deref();

    match event.action_type {
        OrderActionType::Picked => vec![note(
            ADMIN_INBOX,
            "info",
            format!("Order {number} picked"),
            format!("{actor} picked order {number}"),
        )],
        OrderActionType::Submitted => vec![note(
            ADMIN_INBOX,
            "info",
            format!("Order {number} submitted"),
            format!("{actor} submitted order {number} for review"),
        )],
        OrderActionType::RevisionSubmitted => vec![note(
            ADMIN_INBOX,
            "info",
            format!("Revision submitted for {number}"),
            format!("{actor} resubmitted order {number}"),
        )],
        OrderActionType::Assigned => current
            .map(|w| {
                note(
                    w,
                    "info",
                    format!("Order {number} assigned to you"),
                    format!("{actor} assigned order {number} to you"),
                )
            })
            .into_iter()
            .collect(),
        OrderActionType::RevisionRequested => current
            .map(|w| {
                note(
                    w,
                    "warning",
                    format!("Revision requested on {number}"),
                    format!("{actor} requested a revision on order {number}"),
                )
            })
            .into_iter()
            .collect(),
        OrderActionType::Approved => current
            .map(|w| {
                note(
                    w,
                    "success",
                    format!("Order {number} approved"),
                    format!("Your work on order {number} was approved"),
                )
            })
            .into_iter()
            .collect(),
        OrderActionType::Rejected => current
            .map(|w| {
                note(
                    w,
                    "error",
                    format!("Order {number} rejected"),
                    format!("Your submission for order {number} was rejected"),
                )
            })
            .into_iter()
            .collect(),
        OrderActionType::FineApplied => current
            .map(|w| {
                note(
                    w,
                    "warning",
                    format!("Fine applied on {number}"),
                    format!("{actor} applied a fine on order {number}"),
                )
            })
            .into_iter()
            .collect(),
        OrderActionType::MadeAvailable => previous
            .map(|w| {
                note(
                    w,
                    "warning",
                    format!("Order {number} reopened"),
                    format!("Order {number} was taken from you and made available"),
                )
            })
            .into_iter()
            .collect(),
        OrderActionType::Reassigned => {
            let mut out: Vec<_> = previous
                .map(|w| {
                    note(
                        w,
                        "warning",
                        format!("Order {number} reassigned"),
                        format!("Order {number} was reassigned away from you"),
                    )
                })
                .into_iter()
                .collect();
            if let Some(w) = current.filter(|w| Some(*w) != previous) {
                out.push(note(
                    w,
                    "info",
                    format!("Order {number} assigned to you"),
                    format!("{actor} reassigned order {number} to you"),
                ));
            }
            out
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{Actor, OrderStatus};

    fn event(action_type: OrderActionType, writer: Option<&str>, previous: Option<&str>) -> OrderEvent {
        OrderEvent {
            order_id: "ORD-ABC123".into(),
            order_number: "A123".into(),
            action_type,
            actor: Actor::admin("A1", "Admin"),
            old_status: OrderStatus::Submitted,
            new_status: OrderStatus::Completed,
            writer_id: writer.map(String::from),
            previous_writer_id: previous.map(String::from),
            timestamp: 0,
        }
    }

    #[test]
    fn test_writer_events_go_to_assignee() {
        let out = notifications_for(&event(OrderActionType::Approved, Some("W1"), Some("W1")));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].user_id, "W1");
        assert_eq!(out[0].related_entity_id.as_deref(), Some("ORD-ABC123"));
    }

    #[test]
    fn test_submission_goes_to_admin_inbox() {
        let out = notifications_for(&event(OrderActionType::Submitted, Some("W1"), Some("W1")));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].user_id, ADMIN_INBOX);
    }

    #[test]
    fn test_reassignment_notifies_both_writers() {
        let out = notifications_for(&event(OrderActionType::Reassigned, Some("W2"), Some("W1")));
        let users: Vec<_> = out.iter().map(|n| n.user_id.as_str()).collect();
        assert_eq!(users, ["W1", "W2"]);

        let to_pool = notifications_for(&event(OrderActionType::Reassigned, None, Some("W1")));
        assert_eq!(to_pool.len(), 1);
    }

    #[test]
    fn test_made_available_notifies_previous_writer() {
        let out = notifications_for(&event(OrderActionType::MadeAvailable, None, Some("W1")));
        assert_eq!(out[0].user_id, "W1");
    }

    #[test]
    fn test_quiet_events() {
        for kind in [
            OrderActionType::Created,
            OrderActionType::Started,
            OrderActionType::BidPlaced,
        ] {
            assert!(notifications_for(&event(kind, Some("W1"), None)).is_empty());
        }
        assert!(notifications_for(&event(OrderActionType::Approved, None, None)).is_empty());
    }
}
