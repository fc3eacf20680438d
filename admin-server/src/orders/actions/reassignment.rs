//! Taking an order away from its writer: reassign, make available, cancel

use serde_json::json;
use shared::models::Order;
use shared::order::{ActorRole, OrderActionType, OrderStatus};

use super::{
    MAX_NOTE_LEN, clear_assignment, clear_assignment_terms, invalid, next_row, optional_text,
    require_role, require_text,
};
use crate::orders::error::OrderError;
use crate::orders::traits::{Transition, TransitionContext, TransitionHandler};

/// Move an owned order away from its writer, optionally straight to another one
#[derive(Debug, Clone)]
pub struct ReassignAction {
    pub reason: String,
    pub new_writer_id: Option<String>,
    pub new_writer_name: Option<String>,
}

impl TransitionHandler for ReassignAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_role(ctx, ActorRole::Admin, "reassign")?;
        require_text(&self.reason, "reason", MAX_NOTE_LEN)?;
        if !matches!(order.status, OrderStatus::Assigned | OrderStatus::InProgress) {
            return Err(invalid("reassign", order));
        }

        let new_writer = match self.new_writer_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                let name = self
                    .new_writer_name
                    .as_deref()
                    .filter(|n| !n.trim().is_empty())
                    .ok_or_else(|| {
                        OrderError::Validation("newWriterName is required with newWriterId".into())
                    })?;
                if order.writer_id.as_deref() == Some(id) {
                    return Err(OrderError::Validation(format!(
                        "Order {} is already assigned to {id}",
                        order.order_number
                    )));
                }
                Some((id.to_string(), name.to_string()))
            }
            _ => None,
        };

        let mut next = next_row(ctx, order);
        next.original_writer_id = order.writer_id.clone();
        next.reassigned_at = Some(ctx.now);
        next.reassigned_by = Some(ctx.actor.id.clone());
        next.reassignment_reason = Some(self.reason.clone());

        let description = match &new_writer {
            Some((id, name)) => {
                clear_assignment_terms(&mut next);
                next.status = OrderStatus::Assigned;
                next.writer_id = Some(id.clone());
                next.assigned_writer = Some(name.clone());
                next.assigned_at = Some(ctx.now);
                next.assigned_by = Some(ActorRole::Admin.as_str().into());
                next.picked_by = Some(ActorRole::Admin.as_str().into());
                format!(
                    "Order {} reassigned from {} to {name}: {}",
                    order.order_number,
                    order.assigned_writer.as_deref().unwrap_or("unknown writer"),
                    self.reason
                )
            }
            None => {
                clear_assignment(&mut next);
                next.status = OrderStatus::Available;
                format!(
                    "Order {} taken from {} and reopened: {}",
                    order.order_number,
                    order.assigned_writer.as_deref().unwrap_or("unknown writer"),
                    self.reason
                )
            }
        };

        Ok(Transition {
            description,
            metadata: json!({
                "reason": self.reason,
                "previousWriterId": order.writer_id,
                "newWriterId": new_writer.as_ref().map(|(id, _)| id.clone()),
            }),
            action_type: OrderActionType::Reassigned,
            order: next,
        })
    }
}

/// Reopen a non-terminal order to the pool
#[derive(Debug, Clone)]
pub struct MakeAvailableAction {
    pub reason: Option<String>,
}

impl TransitionHandler for MakeAvailableAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_role(ctx, ActorRole::Admin, "make available")?;
        optional_text(&self.reason, "reason", MAX_NOTE_LEN)?;
        if order.status.is_terminal() {
            return Err(invalid("make available", order));
        }

        let mut next = next_row(ctx, order);
        clear_assignment(&mut next);
        next.status = OrderStatus::Available;
        next.made_available_at = Some(ctx.now);
        next.made_available_by = Some(ctx.actor.id.clone());

        Ok(Transition {
            description: match &self.reason {
                Some(reason) => format!("Order {} made available: {reason}", order.order_number),
                None => format!("Order {} made available", order.order_number),
            },
            metadata: json!({ "reason": self.reason, "previousWriterId": order.writer_id }),
            action_type: OrderActionType::MadeAvailable,
            order: next,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CancelAction {
    pub reason: Option<String>,
}

impl TransitionHandler for CancelAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_role(ctx, ActorRole::Admin, "cancel")?;
        optional_text(&self.reason, "reason", MAX_NOTE_LEN)?;
        if order.status.is_terminal() {
            return Err(invalid("cancel", order));
        }

        let mut next = next_row(ctx, order);
        next.status = OrderStatus::Cancelled;

        Ok(Transition {
            description: match &self.reason {
                Some(reason) => format!("Order {} cancelled: {reason}", order.order_number),
                None => format!("Order {} cancelled", order.order_number),
            },
            metadata: json!({ "reason": self.reason }),
            action_type: OrderActionType::Cancelled,
            order: next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LifecycleRules;
    use crate::orders::actions::test_support::*;
    use shared::order::Actor;

    fn ctx<'a>(actor: &'a Actor, rules: &'a LifecycleRules) -> TransitionContext<'a> {
        TransitionContext { actor, rules, now: NOW }
    }

    fn reassign(new_writer: Option<(&str, &str)>) -> ReassignAction {
        ReassignAction {
            reason: "Writer unresponsive".into(),
            new_writer_id: new_writer.map(|(id, _)| id.to_string()),
            new_writer_name: new_writer.map(|(_, name)| name.to_string()),
        }
    }

    #[test]
    fn test_reassign_to_pool() {
        let (actor, rules) = (admin(), rules());
        let mut order = owned_order(OrderStatus::InProgress);
        order.started_at = Some(7);
        let t = reassign(None).apply(&ctx(&actor, &rules), &order).unwrap();

        assert_eq!(t.order.status, OrderStatus::Available);
        assert_eq!(t.order.writer_id, None);
        assert_eq!(t.order.assigned_writer, None);
        assert_eq!(t.order.started_at, None);
        assert_eq!(t.order.original_writer_id.as_deref(), Some("W1"));
        assert_eq!(t.order.reassigned_by.as_deref(), Some("A1"));
        assert_eq!(t.order.reassignment_reason.as_deref(), Some("Writer unresponsive"));
    }

    #[test]
    fn test_reassign_to_new_writer_overwrites() {
        let (actor, rules) = (admin(), rules());
        let order = owned_order(OrderStatus::Assigned);
        let t = reassign(Some(("W2", "Sam")))
            .apply(&ctx(&actor, &rules), &order)
            .unwrap();

        assert_eq!(t.order.status, OrderStatus::Assigned);
        assert_eq!(t.order.writer_id.as_deref(), Some("W2"));
        assert_eq!(t.order.assigned_writer.as_deref(), Some("Sam"));
        assert_eq!(t.order.assigned_by.as_deref(), Some("admin"));
        assert_eq!(t.order.original_writer_id.as_deref(), Some("W1"));
        assert_eq!(t.metadata["newWriterId"], "W2");
    }

    #[test]
    fn test_reassign_to_same_writer_or_without_name_fails() {
        let (actor, rules) = (admin(), rules());
        let order = owned_order(OrderStatus::Assigned);
        assert!(reassign(Some(("W1", "Jane"))).apply(&ctx(&actor, &rules), &order).is_err());

        let mut nameless = reassign(Some(("W2", "Sam")));
        nameless.new_writer_name = None;
        assert!(matches!(
            nameless.apply(&ctx(&actor, &rules), &order),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn test_reassign_only_from_owned_states() {
        let (actor, rules) = (admin(), rules());
        for status in [OrderStatus::Available, OrderStatus::Submitted, OrderStatus::Completed] {
            let order = owned_order(status);
            assert!(matches!(
                reassign(None).apply(&ctx(&actor, &rules), &order),
                Err(OrderError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_make_available_clears_writer() {
        let (actor, rules) = (admin(), rules());
        let mut order = owned_order(OrderStatus::Submitted);
        order.requires_confirmation = true;
        order.confirmed_at = Some(2);
        let t = MakeAvailableAction { reason: Some("Client extended".into()) }
            .apply(&ctx(&actor, &rules), &order)
            .unwrap();

        assert_eq!(t.order.status, OrderStatus::Available);
        assert_eq!(t.order.writer_id, None);
        assert!(!t.order.requires_confirmation);
        assert_eq!(t.order.confirmed_at, None);
        assert_eq!(t.order.made_available_at, Some(NOW));
        assert_eq!(t.order.made_available_by.as_deref(), Some("A1"));
    }

    #[test]
    fn test_terminal_orders_cannot_reopen_or_cancel() {
        let (actor, rules) = (admin(), rules());
        for status in [OrderStatus::Completed, OrderStatus::Rejected, OrderStatus::Cancelled] {
            let order = owned_order(status);
            assert!(MakeAvailableAction { reason: None }.apply(&ctx(&actor, &rules), &order).is_err());
            assert!(CancelAction { reason: None }.apply(&ctx(&actor, &rules), &order).is_err());
        }
    }

    #[test]
    fn test_cancel() {
        let (actor, rules) = (admin(), rules());
        let t = CancelAction { reason: None }
            .apply(&ctx(&actor, &rules), &owned_order(OrderStatus::InProgress))
            .unwrap();
        assert_eq!(t.order.status, OrderStatus::Cancelled);
        assert_eq!(t.action_type, OrderActionType::Cancelled);
        // ownership is kept for the record
        assert_eq!(t.order.writer_id.as_deref(), Some("W1"));
    }
}
