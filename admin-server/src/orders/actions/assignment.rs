//! Taking ownership of an order: pick, assign, confirm

use serde_json::json;
use shared::models::Order;
use shared::order::{ActorRole, AssignmentPriority, OrderActionType, OrderStatus};

use super::{
    MAX_NOTE_LEN, invalid, next_row, optional_text, require_assignee, require_role, require_text,
};
use crate::orders::error::OrderError;
use crate::orders::traits::{Transition, TransitionContext, TransitionHandler};

/// Writer takes an available order
#[derive(Debug, Clone)]
pub struct PickAction;

impl TransitionHandler for PickAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_role(ctx, ActorRole::Writer, "pick")?;
        if order.status != OrderStatus::Available {
            return Err(invalid("pick", order));
        }

        let mut next = next_row(ctx, order);
        next.status = OrderStatus::Assigned;
        next.writer_id = Some(ctx.actor.id.clone());
        next.assigned_writer = Some(ctx.actor.name.clone());
        next.assigned_at = Some(ctx.now);
        next.assigned_by = Some(ActorRole::Writer.as_str().into());
        next.picked_by = Some(ActorRole::Writer.as_str().into());
        next.requires_confirmation = false;
        next.confirmed_at = None;
        next.confirmed_by = None;

        Ok(Transition {
            description: format!("Order {} picked by {}", order.order_number, ctx.actor.name),
            metadata: json!({ "pages": order.pages, "writerId": ctx.actor.id }),
            action_type: OrderActionType::Picked,
            order: next,
        })
    }
}

/// Admin hands an available order to a writer
#[derive(Debug, Clone)]
pub struct AssignAction {
    pub writer_id: String,
    pub writer_name: String,
    pub requires_confirmation: bool,
    pub notes: Option<String>,
    pub priority: Option<AssignmentPriority>,
    pub deadline: Option<i64>,
}

impl TransitionHandler for AssignAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_role(ctx, ActorRole::Admin, "assign")?;
        require_text(&self.writer_id, "writerId", MAX_NOTE_LEN)?;
        require_text(&self.writer_name, "writerName", MAX_NOTE_LEN)?;
        optional_text(&self.notes, "notes", MAX_NOTE_LEN)?;
        if order.status != OrderStatus::Available {
            return Err(invalid("assign", order));
        }

        let mut next = next_row(ctx, order);
        next.status = OrderStatus::Assigned;
        next.writer_id = Some(self.writer_id.clone());
        next.assigned_writer = Some(self.writer_name.clone());
        next.assigned_at = Some(ctx.now);
        next.assigned_by = Some(ActorRole::Admin.as_str().into());
        next.picked_by = Some(ActorRole::Admin.as_str().into());
        next.requires_confirmation = self.requires_confirmation;
        next.confirmed_at = None;
        next.confirmed_by = None;
        next.assignment_notes = self.notes.clone();
        next.assignment_priority = self.priority.map(|p| p.as_str().to_string());
        next.assignment_deadline = self.deadline;

        Ok(Transition {
            description: format!(
                "Order {} assigned to {} by {}",
                order.order_number, self.writer_name, ctx.actor.name
            ),
            metadata: json!({
                "writerId": self.writer_id,
                "writerName": self.writer_name,
                "requiresConfirmation": self.requires_confirmation,
                "priority": next.assignment_priority,
                "pages": order.pages,
            }),
            action_type: OrderActionType::Assigned,
            order: next,
        })
    }
}

/// Writer accepts an assignment that asked for confirmation
#[derive(Debug, Clone)]
pub struct ConfirmAction;

impl TransitionHandler for ConfirmAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_assignee(ctx, order, "confirm")?;
        if order.status != OrderStatus::Assigned {
            return Err(invalid("confirm", order));
        }
        if !order.requires_confirmation {
            return Err(OrderError::Validation(format!(
                "Order {} does not require confirmation",
                order.order_number
            )));
        }
        if order.confirmed_at.is_some() {
            return Err(OrderError::Validation(format!(
                "Order {} is already confirmed",
                order.order_number
            )));
        }

        let mut next = next_row(ctx, order);
        next.confirmed_at = Some(ctx.now);
        next.confirmed_by = Some(ctx.actor.id.clone());

        Ok(Transition {
            description: format!("{} confirmed assignment of order {}", ctx.actor.name, order.order_number),
            metadata: json!({}),
            action_type: OrderActionType::Confirmed,
            order: next,
        })
    }
}
