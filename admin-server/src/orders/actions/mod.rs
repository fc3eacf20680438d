//! Lifecycle action implementations
//!
//! Each action implements [`TransitionHandler`] for one command type.

use shared::models::Order;
use shared::order::{ActorRole, OrderCommandPayload};

use crate::orders::error::OrderError;
use crate::orders::traits::{Transition, TransitionContext, TransitionHandler};

mod assignment;
mod charges;
mod reassignment;
mod review;
mod work;

pub use assignment::{AssignAction, ConfirmAction, PickAction};
pub use charges::{ApplyFineAction, PlaceBidAction};
pub use reassignment::{CancelAction, MakeAvailableAction, ReassignAction};
pub use review::{ApproveAction, RejectAction, RequestRevisionAction};
pub use work::{ResubmitAction, StartAction, SubmitAction};

/// TransitionAction enum - dispatches to concrete action implementations
#[derive(Debug, Clone)]
pub enum TransitionAction {
    Pick(PickAction),
    Assign(AssignAction),
    Confirm(ConfirmAction),
    Start(StartAction),
    Submit(SubmitAction),
    Approve(ApproveAction),
    RequestRevision(RequestRevisionAction),
    Resubmit(ResubmitAction),
    Reject(RejectAction),
    Reassign(ReassignAction),
    MakeAvailable(MakeAvailableAction),
    ApplyFine(ApplyFineAction),
    PlaceBid(PlaceBidAction),
    Cancel(CancelAction),
}

impl TransitionHandler for TransitionAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        match self {
            TransitionAction::Pick(action) => action.apply(ctx, order),
            TransitionAction::Assign(action) => action.apply(ctx, order),
            TransitionAction::Confirm(action) => action.apply(ctx, order),
            TransitionAction::Start(action) => action.apply(ctx, order),
            TransitionAction::Submit(action) => action.apply(ctx, order),
            TransitionAction::Approve(action) => action.apply(ctx, order),
            TransitionAction::RequestRevision(action) => action.apply(ctx, order),
            TransitionAction::Resubmit(action) => action.apply(ctx, order),
            TransitionAction::Reject(action) => action.apply(ctx, order),
            TransitionAction::Reassign(action) => action.apply(ctx, order),
            TransitionAction::MakeAvailable(action) => action.apply(ctx, order),
            TransitionAction::ApplyFine(action) => action.apply(ctx, order),
            TransitionAction::PlaceBid(action) => action.apply(ctx, order),
            TransitionAction::Cancel(action) => action.apply(ctx, order),
        }
    }
}

/// Convert a command payload into its action.
///
/// This is the ONLY place with a match on OrderCommandPayload.
impl From<&OrderCommandPayload> for TransitionAction {
    fn from(payload: &OrderCommandPayload) -> Self {
        match payload {
            OrderCommandPayload::Pick => TransitionAction::Pick(PickAction),
            OrderCommandPayload::Assign {
                writer_id,
                writer_name,
                requires_confirmation,
                notes,
                priority,
                deadline,
            } => TransitionAction::Assign(AssignAction {
                writer_id: writer_id.clone(),
                writer_name: writer_name.clone(),
                requires_confirmation: *requires_confirmation,
                notes: notes.clone(),
                priority: *priority,
                deadline: *deadline,
            }),
            OrderCommandPayload::Confirm => TransitionAction::Confirm(ConfirmAction),
            OrderCommandPayload::Start => TransitionAction::Start(StartAction),
            OrderCommandPayload::Submit { notes, files } => TransitionAction::Submit(SubmitAction {
                notes: notes.clone(),
                files: files.clone(),
            }),
            OrderCommandPayload::Approve { notes } => {
                TransitionAction::Approve(ApproveAction { notes: notes.clone() })
            }
            OrderCommandPayload::RequestRevision { explanation, notes } => {
                TransitionAction::RequestRevision(RequestRevisionAction {
                    explanation: explanation.clone(),
                    notes: notes.clone(),
                })
            }
            OrderCommandPayload::Resubmit { notes, files } => {
                TransitionAction::Resubmit(ResubmitAction {
                    notes: notes.clone(),
                    files: files.clone(),
                })
            }
            OrderCommandPayload::Reject { reason } => TransitionAction::Reject(RejectAction {
                reason: reason.clone(),
            }),
            OrderCommandPayload::Reassign {
                reason,
                new_writer_id,
                new_writer_name,
            } => TransitionAction::Reassign(ReassignAction {
                reason: reason.clone(),
                new_writer_id: new_writer_id.clone(),
                new_writer_name: new_writer_name.clone(),
            }),
            OrderCommandPayload::MakeAvailable { reason } => {
                TransitionAction::MakeAvailable(MakeAvailableAction {
                    reason: reason.clone(),
                })
            }
            OrderCommandPayload::ApplyFine { amount, reason } => {
                TransitionAction::ApplyFine(ApplyFineAction {
                    amount: *amount,
                    reason: reason.clone(),
                })
            }
            OrderCommandPayload::PlaceBid { amount, message } => {
                TransitionAction::PlaceBid(PlaceBidAction {
                    amount: *amount,
                    message: message.clone(),
                })
            }
            OrderCommandPayload::Cancel { reason } => TransitionAction::Cancel(CancelAction {
                reason: reason.clone(),
            }),
        }
    }
}

// ── Guards shared by the actions ────────────────────────────────────

const MAX_NOTE_LEN: usize = crate::utils::validation::MAX_NOTE_LEN;
const MAX_LONG_TEXT_LEN: usize = crate::utils::validation::MAX_LONG_TEXT_LEN;

fn require_role(
    ctx: &TransitionContext<'_>,
    role: ActorRole,
    action: &'static str,
) -> Result<(), OrderError> {
    if ctx.actor.role != role {
        return Err(OrderError::PermissionDenied(format!(
            "Only {role}s can {action} an order"
        )));
    }
    Ok(())
}

/// Writer actions on an owned order: the actor must be the assigned writer
fn require_assignee(
    ctx: &TransitionContext<'_>,
    order: &Order,
    action: &'static str,
) -> Result<(), OrderError> {
    require_role(ctx, ActorRole::Writer, action)?;
    if order.writer_id.as_deref() != Some(ctx.actor.id.as_str()) {
        return Err(OrderError::PermissionDenied(format!(
            "Writer {} is not assigned to order {}",
            ctx.actor.id, order.order_number
        )));
    }
    Ok(())
}

fn invalid(action: &'static str, order: &Order) -> OrderError {
    OrderError::InvalidTransition {
        action,
        status: order.status,
    }
}

fn require_text(value: &str, field: &str, max_len: usize) -> Result<(), OrderError> {
    if value.trim().is_empty() {
        return Err(OrderError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(OrderError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

fn optional_text(value: &Option<String>, field: &str, max_len: usize) -> Result<(), OrderError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(OrderError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Copy of `order` with `updated_at` bumped, ready for the action to edit
fn next_row(ctx: &TransitionContext<'_>, order: &Order) -> Order {
    let mut next = order.clone();
    next.updated_at = ctx.now;
    next
}

/// Drop every field describing the current assignment
fn clear_assignment(order: &mut Order) {
    order.writer_id = None;
    order.assigned_writer = None;
    order.assigned_at = None;
    order.assigned_by = None;
    order.picked_by = None;
    clear_assignment_terms(order);
}

/// Drop confirmation, assignment terms and start time, keeping the writer
fn clear_assignment_terms(order: &mut Order) {
    order.requires_confirmation = false;
    order.confirmed_at = None;
    order.confirmed_by = None;
    order.assignment_notes = None;
    order.assignment_priority = None;
    order.assignment_deadline = None;
    order.started_at = None;
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::LifecycleRules;
    use shared::models::{Order, OrderCreate};
    use shared::order::{Actor, OrderStatus};

    pub const NOW: i64 = 1_700_000_000_000;

    pub fn admin() -> Actor {
        Actor::admin("A1", "Admin")
    }

    pub fn writer() -> Actor {
        Actor::writer("W1", "Jane")
    }

    pub fn rules() -> LifecycleRules {
        LifecycleRules::default()
    }

    pub fn available_order() -> Order {
        let data = OrderCreate {
            title: "Essay on tides".into(),
            pages: Some(4),
            ..Default::default()
        };
        Order::from_create("ORD-ABC123".into(), "A123".into(), data, 10, 0)
    }

    /// Order owned by writer `W1` in `status`
    pub fn owned_order(status: OrderStatus) -> Order {
        let mut order = available_order();
        order.status = status;
        order.writer_id = Some("W1".into());
        order.assigned_writer = Some("Jane".into());
        order.assigned_at = Some(1);
        order.assigned_by = Some("writer".into());
        order.picked_by = Some("writer".into());
        order
    }
}
