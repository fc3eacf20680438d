//! Admin review of a submission: approve, request revision, reject

use serde_json::json;
use shared::models::Order;
use shared::order::{ActorRole, FineEvent, FineKind, OrderActionType, OrderStatus, RevisionRequest};

use super::{MAX_LONG_TEXT_LEN, invalid, next_row, optional_text, require_role, require_text};
use crate::orders::error::OrderError;
use crate::orders::money;
use crate::orders::traits::{Transition, TransitionContext, TransitionHandler};

/// Stamp the admin review columns shared by all three outcomes
fn stamp_review(next: &mut Order, ctx: &TransitionContext<'_>, notes: Option<&str>) {
    next.admin_reviewed_at = Some(ctx.now);
    next.admin_reviewed_by = Some(ctx.actor.id.clone());
    if let Some(notes) = notes {
        next.admin_review_notes = Some(notes.to_string());
    }
}

#[derive(Debug, Clone)]
pub struct ApproveAction {
    pub notes: Option<String>,
}

impl TransitionHandler for ApproveAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_role(ctx, ActorRole::Admin, "approve")?;
        optional_text(&self.notes, "notes", MAX_LONG_TEXT_LEN)?;
        if order.status != OrderStatus::Submitted {
            return Err(invalid("approve", order));
        }

        let mut next = next_row(ctx, order);
        next.status = OrderStatus::Completed;
        next.completed_at = Some(ctx.now);
        stamp_review(&mut next, ctx, self.notes.as_deref());

        let writer_amount = order.writer_amount(ctx.rules.default_cpp_kes);
        Ok(Transition {
            description: format!("Order {} approved by {}", order.order_number, ctx.actor.name),
            metadata: json!({
                "writerId": order.writer_id,
                "writerAmount": writer_amount,
                "pages": order.pages,
                "revisionScore": order.revision_score,
            }),
            action_type: OrderActionType::Approved,
            order: next,
        })
    }
}

/// Send a submission back to the writer; costs revision score
#[derive(Debug, Clone)]
pub struct RequestRevisionAction {
    pub explanation: String,
    pub notes: Option<String>,
}

impl TransitionHandler for RequestRevisionAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_role(ctx, ActorRole::Admin, "request a revision on")?;
        require_text(&self.explanation, "explanation", MAX_LONG_TEXT_LEN)?;
        optional_text(&self.notes, "notes", MAX_LONG_TEXT_LEN)?;
        if order.status != OrderStatus::Submitted {
            return Err(invalid("request a revision on", order));
        }

        let score_before = order.revision_score;
        let score_after = (score_before - ctx.rules.revision_penalty.max(0)).max(0);

        let mut next = next_row(ctx, order);
        next.status = OrderStatus::RevisionRequested;
        next.revision_explanation = Some(self.explanation.clone());
        next.revision_submitted_at = None;
        next.revision_score = score_after;
        next.revision_requests.push(RevisionRequest {
            explanation: self.explanation.clone(),
            requested_at: ctx.now,
            requested_by: ctx.actor.id.clone(),
            score_after,
        });
        stamp_review(&mut next, ctx, self.notes.as_deref());

        Ok(Transition {
            description: format!(
                "Revision requested on order {} by {}",
                order.order_number, ctx.actor.name
            ),
            metadata: json!({
                "explanation": self.explanation,
                "scoreBefore": score_before,
                "scoreAfter": score_after,
                "revisionCount": order.revision_count,
            }),
            action_type: OrderActionType::RevisionRequested,
            order: next,
        })
    }
}

/// Refuse a submission; fines the assigned writer a share of the order value
#[derive(Debug, Clone)]
pub struct RejectAction {
    pub reason: String,
}

impl TransitionHandler for RejectAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_role(ctx, ActorRole::Admin, "reject")?;
        require_text(&self.reason, "reason", MAX_LONG_TEXT_LEN)?;
        if order.status != OrderStatus::Submitted {
            return Err(invalid("reject", order));
        }

        let mut next = next_row(ctx, order);
        next.status = OrderStatus::Rejected;
        stamp_review(&mut next, ctx, Some(self.reason.as_str()));

        let mut fine = 0.0;
        if order.writer_id.is_some() {
            let writer_amount = order.writer_amount(ctx.rules.default_cpp_kes);
            fine = money::percent_of(writer_amount, ctx.rules.rejection_fine_percent);
            if fine > 0.0 {
                let reason = format!("Order rejected: {}", self.reason);
                next.fine_amount = money::add(order.fine_amount, fine);
                next.fine_reason = Some(reason.clone());
                next.fine_history.push(FineEvent {
                    amount: fine,
                    reason,
                    kind: FineKind::Rejection,
                    applied_at: ctx.now,
                    applied_by: ctx.actor.id.clone(),
                });
            }
        }

        Ok(Transition {
            description: format!(
                "Order {} rejected by {}: {}",
                order.order_number, ctx.actor.name, self.reason
            ),
            metadata: json!({
                "reason": self.reason,
                "writerId": order.writer_id,
                "fineAmount": fine,
            }),
            action_type: OrderActionType::Rejected,
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

    fn revision() -> RequestRevisionAction {
        RequestRevisionAction {
            explanation: "Thesis is unclear".into(),
            notes: None,
        }
    }

    #[test]
    fn test_approve_completes() {
        let (actor, rules) = (admin(), rules());
        let action = ApproveAction { notes: Some("Great work".into()) };
        let t = action
            .apply(&ctx(&actor, &rules), &owned_order(OrderStatus::Submitted))
            .unwrap();

        assert_eq!(t.order.status, OrderStatus::Completed);
        assert_eq!(t.order.completed_at, Some(NOW));
        assert_eq!(t.order.admin_reviewed_at, Some(NOW));
        assert_eq!(t.order.admin_reviewed_by.as_deref(), Some("A1"));
        assert_eq!(t.order.admin_review_notes.as_deref(), Some("Great work"));
        // 4 pages x 350
        assert_eq!(t.metadata["writerAmount"], 1400.0);
    }

    #[test]
    fn test_approve_available_rejected() {
        let (actor, rules) = (admin(), rules());
        let err = ApproveAction { notes: None }
            .apply(&ctx(&actor, &rules), &available_order())
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidTransition { action: "approve", status: OrderStatus::Available }
        ));
    }

    #[test]
    fn test_writer_cannot_approve() {
        let (actor, rules) = (writer(), rules());
        assert!(matches!(
            ApproveAction { notes: None }.apply(&ctx(&actor, &rules), &owned_order(OrderStatus::Submitted)),
            Err(OrderError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_request_revision_decrements_score() {
        let (actor, rules) = (admin(), rules());
        let mut order = owned_order(OrderStatus::Submitted);
        order.revision_submitted_at = Some(3);
        let t = revision().apply(&ctx(&actor, &rules), &order).unwrap();

        assert_eq!(t.order.status, OrderStatus::RevisionRequested);
        assert_eq!(t.order.revision_score, 9);
        assert_eq!(t.order.revision_count, 0);
        assert_eq!(t.order.revision_submitted_at, None);
        assert_eq!(t.order.revision_explanation.as_deref(), Some("Thesis is unclear"));
        assert_eq!(t.order.revision_requests.len(), 1);
        assert_eq!(t.order.revision_requests[0].score_after, 9);
    }

    #[test]
    fn test_revision_score_never_negative() {
        let actor = admin();
        let rules = LifecycleRules {
            revision_penalty: 4,
            ..LifecycleRules::default()
        };
        let mut order = owned_order(OrderStatus::Submitted);
        for expected in [6, 2, 0, 0] {
            let t = revision().apply(&ctx(&actor, &rules), &order).unwrap();
            assert_eq!(t.order.revision_score, expected);
            order = t.order;
            order.status = OrderStatus::Submitted;
        }
    }

    #[test]
    fn test_request_revision_needs_explanation() {
        let (actor, rules) = (admin(), rules());
        let action = RequestRevisionAction {
            explanation: String::new(),
            notes: None,
        };
        assert!(matches!(
            action.apply(&ctx(&actor, &rules), &owned_order(OrderStatus::Submitted)),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn test_reject_fines_assigned_writer() {
        let (actor, rules) = (admin(), rules());
        let mut order = owned_order(OrderStatus::Submitted);
        order.fine_amount = 10.0;
        let t = RejectAction { reason: "Plagiarised".into() }
            .apply(&ctx(&actor, &rules), &order)
            .unwrap();

        assert_eq!(t.order.status, OrderStatus::Rejected);
        assert_eq!(t.order.admin_review_notes.as_deref(), Some("Plagiarised"));
        // 10% of 4 x 350
        assert_eq!(t.order.fine_amount, 150.0);
        assert_eq!(t.order.fine_history.len(), 1);
        assert_eq!(t.order.fine_history[0].kind, FineKind::Rejection);
        assert_eq!(t.order.fine_history[0].amount, 140.0);
    }

    #[test]
    fn test_reject_uses_total_price_when_set() {
        let (actor, rules) = (admin(), rules());
        let mut order = owned_order(OrderStatus::Submitted);
        order.total_price_kes = Some(2500.0);
        let t = RejectAction { reason: "Off topic".into() }
            .apply(&ctx(&actor, &rules), &order)
            .unwrap();
        assert_eq!(t.order.fine_amount, 250.0);
    }

    #[test]
    fn test_reject_without_writer_has_no_fine() {
        let (actor, rules) = (admin(), rules());
        let mut order = available_order();
        order.status = OrderStatus::Submitted;
        let t = RejectAction { reason: "Spam".into() }
            .apply(&ctx(&actor, &rules), &order)
            .unwrap();
        assert_eq!(t.order.fine_amount, 0.0);
        assert!(t.order.fine_history.is_empty());
    }
}
