//! Status-preserving actions: fines and bids

use serde_json::json;
use shared::models::Order;
use shared::order::{ActorRole, Bid, FineEvent, FineKind, OrderActionType, OrderStatus};

use super::{MAX_NOTE_LEN, invalid, next_row, optional_text, require_role, require_text};
use crate::orders::error::OrderError;
use crate::orders::money;
use crate::orders::traits::{Transition, TransitionContext, TransitionHandler};

/// Manual fine, allowed in any status
#[derive(Debug, Clone)]
pub struct ApplyFineAction {
    pub amount: f64,
    pub reason: String,
}

impl TransitionHandler for ApplyFineAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_role(ctx, ActorRole::Admin, "fine")?;
        money::validate_positive_amount(self.amount, "amount")?;
        require_text(&self.reason, "reason", MAX_NOTE_LEN)?;

        let amount = money::to_f64(money::to_decimal(self.amount));
        let mut next = next_row(ctx, order);
        next.fine_amount = money::add(order.fine_amount, amount);
        next.fine_reason = Some(self.reason.clone());
        next.fine_history.push(FineEvent {
            amount,
            reason: self.reason.clone(),
            kind: FineKind::Manual,
            applied_at: ctx.now,
            applied_by: ctx.actor.id.clone(),
        });

        Ok(Transition {
            description: format!(
                "Fine of {amount:.2} KES applied to order {}: {}",
                order.order_number, self.reason
            ),
            metadata: json!({
                "amount": amount,
                "reason": self.reason,
                "totalFines": next.fine_amount,
                "writerId": order.writer_id,
            }),
            action_type: OrderActionType::FineApplied,
            order: next,
        })
    }
}

/// Writer bid on an available order; stored only
#[derive(Debug, Clone)]
pub struct PlaceBidAction {
    pub amount: f64,
    pub message: Option<String>,
}

impl TransitionHandler for PlaceBidAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_role(ctx, ActorRole::Writer, "bid on")?;
        money::validate_positive_amount(self.amount, "amount")?;
        optional_text(&self.message, "message", MAX_NOTE_LEN)?;
        if order.status != OrderStatus::Available {
            return Err(invalid("bid on", order));
        }

        let amount = money::to_f64(money::to_decimal(self.amount));
        let mut next = next_row(ctx, order);
        next.bids.push(Bid {
            writer_id: ctx.actor.id.clone(),
            writer_name: ctx.actor.name.clone(),
            amount,
            message: self.message.clone(),
            created_at: ctx.now,
        });

        Ok(Transition {
            description: format!(
                "{} bid {amount:.2} KES on order {}",
                ctx.actor.name, order.order_number
            ),
            metadata: json!({ "amount": amount, "bidCount": next.bids.len() }),
            action_type: OrderActionType::BidPlaced,
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

    #[test]
    fn test_fine_accumulates_in_any_status() {
        let (actor, rules) = (admin(), rules());
        let mut order = owned_order(OrderStatus::Completed);
        for _ in 0..3 {
            let t = ApplyFineAction { amount: 0.1, reason: "Late".into() }
                .apply(&ctx(&actor, &rules), &order)
                .unwrap();
            assert_eq!(t.order.status, OrderStatus::Completed);
            order = t.order;
        }
        assert_eq!(order.fine_amount, 0.3);
        assert_eq!(order.fine_history.len(), 3);
        assert_eq!(order.fine_reason.as_deref(), Some("Late"));
        assert_eq!(order.fine_history[0].kind, FineKind::Manual);
    }

    #[test]
    fn test_fine_rejects_bad_amounts() {
        let (actor, rules) = (admin(), rules());
        let order = owned_order(OrderStatus::InProgress);
        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let action = ApplyFineAction { amount, reason: "x".into() };
            assert!(matches!(
                action.apply(&ctx(&actor, &rules), &order),
                Err(OrderError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_writer_cannot_fine() {
        let (actor, rules) = (writer(), rules());
        let action = ApplyFineAction { amount: 5.0, reason: "x".into() };
        assert!(matches!(
            action.apply(&ctx(&actor, &rules), &available_order()),
            Err(OrderError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_bid_appends_and_keeps_status() {
        let (actor, rules) = (writer(), rules());
        let action = PlaceBidAction { amount: 1500.0, message: Some("Can do in 2 days".into()) };
        let t = action.apply(&ctx(&actor, &rules), &available_order()).unwrap();

        assert_eq!(t.order.status, OrderStatus::Available);
        assert_eq!(t.order.bids.len(), 1);
        assert_eq!(t.order.bids[0].writer_id, "W1");
        assert_eq!(t.order.bids[0].amount, 1500.0);
        assert_eq!(t.action_type, OrderActionType::BidPlaced);
    }

    #[test]
    fn test_bid_only_on_available() {
        let (actor, rules) = (writer(), rules());
        let action = PlaceBidAction { amount: 10.0, message: None };
        assert!(matches!(
            action.apply(&ctx(&actor, &rules), &owned_order(OrderStatus::Assigned)),
            Err(OrderError::InvalidTransition { .. })
        ));
    }
}
