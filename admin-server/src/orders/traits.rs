//! Transition handler contract

use serde_json::Value;
use shared::models::Order;
use shared::order::{Actor, OrderActionType};

use super::error::OrderError;
use crate::config::LifecycleRules;

/// Everything an action needs besides the order itself
pub struct TransitionContext<'a> {
    pub actor: &'a Actor,
    pub rules: &'a LifecycleRules,
    /// Unix millis stamped on every field the action touches
    pub now: i64,
}

/// Outcome of a legal transition, not yet persisted
#[derive(Debug, Clone)]
pub struct Transition {
    pub order: Order,
    pub action_type: OrderActionType,
    pub description: String,
    pub metadata: Value,
}

/// One lifecycle action
///
/// `apply` checks role and source status, then returns the next row. It never
/// touches storage, so a rejected action leaves nothing behind.
pub trait TransitionHandler {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError>;
}
