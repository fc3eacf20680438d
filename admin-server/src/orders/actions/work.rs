//! Writer-side progress: start, submit, resubmit after revision

use serde_json::json;
use shared::models::Order;
use shared::order::{OrderActionType, OrderStatus, UploadedFile};

use super::{MAX_LONG_TEXT_LEN, invalid, next_row, optional_text, require_assignee, require_text};
use crate::orders::error::OrderError;
use crate::orders::traits::{Transition, TransitionContext, TransitionHandler};

#[derive(Debug, Clone)]
pub struct StartAction;

impl TransitionHandler for StartAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_assignee(ctx, order, "start")?;
        if order.status != OrderStatus::Assigned {
            return Err(invalid("start", order));
        }
        if order.requires_confirmation && order.confirmed_at.is_none() {
            return Err(OrderError::Validation(format!(
                "Order {} must be confirmed before work starts",
                order.order_number
            )));
        }

        let mut next = next_row(ctx, order);
        next.status = OrderStatus::InProgress;
        next.started_at = Some(ctx.now);

        Ok(Transition {
            description: format!("{} started work on order {}", ctx.actor.name, order.order_number),
            metadata: json!({}),
            action_type: OrderActionType::Started,
            order: next,
        })
    }
}

/// Writer hands in the work for admin review
#[derive(Debug, Clone)]
pub struct SubmitAction {
    pub notes: Option<String>,
    pub files: Vec<UploadedFile>,
}

impl TransitionHandler for SubmitAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_assignee(ctx, order, "submit")?;
        optional_text(&self.notes, "notes", MAX_LONG_TEXT_LEN)?;
        if order.status != OrderStatus::InProgress {
            return Err(invalid("submit", order));
        }

        let mut next = next_row(ctx, order);
        next.status = OrderStatus::Submitted;
        next.submitted_at = Some(ctx.now);
        next.submitted_to_admin_at = Some(ctx.now);
        next.submission_notes = self.notes.clone();
        if !self.files.is_empty() {
            next.files_uploaded_at = Some(ctx.now);
            next.original_files.extend(self.files.iter().cloned());
        }

        Ok(Transition {
            description: format!(
                "{} submitted order {} for review",
                ctx.actor.name, order.order_number
            ),
            metadata: json!({ "fileCount": self.files.len(), "pages": order.pages }),
            action_type: OrderActionType::Submitted,
            order: next,
        })
    }
}

/// Writer answers a revision request
#[derive(Debug, Clone)]
pub struct ResubmitAction {
    pub notes: String,
    pub files: Vec<UploadedFile>,
}

impl TransitionHandler for ResubmitAction {
    fn apply(&self, ctx: &TransitionContext<'_>, order: &Order) -> Result<Transition, OrderError> {
        require_assignee(ctx, order, "resubmit")?;
        require_text(&self.notes, "notes", MAX_LONG_TEXT_LEN)?;
        if order.status != OrderStatus::RevisionRequested {
            return Err(invalid("resubmit", order));
        }

        let mut next = next_row(ctx, order);
        next.status = OrderStatus::Submitted;
        next.revision_submitted_at = Some(ctx.now);
        next.revision_response_notes = Some(self.notes.clone());
        next.revision_count += 1;
        if !self.files.is_empty() {
            next.files_uploaded_at = Some(ctx.now);
            next.revision_files.extend(self.files.iter().cloned());
        }

        Ok(Transition {
            description: format!(
                "{} resubmitted order {} (revision {})",
                ctx.actor.name, order.order_number, next.revision_count
            ),
            metadata: json!({
                "revisionCount": next.revision_count,
                "fileCount": self.files.len(),
            }),
            action_type: OrderActionType::RevisionSubmitted,
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

    fn file(id: &str) -> UploadedFile {
        UploadedFile {
            id: id.into(),
            filename: format!("{id}.docx"),
            original_name: None,
            size: Some(2048),
            mime_type: None,
            url: format!("https://files.example/{id}"),
            uploaded_at: NOW,
        }
    }

    #[test]
    fn test_start_moves_to_in_progress() {
        let (actor, rules) = (writer(), rules());
        let t = StartAction
            .apply(&ctx(&actor, &rules), &owned_order(OrderStatus::Assigned))
            .unwrap();
        assert_eq!(t.order.status, OrderStatus::InProgress);
        assert_eq!(t.order.started_at, Some(NOW));
    }

    #[test]
    fn test_start_waits_for_confirmation() {
        let (actor, rules) = (writer(), rules());
        let mut order = owned_order(OrderStatus::Assigned);
        order.requires_confirmation = true;
        assert!(matches!(
            StartAction.apply(&ctx(&actor, &rules), &order),
            Err(OrderError::Validation(_))
        ));

        order.confirmed_at = Some(5);
        assert!(StartAction.apply(&ctx(&actor, &rules), &order).is_ok());
    }

    #[test]
    fn test_submit_stamps_together() {
        let (actor, rules) = (writer(), rules());
        let action = SubmitAction {
            notes: Some("Final draft".into()),
            files: vec![file("f1")],
        };
        let t = action
            .apply(&ctx(&actor, &rules), &owned_order(OrderStatus::InProgress))
            .unwrap();

        assert_eq!(t.order.status, OrderStatus::Submitted);
        assert_eq!(t.order.submitted_at, Some(NOW));
        assert_eq!(t.order.submitted_to_admin_at, Some(NOW));
        assert_eq!(t.order.files_uploaded_at, Some(NOW));
        assert_eq!(t.order.submission_notes.as_deref(), Some("Final draft"));
        assert_eq!(t.order.original_files.len(), 1);
    }

    #[test]
    fn test_submit_from_assigned_is_invalid() {
        let (actor, rules) = (writer(), rules());
        let action = SubmitAction { notes: None, files: vec![] };
        let err = action
            .apply(&ctx(&actor, &rules), &owned_order(OrderStatus::Assigned))
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { action: "submit", .. }));
    }

    #[test]
    fn test_resubmit_counts_revision() {
        let (actor, rules) = (writer(), rules());
        let mut order = owned_order(OrderStatus::RevisionRequested);
        order.revision_count = 2;
        let action = ResubmitAction {
            notes: "Fixed citations".into(),
            files: vec![file("r1")],
        };
        let t = action.apply(&ctx(&actor, &rules), &order).unwrap();

        assert_eq!(t.action_type, OrderActionType::RevisionSubmitted);
        assert_eq!(t.order.status, OrderStatus::Submitted);
        assert_eq!(t.order.revision_count, 3);
        assert_eq!(t.order.revision_submitted_at, Some(NOW));
        assert_eq!(t.order.revision_response_notes.as_deref(), Some("Fixed citations"));
        assert_eq!(t.order.revision_files.len(), 1);
    }

    #[test]
    fn test_resubmit_requires_notes() {
        let (actor, rules) = (writer(), rules());
        let action = ResubmitAction { notes: "  ".into(), files: vec![] };
        assert!(matches!(
            action.apply(&ctx(&actor, &rules), &owned_order(OrderStatus::RevisionRequested)),
            Err(OrderError::Validation(_))
        ));
    }
}
