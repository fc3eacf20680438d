//! OrdersManager - runs lifecycle commands against storage
//!
//! Every lifecycle write follows the same path:
//!
//! ```text
//! load row → action.apply() → BEGIN
//!                               UPDATE ... WHERE id AND version AND status   (0 rows → Conflict)
//!                               INSERT order_activities                     (error → ActivityLogFailed)
//!                             COMMIT → broadcast OrderEvent
//! ```

use serde_json::{Value, json};
use shared::models::{Order, OrderActivity, OrderActivityCreate, OrderCreate, OrderUpdate};
use shared::order::{Actor, AdminEdit, OrderActionType, OrderCommand, OrderEvent, OrderStatus};
use shared::util::{now_millis, prefixed_id};
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::actions::TransitionAction;
use super::error::OrderError;
use super::order_number::generate_order_number;
use super::traits::{Transition, TransitionContext, TransitionHandler};
use crate::config::LifecycleRules;
use crate::db::repository::{activity as activity_repo, order as order_repo};

/// Insert attempts when the order number (or id) hits the UNIQUE index
const CREATE_ATTEMPTS: u32 = 5;

fn system_actor() -> Actor {
    Actor::admin("system", "System")
}

#[derive(Clone)]
pub struct OrdersManager {
    pool: SqlitePool,
    rules: Arc<LifecycleRules>,
    event_tx: broadcast::Sender<OrderEvent>,
}

impl OrdersManager {
    pub fn new(pool: SqlitePool, rules: LifecycleRules, channel_capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            pool,
            rules: Arc::new(rules),
            event_tx,
        }
    }

    /// Events of every committed order write
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    pub fn rules(&self) -> &LifecycleRules {
        &self.rules
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn get(&self, id: &str) -> Result<Order, OrderError> {
        order_repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    pub async fn get_by_number(&self, order_number: &str) -> Result<Order, OrderError> {
        order_repo::find_by_number(&self.pool, order_number)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_number.to_string()))
    }

    pub async fn list(
        &self,
        status: Option<&str>,
        writer_id: Option<&str>,
    ) -> Result<Vec<Order>, OrderError> {
        if let Some(s) = status {
            OrderStatus::from_str(s).map_err(|e| OrderError::Validation(e.to_string()))?;
        }
        Ok(order_repo::find_all(&self.pool, status, writer_id).await?)
    }

    /// Create an `Available` order with a fresh id and order number
    pub async fn create(&self, data: OrderCreate) -> Result<Order, OrderError> {
        let max_attempts = self.rules.order_number_max_attempts;
        self.create_numbered(data, |taken, now_secs| {
            let mut rng = rand::thread_rng();
            generate_order_number(taken, &mut rng, max_attempts, now_secs)
        })
        .await
    }

    /// [`create`](Self::create) with the number source supplied by the caller
    ///
    /// `next_number` gets the numbers in use and the current unix seconds. A
    /// number that still clashes on insert is retried with a fresh call.
    async fn create_numbered<F>(
        &self,
        mut data: OrderCreate,
        mut next_number: F,
    ) -> Result<Order, OrderError>
    where
        F: FnMut(&HashSet<String>, i64) -> String,
    {
        if data.title.trim().is_empty() {
            return Err(OrderError::Validation("title must not be empty".into()));
        }
        let actor = data.created_by.take().unwrap_or_else(system_actor);

        for attempt in 1..=CREATE_ATTEMPTS {
            let taken = order_repo::taken_numbers(&self.pool).await?;
            let now = now_millis();
            let order = Order::from_create(
                prefixed_id("ORD", 6),
                next_number(&taken, now / 1000),
                data.clone(),
                self.rules.initial_revision_score,
                now,
            );
            let activity = build_activity(
                &order,
                None,
                &actor,
                OrderActionType::Created,
                format!("Order {} created: {}", order.order_number, order.title),
                json!({ "pages": order.pages, "title": order.title }),
                now,
            );

            let mut tx = self.pool.begin().await?;
            match order_repo::insert(&mut tx, &order).await {
                Ok(()) => {}
                Err(e) if order_repo::is_number_clash(&e) => {
                    tracing::warn!(
                        order_number = %order.order_number,
                        attempt,
                        "Order number clash on insert, regenerating"
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
            activity_repo::insert(&mut tx, &activity)
                .await
                .map_err(|e| OrderError::ActivityLog(e.to_string()))?;
            tx.commit().await?;

            tracing::info!(order_id = %order.id, order_number = %order.order_number, "Order created");
            self.publish(&order, None, &actor, OrderActionType::Created, None);
            return Ok(order);
        }

        tracing::error!(attempts = CREATE_ATTEMPTS, "Could not allocate an order number");
        Err(OrderError::OrderNumberUnavailable)
    }

    /// Edit descriptive fields and message threads
    ///
    /// Status only moves through [`execute`](Self::execute); a `status` that
    /// differs from the stored one is rejected. Stamps `lastAdminEdit` and
    /// writes no activity.
    pub async fn update(&self, id: &str, data: OrderUpdate) -> Result<Order, OrderError> {
        let requested = data
            .status
            .as_deref()
            .map(OrderStatus::from_str)
            .transpose()
            .map_err(|e| OrderError::Validation(e.to_string()))?;
        if let Some(title) = &data.title
            && title.trim().is_empty()
        {
            return Err(OrderError::Validation("title must not be empty".into()));
        }

        let before = self.get(id).await?;
        if let Some(status) = requested
            && status != before.status
        {
            return Err(OrderError::Validation(format!(
                "status cannot be changed from {} to {status} by an edit, use POST /api/orders/{id}/transitions",
                before.status
            )));
        }

        let mut next = before.clone();
        let fields = apply_descriptive(&mut next, &data);
        if fields.is_empty() {
            return Ok(before);
        }

        let now = now_millis();
        let editor = data.updated_by.unwrap_or_else(system_actor);
        next.last_admin_edit = Some(AdminEdit {
            edited_by: editor.id,
            edited_by_name: Some(editor.name),
            edited_at: now,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        });
        next.updated_at = now;

        let saved = self.persist(&before, next, None).await?;
        tracing::info!(order_id = %saved.id, fields = ?fields, "Order edited");
        Ok(saved)
    }

    /// Hard delete. Bypasses the lifecycle and writes no activity.
    pub async fn delete(&self, id: &str) -> Result<(), OrderError> {
        if !order_repo::delete(&self.pool, id).await? {
            return Err(OrderError::NotFound(id.to_string()));
        }
        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }

    /// Append a manual activity entry to an existing order
    pub async fn record_activity(
        &self,
        data: OrderActivityCreate,
    ) -> Result<OrderActivity, OrderError> {
        for (value, field) in [
            (&data.order_id, "orderId"),
            (&data.action_type, "actionType"),
            (&data.action_by, "actionBy"),
        ] {
            if value.trim().is_empty() {
                return Err(OrderError::Validation(format!("{field} is required")));
            }
        }
        let order = self.get(&data.order_id).await?;
        let activity = OrderActivity {
            id: prefixed_id("ACT", 8),
            order_id: order.id,
            order_number: Some(order.order_number),
            action_type: data.action_type,
            action_by: data.action_by,
            action_by_name: data.action_by_name,
            action_by_role: data.action_by_role,
            old_status: data.old_status,
            new_status: data.new_status,
            description: data.description,
            metadata: data.metadata.unwrap_or_else(|| json!({})),
            created_at: now_millis(),
        };
        let mut conn = self.pool.acquire().await?;
        activity_repo::insert(&mut conn, &activity)
            .await
            .map_err(|e| OrderError::ActivityLog(e.to_string()))?;
        Ok(activity)
    }

    /// Run one lifecycle command against order `id`
    pub async fn execute(&self, id: &str, cmd: &OrderCommand) -> Result<Order, OrderError> {
        let before = self.get(id).await?;
        self.transition(before, cmd).await
    }

    async fn transition(&self, before: Order, cmd: &OrderCommand) -> Result<Order, OrderError> {
        let action = TransitionAction::from(&cmd.payload);
        let ctx = TransitionContext {
            actor: &cmd.actor,
            rules: &self.rules,
            now: now_millis(),
        };

        let Transition {
            order: next,
            action_type,
            description,
            metadata,
        } = action.apply(&ctx, &before).inspect_err(|e| {
            tracing::debug!(
                order_id = %before.id,
                action = cmd.payload.name(),
                error = %e,
                "Transition refused"
            );
        })?;

        let activity = build_activity(
            &next,
            Some(before.status),
            &cmd.actor,
            action_type,
            description,
            metadata,
            ctx.now,
        );
        let saved = self.persist(&before, next, Some(activity)).await?;

        tracing::info!(
            order_id = %saved.id,
            order_number = %saved.order_number,
            action = %action_type,
            from = %before.status,
            to = %saved.status,
            "Order transition committed"
        );
        self.publish(
            &saved,
            Some(&before),
            &cmd.actor,
            action_type,
            before.writer_id.clone(),
        );
        Ok(saved)
    }

    /// CAS-write `next` over `before` and append `activity`, atomically
    async fn persist(
        &self,
        before: &Order,
        mut next: Order,
        activity: Option<OrderActivity>,
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let saved =
            order_repo::save(&mut tx, &next, before.version, before.status.as_str()).await?;
        if !saved {
            tx.rollback().await?;
            return match order_repo::find_by_id(&self.pool, &before.id).await? {
                Some(_) => Err(OrderError::Conflict(before.id.clone())),
                None => Err(OrderError::NotFound(before.id.clone())),
            };
        }

        if let Some(activity) = &activity
            && let Err(e) = activity_repo::insert(&mut tx, activity).await
        {
            // dropping tx rolls the order update back
            return Err(OrderError::ActivityLog(e.to_string()));
        }

        tx.commit().await?;
        next.version = before.version + 1;
        Ok(next)
    }

    /// Fire-and-forget; a missing subscriber is not an error
    fn publish(
        &self,
        order: &Order,
        before: Option<&Order>,
        actor: &Actor,
        action_type: OrderActionType,
        previous_writer_id: Option<String>,
    ) {
        let event = OrderEvent {
            order_id: order.id.clone(),
            order_number: order.order_number.clone(),
            action_type,
            actor: actor.clone(),
            old_status: before.map(|b| b.status).unwrap_or(order.status),
            new_status: order.status,
            writer_id: order.writer_id.clone(),
            previous_writer_id,
            timestamp: order.updated_at,
        };
        if self.event_tx.send(event).is_err() {
            tracing::debug!(order_id = %order.id, "No event subscribers");
        }
    }
}

/// Copy every present descriptive field of `data` onto `order`, returning
/// the camelCase names of the fields it set
fn apply_descriptive(order: &mut Order, data: &OrderUpdate) -> Vec<&'static str> {
    let mut fields = Vec::new();
    macro_rules! set {
        ($($field:ident => $name:literal),* $(,)?) => {
            $(if let Some(v) = &data.$field {
                order.$field = Some(v.clone());
                fields.push($name);
            })*
        };
    }
    macro_rules! replace {
        ($($field:ident => $name:literal),* $(,)?) => {
            $(if let Some(v) = &data.$field {
                order.$field = v.clone();
                fields.push($name);
            })*
        };
    }
    replace!(
        title => "title",
        attachments => "attachments",
        reviews => "reviews",
        client_messages => "clientMessages",
        admin_messages => "adminMessages",
    );
    set!(
        description => "description",
        subject => "subject",
        discipline => "discipline",
        paper_type => "paperType",
        pages => "pages",
        words => "words",
        format => "format",
        price => "price",
        price_kes => "priceKes",
        cpp => "cpp",
        total_price_kes => "totalPriceKes",
        deadline => "deadline",
        client_id => "clientId",
        client_name => "clientName",
        client_email => "clientEmail",
        client_phone => "clientPhone",
        requirements => "requirements",
    );
    fields
}

fn build_activity(
    order: &Order,
    old_status: Option<OrderStatus>,
    actor: &Actor,
    action_type: OrderActionType,
    description: String,
    metadata: Value,
    now: i64,
) -> OrderActivity {
    OrderActivity {
        id: prefixed_id("ACT", 8),
        order_id: order.id.clone(),
        order_number: Some(order.order_number.clone()),
        action_type: action_type.as_str().to_string(),
        action_by: actor.id.clone(),
        action_by_name: Some(actor.name.clone()),
        action_by_role: Some(actor.role.as_str().to_string()),
        old_status: old_status.map(|s| s.as_str().to_string()),
        new_status: Some(order.status.as_str().to_string()),
        description: Some(description),
        metadata,
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::order::OrderCommandPayload;
    use tempfile::TempDir;

    async fn manager() -> (OrdersManager, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        (OrdersManager::new(db.pool, LifecycleRules::default(), 16), dir)
    }

    fn pick(writer: &str) -> OrderCommand {
        OrderCommand {
            actor: Actor::writer(writer, writer),
            payload: OrderCommandPayload::Pick,
        }
    }

    async fn new_order(mgr: &OrdersManager) -> Order {
        mgr.create(OrderCreate {
            title: "Lab report".into(),
            pages: Some(3),
            ..Default::default()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_stale_snapshot_conflicts() {
        let (mgr, _dir) = manager().await;
        let order = new_order(&mgr).await;
        let stale = mgr.get(&order.id).await.unwrap();

        mgr.transition(stale.clone(), &pick("W1")).await.unwrap();
        let err = mgr.transition(stale, &pick("W2")).await.unwrap_err();
        assert!(matches!(err, OrderError::Conflict(_)));

        let stored = mgr.get(&order.id).await.unwrap();
        assert_eq!(stored.writer_id.as_deref(), Some("W1"));
        assert_eq!(stored.version, 1);
        let history = activity_repo::count_by_order(&mgr.pool, &order.id).await.unwrap();
        // created + picked
        assert_eq!(history, 2);
    }

    #[tokio::test]
    async fn test_activity_failure_rolls_back_transition() {
        let (mgr, _dir) = manager().await;
        let order = new_order(&mgr).await;

        sqlx::query("DROP TABLE order_activities")
            .execute(&mgr.pool)
            .await
            .unwrap();

        let err = mgr.execute(&order.id, &pick("W1")).await.unwrap_err();
        assert!(matches!(err, OrderError::ActivityLog(_)));

        let stored = mgr.get(&order.id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Available);
        assert_eq!(stored.version, 0);
        assert_eq!(stored.writer_id, None);
    }

    #[tokio::test]
    async fn test_deleted_under_transition_is_not_found() {
        let (mgr, _dir) = manager().await;
        let order = new_order(&mgr).await;
        let snapshot = mgr.get(&order.id).await.unwrap();
        mgr.delete(&order.id).await.unwrap();

        let err = mgr.transition(snapshot, &pick("W1")).await.unwrap_err();
        assert!(matches!(err, OrderError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_retries_after_number_clash() {
        let (mgr, _dir) = manager().await;
        let existing = new_order(&mgr).await;

        let mut calls = 0;
        let created = mgr
            .create_numbered(
                OrderCreate {
                    title: "Second".into(),
                    ..Default::default()
                },
                |taken, _| {
                    calls += 1;
                    // first draw lands on a number inserted after the read
                    if calls == 1 {
                        existing.order_number.clone()
                    } else {
                        assert!(taken.contains(&existing.order_number));
                        "Z999".into()
                    }
                },
            )
            .await
            .unwrap();

        assert_eq!(calls, 2);
        assert_eq!(created.order_number, "Z999");
        let stored = mgr.get_by_number("Z999").await.unwrap();
        assert_eq!(stored.id, created.id);

        let history = activity_repo::find_by_order(&mgr.pool, &created.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action_type, "created");
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_activities")
            .fetch_one(&mgr.pool)
            .await
            .unwrap();
        assert_eq!(total, 2);

        let untouched = mgr.get(&existing.id).await.unwrap();
        assert_eq!(untouched, existing);
    }

    #[tokio::test]
    async fn test_create_gives_up_after_repeated_clashes() {
        let (mgr, _dir) = manager().await;
        let existing = new_order(&mgr).await;

        let mut calls = 0;
        let err = mgr
            .create_numbered(
                OrderCreate {
                    title: "Never stored".into(),
                    ..Default::default()
                },
                |_, _| {
                    calls += 1;
                    existing.order_number.clone()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::OrderNumberUnavailable));
        assert_eq!(calls, CREATE_ATTEMPTS);
        assert_eq!(mgr.list(None, None).await.unwrap().len(), 1);
    }

    #[test]
    fn test_apply_descriptive_leaves_lifecycle_alone() {
        let mut order = Order::from_create(
            "ORD-1".into(),
            "B200".into(),
            OrderCreate {
                title: "Old".into(),
                ..Default::default()
            },
            10,
            0,
        );
        order.writer_id = Some("W1".into());
        let update = OrderUpdate {
            title: Some("New".into()),
            pages: Some(7),
            client_name: Some("Acme".into()),
            ..Default::default()
        };
        let fields = apply_descriptive(&mut order, &update);

        assert_eq!(fields, ["title", "pages", "clientName"]);
        assert_eq!(order.title, "New");
        assert_eq!(order.pages, Some(7));
        assert_eq!(order.client_name.as_deref(), Some("Acme"));
        assert_eq!(order.writer_id.as_deref(), Some("W1"));
    }
}
