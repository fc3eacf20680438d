//! Application state shared by every handler

use shared::error::AppError;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::Config;
use crate::db::DbService;
use crate::orders::OrdersManager;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    /// Lifecycle engine; also owns the order event channel
    pub orders: OrdersManager,
}

impl AppState {
    /// Open the database named by `config` and build the state over it
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::from_pool(db.pool, config.clone()))
    }

    pub fn from_pool(pool: SqlitePool, config: Config) -> Self {
        let orders = OrdersManager::new(
            pool.clone(),
            config.rules.clone(),
            config.event_channel_capacity,
        );
        Self {
            pool,
            config: Arc::new(config),
            orders,
        }
    }
}
