//! Order lifecycle: number allocation, transitions and their audit trail

pub mod actions;
pub mod error;
pub mod manager;
pub mod money;
pub mod order_number;
pub mod traits;

pub use error::OrderError;
pub use manager::OrdersManager;
pub use traits::{Transition, TransitionContext, TransitionHandler};
