//! Order domain vocabulary
//!
//! Status set, actor identity, typed sub-records, lifecycle commands and the
//! events published after a transition commits.

pub mod command;
pub mod event;
pub mod status;
pub mod types;

pub use command::{OrderCommand, OrderCommandPayload};
pub use event::{OrderActionType, OrderEvent};
pub use status::{OrderStatus, UnknownStatus};
pub use types::{
    Actor, ActorRole, AdminEdit, AssignmentPriority, Bid, FineEvent, FineKind, MessageSender,
    OrderMessage, OrderReview, RevisionRequest, UploadedFile,
};
