//! Order notifications
//!
//! A background worker turns committed [`OrderEvent`](shared::order::OrderEvent)s
//! into notification rows for the writer involved or for the admin inbox.

mod worker;

pub use worker::{ADMIN_INBOX, NotificationWorker, notifications_for};
