//! Order Model

use crate::order::{
    AdminEdit, Bid, FineEvent, OrderMessage, OrderReview, OrderStatus, RevisionRequest,
    UploadedFile,
};
use serde::{Deserialize, Serialize};

/// Order record
///
/// Lifecycle columns are only ever written by the lifecycle engine; the
/// descriptive columns may also change through [`OrderUpdate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Four-character human-facing code (`A123`), unique for the system lifetime
    pub order_number: String,

    // ── Descriptive ────────────────────────────────────────────────
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub discipline: Option<String>,
    pub paper_type: Option<String>,
    pub pages: Option<i64>,
    pub words: Option<i64>,
    pub format: Option<String>,
    pub price: Option<f64>,
    pub price_kes: Option<f64>,
    /// Cost per page paid to the writer (KES)
    pub cpp: Option<f64>,
    pub total_price_kes: Option<f64>,
    pub deadline: Option<i64>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub requirements: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub attachments: Vec<UploadedFile>,

    // ── Lifecycle ──────────────────────────────────────────────────
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: OrderStatus,
    pub writer_id: Option<String>,
    pub assigned_writer: Option<String>,
    pub assigned_at: Option<i64>,
    /// `writer` or `admin`
    pub assigned_by: Option<String>,
    pub picked_by: Option<String>,
    pub requires_confirmation: bool,
    pub confirmed_at: Option<i64>,
    pub confirmed_by: Option<String>,
    pub assignment_notes: Option<String>,
    pub assignment_priority: Option<String>,
    pub assignment_deadline: Option<i64>,
    pub started_at: Option<i64>,
    pub submitted_at: Option<i64>,
    pub submitted_to_admin_at: Option<i64>,
    pub submission_notes: Option<String>,
    pub files_uploaded_at: Option<i64>,
    pub completed_at: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub original_files: Vec<UploadedFile>,

    // ── Revision ───────────────────────────────────────────────────
    #[cfg_attr(feature = "db", sqlx(json))]
    pub revision_files: Vec<UploadedFile>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub revision_requests: Vec<RevisionRequest>,
    pub revision_explanation: Option<String>,
    pub revision_score: i32,
    pub revision_count: i32,
    pub revision_submitted_at: Option<i64>,
    pub revision_response_notes: Option<String>,

    // ── Admin review / reassignment ────────────────────────────────
    pub admin_review_notes: Option<String>,
    pub admin_reviewed_at: Option<i64>,
    pub admin_reviewed_by: Option<String>,
    pub reassignment_reason: Option<String>,
    pub reassigned_at: Option<i64>,
    pub reassigned_by: Option<String>,
    pub original_writer_id: Option<String>,
    pub made_available_at: Option<i64>,
    pub made_available_by: Option<String>,

    // ── Fines and bids ─────────────────────────────────────────────
    pub fine_amount: f64,
    pub fine_reason: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub fine_history: Vec<FineEvent>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub bids: Vec<Bid>,

    // ── Threads and feedback ───────────────────────────────────────
    #[cfg_attr(feature = "db", sqlx(json))]
    pub reviews: Vec<OrderReview>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub client_messages: Vec<OrderMessage>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub admin_messages: Vec<OrderMessage>,
    /// Set by every descriptive edit, never by lifecycle actions
    #[cfg_attr(feature = "db", sqlx(json(nullable)))]
    pub last_admin_edit: Option<AdminEdit>,

    /// Bumped by every lifecycle write; used for compare-and-swap
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Build a fresh `Available` order from a create payload
    pub fn from_create(
        id: String,
        order_number: String,
        data: OrderCreate,
        revision_score: i32,
        now: i64,
    ) -> Self {
        Self {
            id,
            order_number,
            title: data.title,
            description: data.description,
            subject: data.subject,
            discipline: data.discipline,
            paper_type: data.paper_type,
            pages: data.pages,
            words: data.words,
            format: data.format,
            price: data.price,
            price_kes: data.price_kes,
            cpp: data.cpp,
            total_price_kes: data.total_price_kes,
            deadline: data.deadline,
            client_id: data.client_id,
            client_name: data.client_name,
            client_email: data.client_email,
            client_phone: data.client_phone,
            requirements: data.requirements,
            attachments: data.attachments,
            status: OrderStatus::Available,
            writer_id: None,
            assigned_writer: None,
            assigned_at: None,
            assigned_by: None,
            picked_by: None,
            requires_confirmation: false,
            confirmed_at: None,
            confirmed_by: None,
            assignment_notes: None,
            assignment_priority: None,
            assignment_deadline: None,
            started_at: None,
            submitted_at: None,
            submitted_to_admin_at: None,
            submission_notes: None,
            files_uploaded_at: None,
            completed_at: None,
            original_files: Vec::new(),
            revision_files: Vec::new(),
            revision_requests: Vec::new(),
            revision_explanation: None,
            revision_score,
            revision_count: 0,
            revision_submitted_at: None,
            revision_response_notes: None,
            admin_review_notes: None,
            admin_reviewed_at: None,
            admin_reviewed_by: None,
            reassignment_reason: None,
            reassigned_at: None,
            reassigned_by: None,
            original_writer_id: None,
            made_available_at: None,
            made_available_by: None,
            fine_amount: 0.0,
            fine_reason: None,
            fine_history: Vec::new(),
            bids: Vec::new(),
            reviews: data.reviews,
            client_messages: data.client_messages,
            admin_messages: data.admin_messages,
            last_admin_edit: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Amount the writer earns for this order (KES)
    ///
    /// `totalPriceKes` when set, otherwise pages × cost-per-page.
    pub fn writer_amount(&self, default_cpp: f64) -> f64 {
        if let Some(total) = self.total_price_kes {
            return total;
        }
        let pages = self.pages.unwrap_or(0) as f64;
        pages * self.cpp.unwrap_or(default_cpp)
    }
}

/// Create order payload
///
/// Status and lifecycle fields are not accepted: a new order is always
/// `Available`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderCreate {
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub discipline: Option<String>,
    pub paper_type: Option<String>,
    pub pages: Option<i64>,
    pub words: Option<i64>,
    pub format: Option<String>,
    pub price: Option<f64>,
    pub price_kes: Option<f64>,
    pub cpp: Option<f64>,
    pub total_price_kes: Option<f64>,
    pub deadline: Option<i64>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub requirements: Option<String>,
    pub attachments: Vec<UploadedFile>,
    pub reviews: Vec<OrderReview>,
    pub client_messages: Vec<OrderMessage>,
    pub admin_messages: Vec<OrderMessage>,
    /// Who created the order, recorded on the `created` activity
    pub created_by: Option<crate::order::Actor>,
}

/// Update order payload
///
/// Only descriptive fields and message threads. `status` is accepted so
/// clients can echo a full record back, but it must equal the stored status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub discipline: Option<String>,
    pub paper_type: Option<String>,
    pub pages: Option<i64>,
    pub words: Option<i64>,
    pub format: Option<String>,
    pub price: Option<f64>,
    pub price_kes: Option<f64>,
    pub cpp: Option<f64>,
    pub total_price_kes: Option<f64>,
    pub deadline: Option<i64>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub requirements: Option<String>,
    pub attachments: Option<Vec<UploadedFile>>,
    pub reviews: Option<Vec<OrderReview>>,
    pub client_messages: Option<Vec<OrderMessage>>,
    pub admin_messages: Option<Vec<OrderMessage>>,
    /// Raw status name; validated against the closed status set
    pub status: Option<String>,
    /// Recorded as the editor in `lastAdminEdit`
    pub updated_by: Option<crate::order::Actor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        let data = OrderCreate {
            title: "Essay".into(),
            pages: Some(4),
            ..Default::default()
        };
        Order::from_create("ORD-1".into(), "A001".into(), data, 10, 0)
    }

    #[test]
    fn test_writer_amount() {
        let mut o = order();
        assert_eq!(o.writer_amount(350.0), 1400.0);

        o.cpp = Some(400.0);
        assert_eq!(o.writer_amount(350.0), 1600.0);

        o.total_price_kes = Some(2000.0);
        assert_eq!(o.writer_amount(350.0), 2000.0);
    }

    #[test]
    fn test_serializes_camel_case_with_display_status() {
        let mut o = order();
        o.status = OrderStatus::RevisionRequested;
        let json = serde_json::to_value(&o).unwrap();
        assert_eq!(json["orderNumber"], "A001");
        assert_eq!(json["status"], "Revision Requested");
        assert_eq!(json["revisionScore"], 10);
        assert!(json["fineHistory"].as_array().unwrap().is_empty());
        assert!(json["clientMessages"].as_array().unwrap().is_empty());
        assert!(json["lastAdminEdit"].is_null());
    }

    #[test]
    fn test_create_payload_carries_threads() {
        let data: OrderCreate = serde_json::from_value(serde_json::json!({
            "title": "Case study",
            "clientMessages": [
                {"id": "M1", "sender": "client", "message": "Harvard style", "timestamp": 10}
            ],
            "reviews": [{"id": "R1", "rating": 5, "createdAt": 11}]
        }))
        .unwrap();
        let o = Order::from_create("ORD-2".into(), "B002".into(), data, 10, 0);
        assert_eq!(o.client_messages[0].message, "Harvard style");
        assert_eq!(o.reviews[0].rating, 5);
        assert!(o.admin_messages.is_empty());
        assert!(o.last_admin_edit.is_none());
    }
}
