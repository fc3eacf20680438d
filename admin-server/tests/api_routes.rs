//! HTTP surface tests, driven through the router without a socket
//!
//! Run: cargo test -p admin-server --test api_routes

use admin_server::db::DbService;
use admin_server::{AppState, Config, api};
use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

async fn setup() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("api.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    let state = AppState::from_pool(db.pool, Config::default());
    (dir, api::build_app(state))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn writer(id: &str) -> Value {
    json!({ "id": id, "name": format!("Writer {id}"), "role": "writer" })
}

fn admin() -> Value {
    json!({ "id": "A1", "name": "Admin", "role": "admin" })
}

#[tokio::test]
async fn test_health() {
    let (_dir, app) = setup().await;
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_order_create_and_transitions() {
    let (_dir, app) = setup().await;

    let (status, order) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({ "title": "Market analysis", "pages": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "Available");
    let id = order["id"].as_str().unwrap().to_string();
    let number = order["orderNumber"].as_str().unwrap().to_string();

    let (status, by_number) =
        send(&app, Method::GET, &format!("/api/orders/by-number/{number}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_number["id"], id.as_str());

    let (status, picked) = send(
        &app,
        Method::POST,
        &format!("/api/orders/{id}/transitions"),
        Some(json!({ "actor": writer("W1"), "action": "pick" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(picked["status"], "Assigned");
    assert_eq!(picked["writerId"], "W1");

    // second pick loses
    let (status, err) = send(
        &app,
        Method::POST,
        &format!("/api/orders/{id}/transitions"),
        Some(json!({ "actor": writer("W2"), "action": "pick" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["code"], 4002);

    let (status, history) =
        send(&app, Method::GET, &format!("/api/order-activities/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["actionType"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, ["picked", "created"]);
}

#[tokio::test]
async fn test_order_errors() {
    let (_dir, app) = setup().await;

    let (status, err) = send(&app, Method::GET, "/api/orders/ORD-MISSING", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], 4001);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/orders/ORD-MISSING/transitions",
        Some(json!({ "actor": admin(), "action": "cancel" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/orders?status=Done", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        send(&app, Method::POST, "/api/orders", Some(json!({ "title": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_put_cannot_move_status() {
    let (_dir, app) = setup().await;
    let (_, order) =
        send(&app, Method::POST, "/api/orders", Some(json!({ "title": "Fixed status" }))).await;
    let id = order["id"].as_str().unwrap();
    let uri = format!("/api/orders/{id}");

    let (status, err) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "title": "Sneaky", "status": "Completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 2);

    let (_, stored) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(stored["status"], "Available");
    assert_eq!(stored["title"], "Fixed status");
    assert_eq!(stored["version"], 0);

    let (status, edited) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({
            "status": "Available",
            "adminMessages": [
                { "id": "M1", "sender": "admin", "message": "Priority client", "timestamp": 1 }
            ],
            "updatedBy": admin()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["adminMessages"][0]["message"], "Priority client");
    assert_eq!(edited["lastAdminEdit"]["editedBy"], "A1");
    assert_eq!(edited["lastAdminEdit"]["fields"], json!(["adminMessages"]));

    let (_, history) = send(&app, Method::GET, &format!("/api/order-activities/{id}"), None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_order_delete() {
    let (_dir, app) = setup().await;
    let (_, order) =
        send(&app, Method::POST, "/api/orders", Some(json!({ "title": "Disposable" }))).await;
    let uri = format!("/api/orders/{}", order["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_and_login() {
    let (_dir, app) = setup().await;
    let account = json!({ "name": "Grace", "email": "Grace@Example.com", "password": "s3cret-pass" });

    let (status, body) =
        send(&app, Method::POST, "/api/auth/register", Some(account.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], "grace@example.com");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, err) = send(&app, Method::POST, "/api/auth/register", Some(account)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], 3002);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "grace@example.com", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, err) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "grace@example.com", "password": "wrong-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err["code"], 1002);
}

#[tokio::test]
async fn test_pod_orders_alias() {
    let (_dir, app) = setup().await;
    let (status, pod) = send(
        &app,
        Method::POST,
        "/api/pod-orders",
        Some(json!({ "title": "Pay on delivery thesis" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pod["status"], "Available");

    let (status, listed) = send(&app, Method::GET, "/api/podOrders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], pod["id"]);
}

#[tokio::test]
async fn test_review_rating_bounds() {
    let (_dir, app) = setup().await;

    let (status, err) =
        send(&app, Method::POST, "/api/reviews", Some(json!({ "rating": 6 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 6002);

    let (status, review) = send(
        &app,
        Method::POST,
        "/api/reviews",
        Some(json!({ "rating": 5, "writerId": "W1", "comment": "Excellent" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listed) = send(&app, Method::GET, "/api/reviews?writerId=W1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["id"], review["id"]);
}

#[tokio::test]
async fn test_notification_mark_read() {
    let (_dir, app) = setup().await;
    let (status, created) = send(
        &app,
        Method::POST,
        "/api/notifications",
        Some(json!({ "userId": "W1", "title": "Welcome" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["isRead"], false);
    assert_eq!(created["type"], "info");

    let uri = format!("/api/notifications/{}/read", created["id"].as_str().unwrap());
    let (status, read) = send(&app, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["isRead"], true);
    assert!(read["readAt"].is_i64());

    let (_, unread) =
        send(&app, Method::GET, "/api/notifications?userId=W1&isRead=false", None).await;
    assert!(unread.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_withdrawal_rejects_non_positive_amount() {
    let (_dir, app) = setup().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/financial/withdrawals",
        Some(json!({ "writerId": "W1", "amount": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, withdrawal) = send(
        &app,
        Method::POST,
        "/api/financial/withdrawals",
        Some(json!({ "writerId": "W1", "amount": 1200.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(withdrawal["status"], "pending");
    assert_eq!(withdrawal["currency"], "KES");
}

#[tokio::test]
async fn test_financial_ledger_paths() {
    let (_dir, app) = setup().await;

    let cases = [
        ("/api/financial/invoices", json!({ "writerId": "W1", "amount": 1400 })),
        ("/api/financial/fines", json!({ "writerId": "W1", "amount": 50, "reason": "Late" })),
        ("/api/financial/payments", json!({ "writerId": "W1", "amount": 1400 })),
        ("/api/financial/clientPayments", json!({ "clientId": "C1", "amount": 30 })),
        ("/api/financial/platformFunds", json!({ "amount": 10000, "source": "top-up" })),
        ("/api/financial/transactionLogs", json!({ "type": "payout", "amount": 1400 })),
    ];
    for (uri, body) in cases {
        let (status, created) = send(&app, Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{uri}");
        let (status, listed) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(listed[0]["id"], created["id"], "{uri}");
    }

    let (status, _) = send(&app, Method::GET, "/api/invoices", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, err) =
        send(&app, Method::GET, "/api/financial/withdrawals/WDR-MISSING", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], 5004);
}
