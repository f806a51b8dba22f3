//! HTTP API 集成测试
//!
//! 直接驱动 `build_app` 路由 (内存 redb + 内存目录)，不监听端口。

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use shared::order::{ItemStatus, Order, OrderStatus, PaymentStatus, SpiceLevel};
use shared::request::{BulkStatusResponse, SessionResponse};
use std::sync::Arc;
use tab_server::services::CatalogEntry;
use tab_server::{
    CatalogLookup, Config, InMemoryCatalog, OrderStorage, OrdersManager, ServerState,
    api::build_app,
};
use tower::ServiceExt;

const RESTO: &str = "resto-1";

fn test_app() -> Router {
    let catalog = InMemoryCatalog::from_entries(vec![
        CatalogEntry {
            restaurant_id: RESTO.to_string(),
            item_id: "A".to_string(),
            name: "Butter Chicken".to_string(),
            price: Decimal::from(100),
            spice_level: SpiceLevel::Medium,
        },
        CatalogEntry {
            restaurant_id: RESTO.to_string(),
            item_id: "B".to_string(),
            name: "Garlic Naan".to_string(),
            price: Decimal::from(50),
            spice_level: SpiceLevel::Mild,
        },
    ]);
    let catalog: Arc<dyn CatalogLookup> = Arc::new(catalog);

    let storage = OrderStorage::open_in_memory().unwrap();
    let orders = Arc::new(OrdersManager::with_storage(storage, catalog, 64));
    let config = Config::with_overrides("./target/http-test", 0);

    build_app(&ServerState::new(config, orders))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
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

async fn open_session(app: &Router, table: u32) -> (StatusCode, SessionResponse) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/session",
        Some(json!({ "tableNumber": table, "restaurantId": RESTO })),
    )
    .await;
    (status, serde_json::from_value(body).unwrap())
}

async fn submit(app: &Router, table: u32, session_id: &str, items: Value) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/order",
        Some(json!({
            "tableNumber": table,
            "restaurantId": RESTO,
            "sessionId": session_id,
            "items": items,
        })),
    )
    .await
}

fn order(body: Value) -> Order {
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_session_created_then_resumed() {
    let app = test_app();

    let (status, first) = open_session(&app, 5).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first.table_number, 5);

    let (status, second) = open_session(&app, 5).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second.session_id, first.session_id);
}

#[tokio::test]
async fn test_submit_creates_then_merges() {
    let app = test_app();
    let (_, session) = open_session(&app, 5).await;

    let (status, body) = submit(
        &app,
        5,
        &session.session_id,
        json!([{ "itemId": "A", "quantity": 2, "spiceLevel": "Medium" }]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created = order(body);
    assert_eq!(created.total_amount, Decimal::from(200));

    let (status, body) = submit(
        &app,
        5,
        &session.session_id,
        json!([
            { "itemId": "A", "quantity": 1, "spiceLevel": "Medium" },
            { "itemId": "B", "quantity": 1 }
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let merged = order(body);
    assert_eq!(merged.id, created.id);
    assert_eq!(merged.items.len(), 2);
    assert_eq!(merged.items[0].quantity, 3);
    assert_eq!(merged.items[1].spice_level, SpiceLevel::Mild);
    assert_eq!(merged.total_amount, Decimal::from(350));

    // Guest polling
    let (status, body) = send(&app, Method::GET, "/api/order/resto-1/5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order(body).id, created.id);
}

#[tokio::test]
async fn test_submit_rejections() {
    let app = test_app();
    let (_, session) = open_session(&app, 5).await;

    let (status, body) = submit(&app, 5, &session.session_id, json!([])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    let (status, _) = submit(
        &app,
        5,
        &session.session_id,
        json!([{ "itemId": "Z", "quantity": 1 }]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = submit(
        &app,
        5,
        "no-such-session",
        json!([{ "itemId": "A", "quantity": 1 }]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");

    // Nothing was created by the failed batches
    let (status, _) = send(&app, Method::GET, "/api/order/resto-1/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_kitchen_status_flow() {
    let app = test_app();
    let (_, session) = open_session(&app, 5).await;
    let (_, body) = submit(
        &app,
        5,
        &session.session_id,
        json!([
            { "itemId": "A", "quantity": 1 },
            { "itemId": "B", "quantity": 1 }
        ]),
    )
    .await;
    let created = order(body);
    let line_id = created.items[0].line_id.clone();

    let uri = format!("/api/orders/{}/{}", created.id, line_id);
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "status": "Completed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Completed");

    // Completed never regresses
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "status": "Pending" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Completed"));

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "status": "Cooking" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/orders/{}/no-such-line", created.id);
    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "status": "Completed" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Bulk advance touches only the line that can still move
    let uri = format!("/api/orders/{}/items/status", created.id);
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "status": "In Progress" }))).await;
    assert_eq!(status, StatusCode::OK);
    let bulk: BulkStatusResponse = serde_json::from_value(body).unwrap();
    assert_eq!(bulk.updated, 1);
    assert_eq!(bulk.order.items[0].status, ItemStatus::Completed);
    assert_eq!(bulk.order.items[1].status, ItemStatus::InProgress);

    // Kitchen queue
    let (status, body) = send(&app, Method::GET, "/api/orders/resto-1?status=Active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::GET, "/api/orders/resto-1?status=Open", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pay_closes_and_frees_table() {
    let app = test_app();
    let (_, session) = open_session(&app, 5).await;
    let (_, body) = submit(
        &app,
        5,
        &session.session_id,
        json!([{ "itemId": "A", "quantity": 1 }]),
    )
    .await;
    let created = order(body);

    let uri = format!("/api/order/pay/{}", created.id);
    let (status, body) = send(&app, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let paid = order(body);
    assert_eq!(paid.status, OrderStatus::Closed);
    assert_eq!(paid.payment_status, PaymentStatus::Paid);

    let (status, body) = send(&app, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");

    // A new guest at the same table starts a fresh session
    let (status, next) = open_session(&app, 5).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(next.session_id, session.session_id);

    let (status, _) = send(&app, Method::PUT, "/api/order/pay/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_complete_is_idempotent() {
    let app = test_app();
    let (_, session) = open_session(&app, 7).await;
    let (_, body) = submit(
        &app,
        7,
        &session.session_id,
        json!([{ "itemId": "B", "quantity": 2 }]),
    )
    .await;
    let created = order(body);

    let uri = format!("/api/order/complete/{}", created.id);
    for _ in 0..2 {
        let (status, body) = send(&app, Method::PUT, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let closed = order(body);
        assert_eq!(closed.status, OrderStatus::Closed);
        assert_eq!(closed.payment_status, PaymentStatus::Unpaid);
    }
}

#[tokio::test]
async fn test_operator_edits() {
    let app = test_app();
    let (_, session) = open_session(&app, 5).await;
    let (_, body) = submit(
        &app,
        5,
        &session.session_id,
        json!([{ "itemId": "A", "quantity": 2 }]),
    )
    .await;
    let created = order(body);
    let uri = format!("/api/order/{}", created.id);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({
            "action": "addItem",
            "item": { "itemId": "C", "name": "Lassi", "price": 30, "quantity": 1, "spiceLevel": "Mild" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let edited = order(body);
    assert_eq!(edited.items.len(), 2);
    assert_eq!(edited.total_amount, Decimal::from(230));

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "action": "removeItem", "itemId": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let edited = order(body);
    assert_eq!(edited.items.len(), 1);
    assert_eq!(edited.total_amount, Decimal::from(30));

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "action": "voidItem" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("voidItem"));

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "action": "addItem" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("item"));

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/order/missing",
        Some(json!({ "action": "bulkEdit", "items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_parcel_order() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/order/parcel",
        Some(json!({
            "restaurantId": RESTO,
            "customerName": "Asha",
            "items": [{ "itemId": "B", "quantity": 3 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let parcel = order(body);
    assert!(parcel.session_id.is_none());
    assert!(parcel.table_number.is_none());
    assert_eq!(parcel.total_amount, Decimal::from(150));

    let uri = format!("/api/order/id/{}", parcel.id);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order(body).customer_name.as_deref(), Some("Asha"));
}

#[tokio::test]
async fn test_delete_releases_table() {
    let app = test_app();
    let (_, session) = open_session(&app, 5).await;
    let (_, body) = submit(
        &app,
        5,
        &session.session_id,
        json!([{ "itemId": "A", "quantity": 1 }]),
    )
    .await;
    let created = order(body);

    let uri = format!("/api/order/{}", created.id);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], created.id.as_str());

    let (status, _) = send(&app, Method::GET, &format!("/api/order/id/{}", created.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, next) = open_session(&app, 5).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(next.session_id, session.session_id);
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let app = test_app();
    let (_, session) = open_session(&app, 5).await;

    let (status, body) = submit(
        &app,
        5,
        &session.session_id,
        json!([{ "itemId": "A", "quantity": -1 }]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/session",
        Some(json!({ "restaurantId": RESTO })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
}

#[tokio::test]
async fn test_route_segment_restaurant_ids_are_refused() {
    let app = test_app();

    for reserved in ["id", "complete", "pay", "parcel"] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/session",
            Some(json!({ "tableNumber": 5, "restaurantId": reserved })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", reserved);
        assert_eq!(body["code"], "E0002");
    }
}
