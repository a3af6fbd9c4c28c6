//! Integration tests for the API server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use document_store::InMemoryDocumentStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let store = InMemoryDocumentStore::new();
    let state = api::create_default_state(store);
    api::create_app(state, get_metrics_handle())
}

fn customer_payload() -> serde_json::Value {
    serde_json::json!({
        "first_name": "Ann",
        "last_name": "Lee",
        "shipping_address": {
            "street": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "country": "USA",
            "postal_code": "62701"
        }
    })
}

fn order_payload(prices: &[i64]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = prices
        .iter()
        .map(|cents| {
            serde_json::json!({
                "product_id": uuid::Uuid::new_v4(),
                "product_name": "Widget",
                "product_price_cents": cents
            })
        })
        .collect();

    serde_json::json!({
        "customer_id": uuid::Uuid::new_v4(),
        "items": items,
        "shipping_address": {
            "street": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "country": "USA",
            "postal_code": "62701"
        }
    })
}

async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn send(app: &axum::Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let (status, json) = send(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_customer_returns_id_and_token() {
    let app = setup();

    let (status, created) = send_json(&app, "POST", "/customers", &customer_payload()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!created["id"].as_str().unwrap().is_empty());
    assert!(!created["etag"].as_str().unwrap().is_empty());
    assert_eq!(created["first_name"], "Ann");
}

#[tokio::test]
async fn test_create_and_get_customer() {
    let app = setup();

    let (_, created) = send_json(&app, "POST", "/customers", &customer_payload()).await;
    let id = created["id"].as_str().unwrap();

    let (status, view) = send(&app, "GET", &format!("/customers/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["id"], created["id"]);
    assert_eq!(view["etag"], created["etag"]);
    // Read projection flattens the shipping address
    assert_eq!(view["street"], "1 Main St");
    assert_eq!(view["postal_code"], "62701");
    assert!(view.get("shipping_address").is_none());
}

#[tokio::test]
async fn test_get_missing_customer_is_404() {
    let app = setup();
    let fake_id = uuid::Uuid::new_v4();

    let (status, _) = send(&app, "GET", &format!("/customers/{fake_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_customer_refreshes_token() {
    let app = setup();

    let (_, created) = send_json(&app, "POST", "/customers", &customer_payload()).await;
    let id = created["id"].as_str().unwrap();

    let mut update = customer_payload();
    update["last_name"] = "Smith".into();
    update["etag"] = created["etag"].clone();

    let (status, updated) = send_json(&app, "PUT", &format!("/customers/{id}"), &update).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["last_name"], "Smith");
    assert_ne!(updated["etag"], created["etag"]);
}

#[tokio::test]
async fn test_update_customer_with_stale_token_is_409() {
    let app = setup();

    let (_, created) = send_json(&app, "POST", "/customers", &customer_payload()).await;
    let id = created["id"].as_str().unwrap();

    let mut update = customer_payload();
    update["etag"] = created["etag"].clone();

    // First write wins and supersedes the token
    let (status, _) = send_json(&app, "PUT", &format!("/customers/{id}"), &update).await;
    assert_eq!(status, StatusCode::OK);

    // Second write still holds the original token
    let (status, _) = send_json(&app, "PUT", &format!("/customers/{id}"), &update).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_remove_customer_is_idempotent() {
    let app = setup();

    let (_, created) = send_json(&app, "POST", "/customers", &customer_payload()).await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/customers/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/customers/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting again is still a success
    let (status, _) = send(&app, "DELETE", &format!("/customers/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_customers() {
    let app = setup();

    send_json(&app, "POST", "/customers", &customer_payload()).await;
    send_json(&app, "POST", "/customers", &customer_payload()).await;

    let (status, list) = send(&app, "GET", "/customers").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_customer_id_format_is_400() {
    let app = setup();

    let (status, _) = send(&app, "GET", "/customers/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_order_starts_in_created_state() {
    let app = setup();

    let (status, created) = send_json(&app, "POST", "/orders", &order_payload(&[1000, 500])).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["state"], "Created");
    assert!(!created["id"].as_str().unwrap().is_empty());
    assert!(!created["etag"].as_str().unwrap().is_empty());
    assert_eq!(created["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_order_view_flattens_address_and_derives_total() {
    let app = setup();

    let (_, created) = send_json(&app, "POST", "/orders", &order_payload(&[1000, 250])).await;
    let id = created["id"].as_str().unwrap();

    let (status, view) = send(&app, "GET", &format!("/orders/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["order_total_cents"], 1250);
    assert_eq!(view["order_state"], "Created");
    assert_eq!(view["city"], "Springfield");
    assert!(view.get("items").is_none());
    assert!(view.get("shipping_address").is_none());
}

#[tokio::test]
async fn test_order_total_of_empty_order_is_zero() {
    let app = setup();

    let (_, created) = send_json(&app, "POST", "/orders", &order_payload(&[])).await;
    let id = created["id"].as_str().unwrap();

    let (_, view) = send(&app, "GET", &format!("/orders/{id}")).await;
    assert_eq!(view["order_total_cents"], 0);
}

#[tokio::test]
async fn test_ship_order() {
    let app = setup();

    let (_, created) = send_json(&app, "POST", "/orders", &order_payload(&[1000])).await;
    let id = created["id"].as_str().unwrap();

    let body = serde_json::json!({ "etag": created["etag"] });
    let (status, shipped) = send_json(&app, "PUT", &format!("/orders/{id}/ship"), &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(shipped["state"], "Shipped");
    assert_ne!(shipped["etag"], created["etag"]);
}

#[tokio::test]
async fn test_cancel_order() {
    let app = setup();

    let (_, created) = send_json(&app, "POST", "/orders", &order_payload(&[1000])).await;
    let id = created["id"].as_str().unwrap();

    let body = serde_json::json!({ "etag": created["etag"] });
    let (status, cancelled) = send_json(&app, "PUT", &format!("/orders/{id}/cancel"), &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["state"], "Cancelled");
}

#[tokio::test]
async fn test_ship_cancelled_order_is_409_despite_fresh_token() {
    let app = setup();

    let (_, created) = send_json(&app, "POST", "/orders", &order_payload(&[1000])).await;
    let id = created["id"].as_str().unwrap();

    let body = serde_json::json!({ "etag": created["etag"] });
    let (_, cancelled) = send_json(&app, "PUT", &format!("/orders/{id}/cancel"), &body).await;

    let body = serde_json::json!({ "etag": cancelled["etag"] });
    let (status, _) = send_json(&app, "PUT", &format!("/orders/{id}/ship"), &body).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_ship_with_stale_token_is_409() {
    let app = setup();

    let (_, created) = send_json(&app, "POST", "/orders", &order_payload(&[1000])).await;
    let id = created["id"].as_str().unwrap();

    // Two callers hold the same token; the first transition wins
    let body = serde_json::json!({ "etag": created["etag"] });
    let (status, _) = send_json(&app, "PUT", &format!("/orders/{id}/ship"), &body).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, "PUT", &format!("/orders/{id}/ship"), &body).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_ship_missing_order_is_404() {
    let app = setup();
    let fake_id = uuid::Uuid::new_v4();

    let body = serde_json::json!({ "etag": "whatever" });
    let (status, _) = send_json(&app, "PUT", &format!("/orders/{fake_id}/ship"), &body).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_order_is_idempotent() {
    let app = setup();

    let (_, created) = send_json(&app, "POST", "/orders", &order_payload(&[100])).await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/orders/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &format!("/orders/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_orders() {
    let app = setup();

    send_json(&app, "POST", "/orders", &order_payload(&[100])).await;
    send_json(&app, "POST", "/orders", &order_payload(&[200, 300])).await;

    let (status, list) = send(&app, "GET", "/orders").await;

    assert_eq!(status, StatusCode::OK);
    let orders = list.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    let totals: Vec<i64> = orders
        .iter()
        .map(|o| o["order_total_cents"].as_i64().unwrap())
        .collect();
    assert!(totals.contains(&100));
    assert!(totals.contains(&500));
}

#[tokio::test]
async fn test_update_order_can_change_items() {
    let app = setup();

    let (_, created) = send_json(&app, "POST", "/orders", &order_payload(&[100])).await;
    let id = created["id"].as_str().unwrap();

    let update = serde_json::json!({
        "etag": created["etag"],
        "customer_id": created["customer_id"],
        "order_date": created["order_date"],
        "items": [{
            "product_id": uuid::Uuid::new_v4(),
            "product_name": "Gadget",
            "product_price_cents": 999
        }],
        "shipping_address": created["shipping_address"],
        "state": created["state"]
    });

    let (status, updated) = send_json(&app, "PUT", &format!("/orders/{id}"), &update).await;

    assert_eq!(status, StatusCode::OK);
    assert_ne!(updated["etag"], created["etag"]);

    let (_, view) = send(&app, "GET", &format!("/orders/{id}")).await;
    assert_eq!(view["order_total_cents"], 999);
}
