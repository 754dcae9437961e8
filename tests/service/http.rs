//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use std::sync::Arc;

use restkit::service::{self, Service};
use restkit::store::InMemoryStore;
use restkit::testing::{assert_friendly_error, Expect};
use serde_json::{json, Value};

use crate::support;

/// Bind to port 0 and return the actual address.
async fn start_server(service: Arc<Service<InMemoryStore>>) -> String {
    let app = service::router(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn server() -> (InMemoryStore, String) {
    let (store, service) = support::service();
    let base = start_server(Arc::new(service)).await;
    (store, base)
}

#[tokio::test]
async fn health_check() {
    let (_, base) = server().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true, "resources": ["products"] }));
}

#[tokio::test]
async fn batch_methods_map_to_operations() {
    let (store, base) = server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/products/batch"))
        .json(&json!({ "items": [{ "sku": "Z" }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(store.len().unwrap(), 4);

    let resp = client
        .patch(format!("{base}/products/batch"))
        .json(&json!({ "items": [{ "id": 4, "price": 1 }, { "id": 3, "price": 1 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["items"][0]["price"], 1);
    assert_eq!(body["items"][1], Value::Null);

    let resp = client
        .put(format!("{base}/products/batch?sku=X"))
        .json(&json!({ "items": [{ "sku": "X" }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    // Only the filtered X record was replaced; Y, Z and the other shop stay.
    assert_eq!(store.len().unwrap(), 4);
}

#[tokio::test]
async fn validation_errors_are_400_with_slots() {
    let (store, base) = server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/products/batch"))
        .json(&json!({ "items": [{ "sku": "ok" }, { "price": -1 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"][0], Value::Null);
    let fields: Vec<&str> = body["errors"][1]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["sku", "price"]);
    assert_eq!(store.len().unwrap(), 3);
}

#[tokio::test]
async fn form_encoded_bodies_are_mappings() {
    let (_, base) = server().await;
    let client = reqwest::Client::new();

    // A form body is a mapping without "items".
    let resp = client
        .post(format!("{base}/products/batch"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("sku=Z")
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap();
    assert_friendly_error(status, &body, Expect::new().code(2514).field("items"));

    let resp = client
        .post(format!("{base}/products/search"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("max_price=5")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!([{ "id": 1, "sku": "X", "price": 3.0, "shop": 1 }]));
}

#[tokio::test]
async fn bulk_update_route() {
    let (_, base) = server().await;
    let client = reqwest::Client::new();

    let resp = client
        .patch(format!("{base}/products/bulk"))
        .json(&json!({ "id": 1 }))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap();
    assert_friendly_error(status, &body, Expect::new().code(2513));

    let resp = client
        .patch(format!("{base}/products/bulk?fields=id,price"))
        .json(&json!([{ "id": 1, "price": 4 }, { "id": 2, "price": 5 }]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!([{ "id": 1, "price": 4 }, { "id": 2, "price": 5 }]));
}

#[tokio::test]
async fn transport_errors() {
    let (_, base) = server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/orders/search"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "unknown resource: orders");

    let resp = client
        .post(format!("{base}/products/batch"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .delete(format!("{base}/products/batch"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);
}
