//! End-to-end test: a real storefront server on an ephemeral port, driven
//! over HTTP. Storage is in-memory, so no external infrastructure is needed.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use storefront::{build_server, Storage, Storefront};

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind failed")
        .local_addr()
        .expect("addr failed")
        .port()
}

/// Wait until `url` answers at all, retrying every `interval` for up to
/// `timeout` total. Panics if the service never comes up.
async fn wait_for_http(url: &str, timeout: Duration, interval: Duration) {
    let client = Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .unwrap();
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if tokio::time::Instant::now() > deadline {
            panic!("storefront did not become ready within {:?}", timeout);
        }
        if client.get(url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(interval).await;
    }
}

async fn start_storefront() -> String {
    let port = free_port();
    let storefront = Storefront::open(Storage::in_memory(), "guest");
    let server =
        build_server(storefront, "127.0.0.1", port).expect("Failed to bind the storefront");
    tokio::spawn(server);

    let app_url = format!("http://127.0.0.1:{}", port);
    wait_for_http(
        &format!("{}/categories", app_url),
        Duration::from_secs(10),
        Duration::from_millis(200),
    )
    .await;
    app_url
}

#[tokio::test]
async fn test_browse_fill_basket_and_check_out() {
    let app_url = start_storefront().await;
    let http = Client::new();

    // ── 1. Seeded catalog ────────────────────────────────────────────────────
    let articles: Vec<Value> = http
        .get(format!("{}/articles", app_url))
        .send()
        .await
        .expect("GET /articles failed")
        .json()
        .await
        .expect("articles body");
    assert_eq!(articles.len(), 6);
    assert_eq!(articles[0]["name"], "T-shirt basique blanc");
    assert_eq!(articles[0]["price"], "19.99");

    // ── 2. Fill the basket ───────────────────────────────────────────────────
    for _ in 0..2 {
        let resp = http
            .post(format!("{}/basket/items", app_url))
            .json(&json!({ "article_id": 1, "size": "M" }))
            .send()
            .await
            .expect("POST /basket/items failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let basket: Value = http
        .get(format!("{}/basket", app_url))
        .send()
        .await
        .expect("GET /basket failed")
        .json()
        .await
        .expect("basket body");
    assert_eq!(basket["item_count"], 2);
    assert_eq!(basket["total"], "39.98");
    assert_eq!(basket["items"].as_array().map(Vec::len), Some(1));

    // ── 3. Check out ─────────────────────────────────────────────────────────
    let resp = http
        .post(format!("{}/orders", app_url))
        .send()
        .await
        .expect("POST /orders failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("order body");
    assert_eq!(order["total"], "39.98");
    assert_eq!(order["lines"][0]["qty"], 2);
    assert!(order["order_id"]
        .as_str()
        .is_some_and(|id| id.parse::<i64>().is_ok()));

    let orders: Vec<Value> = http
        .get(format!("{}/orders", app_url))
        .send()
        .await
        .expect("GET /orders failed")
        .json()
        .await
        .expect("orders body");
    assert_eq!(orders.len(), 1);

    let basket: Value = http
        .get(format!("{}/basket", app_url))
        .send()
        .await
        .expect("GET /basket failed")
        .json()
        .await
        .expect("basket body");
    assert_eq!(basket["item_count"], 0);

    // ── 4. A second checkout has nothing to order ────────────────────────────
    let resp = http
        .post(format!("{}/orders", app_url))
        .send()
        .await
        .expect("POST /orders failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_category_in_use_cannot_be_deleted() {
    let app_url = start_storefront().await;
    let http = Client::new();

    let resp = http
        .delete(format!("{}/categories/2", app_url))
        .send()
        .await
        .expect("DELETE /categories/2 failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    for id in [3, 4] {
        let resp = http
            .delete(format!("{}/articles/{}", app_url, id))
            .send()
            .await
            .expect("DELETE /articles failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let categories: Vec<Value> = http
        .delete(format!("{}/categories/2", app_url))
        .send()
        .await
        .expect("DELETE /categories/2 failed")
        .json()
        .await
        .expect("categories body");
    assert_eq!(categories.len(), 2);
    assert!(categories.iter().all(|c| c["id"] != 2));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app_url = start_storefront().await;

    let doc: Value = Client::new()
        .get(format!("{}/api-docs/openapi.json", app_url))
        .send()
        .await
        .expect("GET openapi.json failed")
        .json()
        .await
        .expect("openapi body");
    assert!(doc["paths"]["/basket/items"].is_object());
    assert!(doc["paths"]["/categories/{id}"].is_object());
}
