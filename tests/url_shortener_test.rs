// URL shortener end-to-end tests
// Need a PostgreSQL database in DATABASE_URL; skipped otherwise

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use serial_test::serial;

use common::setup_database_app;

const BASE: &str = "https://sho.rt";

#[tokio::test]
#[serial]
async fn test_shorten_and_redirect() {
    let Some(app) = setup_database_app(Some(BASE)).await else {
        return;
    };

    let response = app
        .post("/api/v1/shorten")
        .json(&json!({"url": "https://example.com/landing?ref=test", "code_length": 8}))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["original_url"], "https://example.com/landing?ref=test");

    let code = body["short_code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(
        body["short_url"],
        format!("{}/api/v1/redirect/{}", BASE, code)
    );

    let response = app
        .get(&format!("/api/v1/redirect/{}", code))
        .header("user-agent", "integration-test")
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.header("location").as_deref(),
        Some("https://example.com/landing?ref=test")
    );

    let response = app.get(&format!("/api/v1/stats/{}", code)).send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await;
    let data = &body["data"];
    assert_eq!(data["total_visits"], 1);
    assert_eq!(data["is_active"], true);
    assert_eq!(data["visits_by_day"].as_array().unwrap().len(), 1);
    assert_eq!(data["visits_by_day"][0]["visits"], 1);

    let recent = data["recent_visits"].as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["visitor_ip"], "203.0.113.9");
    assert_eq!(recent[0]["user_agent"], "integration-test");
}

#[tokio::test]
#[serial]
async fn test_usage_limit_reached_is_gone() {
    let Some(app) = setup_database_app(Some(BASE)).await else {
        return;
    };

    let response = app
        .post("/api/v1/shorten")
        .json(&json!({"url": "https://example.org", "max_uses": 1}))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await;
    let code = body["short_code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);
    assert_eq!(body["max_uses"], 1);

    let first = app.get(&format!("/api/v1/redirect/{}", code)).send().await;
    assert_eq!(first.status(), StatusCode::FOUND);

    let second = app.get(&format!("/api/v1/redirect/{}", code)).send().await;
    assert_eq!(second.status(), StatusCode::GONE);

    let body: Value = second.json().await;
    assert_eq!(body["status"], "error");

    let stats: Value = app
        .get(&format!("/api/v1/stats/{}", code))
        .send()
        .await
        .json()
        .await;
    assert_eq!(stats["data"]["total_visits"], 1);
    assert_eq!(stats["data"]["is_active"], false);
}

#[tokio::test]
#[serial]
async fn test_unknown_code() {
    let Some(app) = setup_database_app(Some(BASE)).await else {
        return;
    };

    let response = app.get("/api/v1/redirect/zzzzzzzzzzzzzzzzzzzz").send().await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/api/v1/stats/zzzzzzzzzzzzzzzzzzzz").send().await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_shorten_validation() {
    let Some(app) = setup_database_app(Some(BASE)).await else {
        return;
    };

    let cases = [
        (json!({}), "url"),
        (json!({"url": "ftp://example.com"}), "url"),
        (json!({"url": "http://localhost:3000"}), "url"),
        (json!({"url": "http://10.1.2.3/admin"}), "url"),
        (json!({"url": "https://sho.rt/api/v1/redirect/abc"}), "url"),
        (json!({"url": "https://example.com", "expires_at": "2001-01-01"}), "expires_at"),
        (json!({"url": "https://example.com", "expires_at": "soon"}), "expires_at"),
        (json!({"url": "https://example.com", "max_uses": 0}), "max_uses"),
        (json!({"url": "https://example.com", "max_uses": "many"}), "max_uses"),
    ];

    for (payload, field) in cases {
        let response = app.post("/api/v1/shorten").json(&payload).send().await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", payload);

        let body: Value = response.json().await;
        assert_eq!(body["field"], field, "{}", payload);
    }
}

#[tokio::test]
#[serial]
async fn test_short_url_uses_request_host_without_public_base() {
    let Some(app) = setup_database_app(None).await else {
        return;
    };

    let response = app
        .post("/api/v1/shorten")
        .header("host", "links.test:8080")
        .json(&json!({"url": "https://example.net", "expires_at": "2099-01-01 00:00:00"}))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await;
    let code = body["short_code"].as_str().unwrap();
    assert_eq!(
        body["short_url"],
        format!("http://links.test:8080/api/v1/redirect/{}", code)
    );
    assert_eq!(body["expires_at"], "2099-01-01T00:00:00Z");
}

#[tokio::test]
#[serial]
async fn test_unparseable_forwarded_header_uses_peer_address() {
    let Some(app) = setup_database_app(Some(BASE)).await else {
        return;
    };

    let hop = "client.example.internal.proxy-chain-hop-identifier-xyz";

    let response = app
        .post("/api/v1/shorten")
        .header("x-forwarded-for", hop)
        .with_ip("192.0.2.44")
        .json(&json!({"url": "https://example.com/hops", "max_uses": 2}))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await;
    let code = body["short_code"].as_str().unwrap().to_string();

    let response = app
        .get(&format!("/api/v1/redirect/{}", code))
        .header("x-forwarded-for", &"f".repeat(200))
        .with_ip("192.0.2.45")
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let stats: Value = app
        .get(&format!("/api/v1/stats/{}", code))
        .send()
        .await
        .json()
        .await;
    let data = &stats["data"];
    assert_eq!(data["total_visits"], 1);
    assert_eq!(data["is_active"], true);

    // Every counted use has a matching visit row
    let recent = data["recent_visits"].as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["visitor_ip"], "192.0.2.45");
}
