// Cross-cutting router behaviour: CORS, fallback, docs, health

mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::setup_offline_app;

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = setup_offline_app();

    let response = app.get("/api/v1/nope?x=1").send().await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response.json().await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Route not found");
    assert_eq!(body["uri"], "/api/v1/nope?x=1");
}

#[tokio::test]
async fn test_invalid_short_code_is_unknown_route() {
    let app = setup_offline_app();

    // Rejected before any database access
    for uri in ["/api/v1/redirect/bad.code", "/api/v1/stats/a%20b"] {
        let response = app.get(uri).send().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);

        let body: Value = response.json().await;
        assert_eq!(body["message"], "Route not found");
    }
}

#[tokio::test]
async fn test_cors_headers_on_every_response() {
    let app = setup_offline_app();

    let response = app.get("/api/v1/password").send().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("*")
    );
    assert_eq!(
        response.header("access-control-allow-methods").as_deref(),
        Some("GET, POST, OPTIONS")
    );
    assert_eq!(
        response.header("access-control-allow-headers").as_deref(),
        Some("Content-Type, Authorization, X-Requested-With")
    );

    let response = app.get("/missing").send().await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.header("access-control-allow-origin").is_some());
}

#[tokio::test]
async fn test_preflight_is_no_content() {
    let app = setup_offline_app();

    let response = app
        .options("/api/v1/passwords")
        .header("origin", "https://app.example.com")
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("*")
    );
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = setup_offline_app();

    let response = app.get("/api/v1/docs/openapi.json").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await;
    let paths = body["paths"].as_object().unwrap();
    for path in [
        "/api/v1/password",
        "/api/v1/passwords",
        "/api/v1/password/validate",
        "/api/v1/qr/text",
        "/api/v1/qr/wifi",
        "/api/v1/shorten",
        "/api/v1/redirect/{code}",
        "/api/v1/stats/{code}",
        "/api/v1/health",
    ] {
        assert!(paths.contains_key(path), "missing {}", path);
    }
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let app = setup_offline_app();

    let response = app.get("/api/v1/health").send().await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json().await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["postgresql"]["status"], "unhealthy");
}
