// Password generation and validation API tests

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::setup_offline_app;

const SYMBOLS: &str = "!@#$%^&*()-_=+[]{}|;:,.<>?";

#[tokio::test]
async fn test_generate_password_defaults() {
    let app = setup_offline_app();

    let response = app.get("/api/v1/password").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["length"], 16);

    let password = body["password"].as_str().unwrap();
    assert_eq!(password.chars().count(), 16);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(password.chars().any(|c| c.is_ascii_uppercase()));
    assert!(password.chars().any(|c| c.is_ascii_lowercase()));
    assert!(password.chars().any(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_generate_password_query_options() {
    let app = setup_offline_app();

    let response = app
        .get("/api/v1/password?length=40&includeSymbols=true&includeUppercase=0&excludeAmbiguous=yes")
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await;
    let password = body["password"].as_str().unwrap();
    assert_eq!(password.len(), 40);
    assert!(!password.chars().any(|c| c.is_ascii_uppercase()));
    assert!(password.chars().any(|c| SYMBOLS.contains(c)));
    assert!(!password.chars().any(|c| "Il1O0o".contains(c)));
}

#[tokio::test]
async fn test_generate_password_length_bounds() {
    let app = setup_offline_app();

    for length in ["3", "129", "-1"] {
        let response = app
            .get(&format!("/api/v1/password?length={}", length))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "length {}", length);

        let body: Value = response.json().await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["field"], "length");
    }

    for length in [4, 128] {
        let response = app
            .get(&format!("/api/v1/password?length={}", length))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await;
        assert_eq!(body["length"], length);
    }
}

#[tokio::test]
async fn test_generate_password_non_numeric_length() {
    let app = setup_offline_app();

    let response = app.get("/api/v1/password?length=long").send().await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await;
    assert_eq!(body["field"], "length");
}

#[tokio::test]
async fn test_generate_password_no_classes() {
    let app = setup_offline_app();

    let response = app
        .get("/api/v1/password?includeUppercase=false&includeLowercase=false&includeNumbers=false")
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn test_generate_password_exhausted_class() {
    let app = setup_offline_app();

    let response = app
        .get("/api/v1/password?includeUppercase=false&includeLowercase=false&exclude=0123456789")
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await;
    assert!(body["message"].as_str().unwrap().contains("digits"));
}

#[tokio::test]
async fn test_generate_batch() {
    let app = setup_offline_app();

    let response = app
        .post("/api/v1/passwords")
        .json(&json!({"count": 7, "length": 12, "includeSymbols": true}))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["count"], 7);
    assert_eq!(body["length"], 12);

    let passwords = body["passwords"].as_array().unwrap();
    assert_eq!(passwords.len(), 7);
    for password in passwords {
        assert_eq!(password.as_str().unwrap().chars().count(), 12);
    }
}

#[tokio::test]
async fn test_generate_batch_defaults_without_body() {
    let app = setup_offline_app();

    let response = app.post("/api/v1/passwords").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await;
    assert_eq!(body["count"], 5);
    assert_eq!(body["length"], 16);

    // Malformed JSON is treated like an empty object
    let response = app
        .post("/api/v1/passwords")
        .raw_body("{not json")
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_generate_batch_count_bounds() {
    let app = setup_offline_app();

    for count in [0, 51] {
        let response = app
            .post("/api/v1/passwords")
            .json(&json!({ "count": count }))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = response.json().await;
        assert_eq!(body["field"], "count");
    }

    let response = app
        .post("/api/v1/passwords")
        .json(&json!({"count": "50", "length": 4}))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_validate_password_defaults() {
    let app = setup_offline_app();

    let response = app
        .post("/api/v1/password/validate")
        .json(&json!({"password": "Abcdef12"}))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["valid"], true);
    assert_eq!(body["score"], 100);
    assert_eq!(body["password_length"], 8);
    assert_eq!(body["checks"]["minLength"]["passed"], true);
    assert!(body["checks"].get("requireUppercase").is_none());
}

#[tokio::test]
async fn test_validate_password_requirements() {
    let app = setup_offline_app();

    let response = app
        .post("/api/v1/password/validate")
        .json(&json!({
            "password": "abc",
            "requirements": {"requireUppercase": true}
        }))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["score"], 0);
    assert_eq!(body["strength"], "very_weak");
    assert_eq!(body["checks"]["minLength"]["passed"], false);
    assert_eq!(body["checks"]["requireUppercase"]["passed"], false);
}

#[tokio::test]
async fn test_validate_password_missing() {
    let app = setup_offline_app();

    for payload in [json!({}), json!({"password": ""})] {
        let response = app
            .post("/api/v1/password/validate")
            .json(&payload)
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = response.json().await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["field"], "password");
    }
}
