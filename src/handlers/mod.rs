pub mod docs;
pub mod health;
pub mod password;
pub mod qr;
pub mod urls;

use crate::app::AppState;
use axum::{
    extract::OriginalUri,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

// Password routes
pub fn password_routes() -> Router<AppState> {
    Router::new()
        .route("/password", get(password::generate_password))
        .route("/passwords", post(password::generate_passwords))
        .route("/password/validate", post(password::validate_password))
}

// QR code routes
pub fn qr_routes() -> Router<AppState> {
    Router::new()
        .route("/qr/text", post(qr::qr_text))
        .route("/qr/url", post(qr::qr_url))
        .route("/qr/wifi", post(qr::qr_wifi))
        .route("/qr/geo", post(qr::qr_geo))
}

// URL shortener routes
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(urls::shorten_url))
        .route("/redirect/{code}", get(urls::redirect))
        .route("/stats/{code}", get(urls::stats))
}

// Health and documentation
pub fn meta_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/docs/openapi.json", get(docs::serve_openapi_spec))
}

/// 404 body for paths no route claims
pub fn route_not_found(uri: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": "Route not found",
            "uri": uri
        })),
    )
        .into_response()
}

/// Router fallback
pub async fn fallback(OriginalUri(uri): OriginalUri) -> Response {
    route_not_found(&uri.to_string())
}
