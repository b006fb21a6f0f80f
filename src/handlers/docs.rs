// OpenAPI document for the public API

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use utoipa::OpenApi;

use crate::{
    app::AppState,
    models::{
        password::{
            BatchPasswordParams, PasswordBatchResponse, PasswordParams, PasswordResponse,
            PasswordValidationResponse, ValidatePasswordRequest,
        },
        qr::{QrGeoRequest, QrResponse, QrTextRequest, QrUrlRequest, QrWifiRequest},
        short_url::{
            DailyVisits, RecentVisit, ShortUrlStats, ShortenRequest, ShortenResponse,
            StatsResponse,
        },
    },
    services::{password::Strength, qr::ErrorCorrection},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Toolbox Backend API",
        description = "Password generation and scoring, QR code rendering and URL shortening",
        version = "1.0.0"
    ),
    paths(
        crate::handlers::password::generate_password,
        crate::handlers::password::generate_passwords,
        crate::handlers::password::validate_password,
        crate::handlers::qr::qr_text,
        crate::handlers::qr::qr_url,
        crate::handlers::qr::qr_wifi,
        crate::handlers::qr::qr_geo,
        crate::handlers::urls::shorten_url,
        crate::handlers::urls::redirect,
        crate::handlers::urls::stats,
        crate::handlers::health::health_check,
    ),
    components(
        schemas(
            PasswordParams,
            BatchPasswordParams,
            ValidatePasswordRequest,
            PasswordResponse,
            PasswordBatchResponse,
            PasswordValidationResponse,
            Strength,
            QrTextRequest,
            QrUrlRequest,
            QrWifiRequest,
            QrGeoRequest,
            QrResponse,
            ErrorCorrection,
            ShortenRequest,
            ShortenResponse,
            StatsResponse,
            ShortUrlStats,
            DailyVisits,
            RecentVisit,
        )
    ),
    tags(
        (name = "Password", description = "Password generation and validation"),
        (name = "QR", description = "QR code rendering"),
        (name = "URL Shortener", description = "Short URLs, redirects and visit statistics"),
        (name = "Health", description = "Service health checks")
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI document, pointing `servers` at the public base URL when known
pub fn build_openapi_spec(state: &AppState) -> serde_json::Value {
    let mut spec = serde_json::to_value(ApiDoc::openapi()).unwrap_or_default();

    if let Some(base) = state.public_base_url.as_deref() {
        spec["servers"] = json!([{ "url": base, "description": "Public server" }]);
    }

    spec
}

/// Serve the OpenAPI JSON document
/// GET /api/v1/docs/openapi.json
pub async fn serve_openapi_spec(State(state): State<AppState>) -> Response {
    let spec = build_openapi_spec(&state);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::to_string(&spec).unwrap_or_default(),
    )
        .into_response()
}
