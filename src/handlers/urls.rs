// URL shortener handlers: shorten, redirect, stats

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{info, warn};
use url::Url;

use crate::{
    app::AppState,
    middleware::ClientIp,
    models::short_url::{ShortenRequest, ShortenResponse, StatsResponse},
    services::{
        short_code::is_valid_code,
        short_url::{CreateShortUrl, ShortUrlService},
    },
    utils::{JsonFields, ServiceError},
};

use super::route_not_found;

/// Base that short URLs are built on: the configured public URL, or else the
/// request Host over plain http.
fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = state.public_base_url.as_deref() {
        return base.to_string();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("localhost");
    format!("http://{}", host)
}

// =============================================================================
// SHORTENER HANDLERS
// =============================================================================

/// Create a short URL
/// POST /api/v1/shorten
#[utoipa::path(
    post,
    path = "/api/v1/shorten",
    tag = "URL Shortener",
    operation_id = "shortenUrl",
    request_body = ShortenRequest,
    responses(
        (status = 201, description = "Short URL created", body = ShortenResponse),
        (status = 400, description = "Invalid URL, expiry or usage limit"),
        (status = 503, description = "No free short code could be found")
    )
)]
pub async fn shorten_url(
    State(state): State<AppState>,
    client_ip: ClientIp,
    headers: HeaderMap,
    fields: JsonFields,
) -> Result<(StatusCode, Json<ShortenResponse>), ServiceError> {
    let base = base_url(&state, &headers);
    let own_host = Url::parse(&base)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));

    let url = fields.required_string("url")?;
    let expires_at = fields.string("expires_at");
    let request = CreateShortUrl::parse(
        &url,
        expires_at.as_deref(),
        fields.int("max_uses")?,
        fields.int("code_length")?,
        own_host.as_deref(),
        Utc::now(),
    )?
    .with_creator_ip(client_ip.to_string());

    let short_url = ShortUrlService::new(&state).create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            status: "success",
            short_url: format!("{}/api/v1/redirect/{}", base, short_url.short_code),
            short_code: short_url.short_code,
            original_url: short_url.original_url,
            expires_at: short_url.expires_at,
            max_uses: short_url.max_uses,
            created_at: short_url.created_at,
        }),
    ))
}

/// Follow a short URL
/// GET /api/v1/redirect/{code}
#[utoipa::path(
    get,
    path = "/api/v1/redirect/{code}",
    tag = "URL Shortener",
    operation_id = "redirect",
    params(("code" = String, Path, description = "Short code")),
    responses(
        (status = 302, description = "Redirect to the original URL"),
        (status = 404, description = "Unknown short code"),
        (status = 410, description = "Expired or usage limit reached")
    )
)]
pub async fn redirect(
    State(state): State<AppState>,
    client_ip: ClientIp,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Response {
    if !is_valid_code(&code) {
        return route_not_found(&format!("/api/v1/redirect/{}", code));
    }

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    match ShortUrlService::new(&state)
        .process_redirect(&code, &client_ip.to_string(), user_agent)
        .await
    {
        Ok(destination) => {
            info!("Redirecting {} to {}", code, destination);
            (StatusCode::FOUND, [(header::LOCATION, destination)]).into_response()
        },
        Err(e) => {
            warn!("Redirect for {} failed: {}", code, e);
            e.into_response()
        },
    }
}

/// Visit statistics of a short URL
/// GET /api/v1/stats/{code}
#[utoipa::path(
    get,
    path = "/api/v1/stats/{code}",
    tag = "URL Shortener",
    operation_id = "shortUrlStats",
    params(("code" = String, Path, description = "Short code")),
    responses(
        (status = 200, description = "Statistics", body = StatsResponse),
        (status = 404, description = "Unknown short code")
    )
)]
pub async fn stats(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    if !is_valid_code(&code) {
        return route_not_found(&format!("/api/v1/stats/{}", code));
    }

    match ShortUrlService::new(&state).get_stats(&code).await {
        Ok(data) => Json(StatsResponse {
            status: "success",
            data,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}
