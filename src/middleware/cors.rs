use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{self, HeaderValue},
        Method, Request, StatusCode,
    },
    middleware::Next,
    response::Response,
};
use tracing::debug;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";

/// Value for `Access-Control-Allow-Origin`.
///
/// A `*` entry in the allow-list answers every request with `*`; otherwise the
/// request origin is echoed back only when it is listed.
fn allowed_origin(allowed_origins: &[String], request_origin: Option<&str>) -> Option<HeaderValue> {
    if allowed_origins.iter().any(|o| o == "*") {
        return Some(HeaderValue::from_static("*"));
    }

    let origin = request_origin?;
    if allowed_origins.iter().any(|o| o == origin) {
        debug!("CORS: Origin allowed from whitelist: {}", origin);
        HeaderValue::from_str(origin).ok()
    } else {
        debug!("CORS: Origin not in whitelist: {}", origin);
        None
    }
}

fn apply_cors_headers(response: &mut Response, origin: Option<HeaderValue>) {
    let headers = response.headers_mut();
    if let Some(origin) = origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}

/// CORS middleware: decorates every response and short-circuits preflight
/// `OPTIONS` requests with 204.
pub async fn cors_middleware(
    State(allowed_origins): State<Arc<Vec<String>>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = allowed_origin(
        &allowed_origins,
        req.headers()
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok()),
    );

    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(&mut response, origin);
        return response;
    }

    let mut response = next.run(req).await;
    apply_cors_headers(&mut response, origin);
    response
}
