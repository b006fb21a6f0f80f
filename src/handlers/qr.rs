// QR code handlers
// Each endpoint validates its payload, renders a PNG and returns it base64 encoded

use axum::Json;

use crate::{
    models::qr::{QrGeoRequest, QrParams, QrResponse, QrTextRequest, QrUrlRequest, QrWifiRequest},
    services::qr::WifiSecurity,
    utils::{JsonFields, ServiceError},
};

/// POST /api/v1/qr/text
#[utoipa::path(
    post,
    path = "/api/v1/qr/text",
    tag = "QR",
    operation_id = "qrText",
    request_body = QrTextRequest,
    responses(
        (status = 200, description = "QR code rendered", body = QrResponse),
        (status = 400, description = "Empty text or size out of range"),
        (status = 500, description = "Content too long to encode")
    )
)]
pub async fn qr_text(fields: JsonFields) -> Result<Json<QrResponse>, ServiceError> {
    let generator = QrParams::from_fields(&fields)?.generator()?;
    let content = fields.string("content").unwrap_or_default();

    let image = generator.from_text(&content)?;
    Ok(Json(QrResponse::new("text", content, &generator, image)))
}

/// POST /api/v1/qr/url
#[utoipa::path(
    post,
    path = "/api/v1/qr/url",
    tag = "QR",
    operation_id = "qrUrl",
    request_body = QrUrlRequest,
    responses(
        (status = 200, description = "QR code rendered", body = QrResponse),
        (status = 400, description = "Missing or malformed URL"),
        (status = 500, description = "Content too long to encode")
    )
)]
pub async fn qr_url(fields: JsonFields) -> Result<Json<QrResponse>, ServiceError> {
    let generator = QrParams::from_fields(&fields)?.generator()?;
    let url = fields.required_string("url")?.trim().to_string();

    let image = generator.from_url(&url)?;
    Ok(Json(QrResponse::new("url", url, &generator, image)))
}

/// POST /api/v1/qr/wifi
#[utoipa::path(
    post,
    path = "/api/v1/qr/wifi",
    tag = "QR",
    operation_id = "qrWifi",
    request_body = QrWifiRequest,
    responses(
        (status = 200, description = "QR code rendered", body = QrResponse),
        (status = 400, description = "Missing SSID or unknown security type"),
        (status = 500, description = "Content too long to encode")
    )
)]
pub async fn qr_wifi(fields: JsonFields) -> Result<Json<QrResponse>, ServiceError> {
    let generator = QrParams::from_fields(&fields)?.generator()?;
    let ssid = fields.required_string("ssid")?;
    let password = fields.string("password").unwrap_or_default();
    let security: WifiSecurity = match fields.string("type") {
        Some(kind) => kind.parse()?,
        None => WifiSecurity::Wpa,
    };

    let image = generator.from_wifi(&ssid, &password, security)?;
    Ok(Json(QrResponse::new(
        "wifi",
        format!("SSID: {}", ssid),
        &generator,
        image,
    )))
}

/// POST /api/v1/qr/geo
#[utoipa::path(
    post,
    path = "/api/v1/qr/geo",
    tag = "QR",
    operation_id = "qrGeo",
    request_body = QrGeoRequest,
    responses(
        (status = 200, description = "QR code rendered", body = QrResponse),
        (status = 400, description = "Coordinates missing or out of range")
    )
)]
pub async fn qr_geo(fields: JsonFields) -> Result<Json<QrResponse>, ServiceError> {
    let generator = QrParams::from_fields(&fields)?.generator()?;
    let (lat, lng) = match (fields.float("lat")?, fields.float("lng")?) {
        (Some(lat), Some(lng)) => (lat, lng),
        (None, _) => {
            return Err(ServiceError::invalid_field(
                "lat",
                "Both 'lat' and 'lng' are required",
            ))
        },
        (_, None) => {
            return Err(ServiceError::invalid_field(
                "lng",
                "Both 'lat' and 'lng' are required",
            ))
        },
    };

    let image = generator.from_geo(lat, lng)?;
    Ok(Json(QrResponse::new(
        "geo",
        format!("lat:{}, lng:{}", lat, lng),
        &generator,
        image,
    )))
}
