// QR code API request/response models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::services::qr::{ErrorCorrection, QrGenerator, QrImage, DEFAULT_SIZE};
use crate::utils::{JsonFields, ServiceError};

/// Rendering options shared by every QR endpoint
#[derive(Debug, Clone, Copy, Validate)]
pub struct QrParams {
    #[validate(range(
        min = 100,
        max = 1000,
        message = "Size must be between 100 and 1000 pixels"
    ))]
    pub size: i64,
    pub level: ErrorCorrection,
}

impl QrParams {
    pub fn from_fields(fields: &JsonFields) -> Result<Self, ServiceError> {
        Ok(Self {
            size: fields.int("size")?.unwrap_or(i64::from(DEFAULT_SIZE)),
            level: ErrorCorrection::parse_or_default(fields.string("level").as_deref()),
        })
    }

    /// Validate the options and build a generator for them
    pub fn generator(&self) -> Result<QrGenerator, ServiceError> {
        self.validate()?;
        let size = u32::try_from(self.size)
            .map_err(|_| ServiceError::invalid_field("size", "Size is out of range"))?;
        Ok(QrGenerator::new(size, self.level)?)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({"content": "Hello, world", "size": 300, "level": "M"}))]
pub struct QrTextRequest {
    pub content: String,
    pub size: Option<u32>,
    /// L, M, Q or H
    pub level: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({"url": "https://example.com", "size": 300, "level": "H"}))]
pub struct QrUrlRequest {
    pub url: String,
    pub size: Option<u32>,
    pub level: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({"ssid": "Home", "password": "s3cret", "type": "WPA2"}))]
pub struct QrWifiRequest {
    pub ssid: String,
    pub password: Option<String>,
    /// WPA (default), WPA2, WEP or nopass
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub size: Option<u32>,
    pub level: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({"lat": 48.8584, "lng": 2.2945}))]
pub struct QrGeoRequest {
    pub lat: f64,
    pub lng: f64,
    pub size: Option<u32>,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QrResponse {
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "text")]
    pub kind: &'static str,
    pub content: String,
    pub size: u32,
    pub level: ErrorCorrection,
    pub image_base64: String,
    pub data_uri: String,
}

impl QrResponse {
    pub fn new(
        kind: &'static str,
        content: String,
        generator: &QrGenerator,
        image: QrImage,
    ) -> Self {
        Self {
            status: "success",
            kind,
            content,
            size: generator.size(),
            level: generator.level(),
            data_uri: image.data_uri(),
            image_base64: image.png_base64,
        }
    }
}
