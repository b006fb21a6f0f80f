// QR code generation service
// Validates the payload for each QR flavour and renders it as a base64 PNG

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;
use utoipa::ToSchema;

pub const MIN_SIZE: u32 = 100;
pub const MAX_SIZE: u32 = 1000;
pub const DEFAULT_SIZE: u32 = 300;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QrError {
    #[error("{message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    #[error("Failed to render QR code: {0}")]
    Render(String),
}

impl QrError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        QrError::InvalidInput {
            field,
            message: message.into(),
        }
    }
}

/// Error correction level, lowest to highest redundancy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

impl ErrorCorrection {
    /// Parse a level case-insensitively, falling back to `M` for anything unknown
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    fn ec_level(self) -> EcLevel {
        match self {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(ErrorCorrection::L),
            "M" => Ok(ErrorCorrection::M),
            "Q" => Ok(ErrorCorrection::Q),
            "H" => Ok(ErrorCorrection::H),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            ErrorCorrection::L => "L",
            ErrorCorrection::M => "M",
            ErrorCorrection::Q => "Q",
            ErrorCorrection::H => "H",
        };
        f.write_str(level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiSecurity {
    Wpa,
    Wpa2,
    Wep,
    NoPass,
}

impl WifiSecurity {
    fn as_str(self) -> &'static str {
        match self {
            WifiSecurity::Wpa => "WPA",
            WifiSecurity::Wpa2 => "WPA2",
            WifiSecurity::Wep => "WEP",
            WifiSecurity::NoPass => "nopass",
        }
    }
}

impl FromStr for WifiSecurity {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wpa" => Ok(WifiSecurity::Wpa),
            "wpa2" => Ok(WifiSecurity::Wpa2),
            "wep" => Ok(WifiSecurity::Wep),
            "nopass" => Ok(WifiSecurity::NoPass),
            _ => Err(QrError::invalid(
                "type",
                "Invalid WiFi type. Use one of: WPA, WPA2, WEP, nopass",
            )),
        }
    }
}

/// A rendered QR image
#[derive(Debug, Clone)]
pub struct QrImage {
    pub payload: String,
    pub png_base64: String,
}

impl QrImage {
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.png_base64)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QrGenerator {
    size: u32,
    level: ErrorCorrection,
}

impl Default for QrGenerator {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            level: ErrorCorrection::M,
        }
    }
}

impl QrGenerator {
    /// Create a generator rendering `size` x `size` pixel images
    pub fn new(size: u32, level: ErrorCorrection) -> Result<Self, QrError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(QrError::invalid(
                "size",
                format!("Size must be between {} and {} pixels", MIN_SIZE, MAX_SIZE),
            ));
        }
        Ok(Self { size, level })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn level(&self) -> ErrorCorrection {
        self.level
    }

    pub fn from_text(&self, text: &str) -> Result<QrImage, QrError> {
        if text.trim().is_empty() {
            return Err(QrError::invalid("content", "Text cannot be empty"));
        }
        self.render(text.to_string())
    }

    pub fn from_url(&self, url: &str) -> Result<QrImage, QrError> {
        let parsed = Url::parse(url.trim())
            .map_err(|_| QrError::invalid("url", "URL is not in a valid format"))?;
        if !parsed.has_host() {
            return Err(QrError::invalid("url", "URL is not in a valid format"));
        }
        self.render(url.trim().to_string())
    }

    pub fn from_wifi(
        &self,
        ssid: &str,
        password: &str,
        security: WifiSecurity,
    ) -> Result<QrImage, QrError> {
        if ssid.trim().is_empty() {
            return Err(QrError::invalid("ssid", "SSID cannot be empty"));
        }
        self.render(wifi_payload(ssid, password, security))
    }

    pub fn from_geo(&self, lat: f64, lng: f64) -> Result<QrImage, QrError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(QrError::invalid(
                "lat",
                "Invalid latitude. Must be between -90 and 90",
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(QrError::invalid(
                "lng",
                "Invalid longitude. Must be between -180 and 180",
            ));
        }
        self.render(format!("geo:{},{}", lat, lng))
    }

    #[instrument(skip(self, payload), fields(size = self.size, level = %self.level))]
    fn render(&self, payload: String) -> Result<QrImage, QrError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.level.ec_level())
            .map_err(|e| QrError::Render(e.to_string()))?;

        let image = code
            .render::<Luma<u8>>()
            .min_dimensions(self.size, self.size)
            .build();

        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(image)
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| QrError::Render(e.to_string()))?;

        let png = png.into_inner();
        debug!(bytes = png.len(), "QR code rendered");

        Ok(QrImage {
            payload,
            png_base64: BASE64.encode(png),
        })
    }
}

/// Escape the characters that are structural in the WIFI: payload
fn escape_wifi_field(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ';' | ',' | ':' | '"') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn wifi_payload(ssid: &str, password: &str, security: WifiSecurity) -> String {
    format!(
        "WIFI:T:{};S:{};P:{};;",
        security.as_str(),
        escape_wifi_field(ssid),
        escape_wifi_field(password)
    )
}
