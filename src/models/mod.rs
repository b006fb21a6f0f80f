pub mod password;
pub mod qr;
pub mod short_url;

// Re-export common types
pub use password::{
    BatchPasswordParams, PasswordBatchResponse, PasswordParams, PasswordResponse,
    PasswordValidationResponse, ValidatePasswordRequest,
};
pub use qr::{QrGeoRequest, QrParams, QrResponse, QrTextRequest, QrUrlRequest, QrWifiRequest};
pub use short_url::{
    DailyVisits, NewShortUrl, NewUrlVisit, RecentVisit, ShortUrl, ShortUrlStats, ShortenRequest,
    ShortenResponse, StatsResponse,
};
