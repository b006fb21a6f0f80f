// Services module for the toolbox backend
// Business logic layer for the application

pub mod password;
pub mod qr;
pub mod short_code;
pub mod short_url;

// Re-export commonly used services
pub use password::{GenerationOptions, PasswordError, PasswordGenerator, ValidationRequirements};
pub use qr::{ErrorCorrection, QrError, QrGenerator, WifiSecurity};
pub use short_code::{ShortCodeError, ShortCodeGenerator};
pub use short_url::{CreateShortUrl, ShortUrlService};
