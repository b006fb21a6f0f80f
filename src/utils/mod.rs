// Utility modules for the toolbox backend

pub mod json_body;
pub mod secure_random;
pub mod service_error;
pub mod url_validator;
pub mod validation;

pub use json_body::JsonFields;
pub use secure_random::RandomSource;
pub use service_error::ServiceError;
pub use url_validator::{UrlValidationError, UrlValidator};
