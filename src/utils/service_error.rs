// Service error type shared by every handler
// Renders the {"status": "error", "message": ...} envelope
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::services::password::PasswordError;
use crate::services::qr::QrError;
use crate::services::short_code::ShortCodeError;
use crate::utils::url_validator::UrlValidationError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{message}")]
    BadRequest {
        message: String,
        field: Option<&'static str>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Gone(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    InternalError(String),
}

impl ServiceError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ServiceError::BadRequest {
            message: message.into(),
            field: None,
        }
    }

    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::BadRequest {
            message: message.into(),
            field: Some(field),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Gone(_) => StatusCode::GONE,
            ServiceError::DatabaseError(_) | ServiceError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
            ServiceError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut body = json!({ "status": "error" });
        match &self {
            ServiceError::DatabaseError(detail) => {
                // Details stay in the logs
                error!("Database error: {}", detail);
                body["message"] = json!("Internal server error");
            },
            ServiceError::BadRequest { message, field } => {
                body["message"] = json!(message);
                if let Some(field) = field {
                    body["field"] = json!(field);
                }
            },
            other => {
                if status.is_server_error() {
                    warn!("Request failed with {}: {}", status, other);
                }
                body["message"] = json!(other.to_string());
            },
        }

        (status, Json(body)).into_response()
    }
}

// Conversion from various error types
impl From<PasswordError> for ServiceError {
    fn from(error: PasswordError) -> Self {
        ServiceError::bad_request(error.to_string())
    }
}

impl From<QrError> for ServiceError {
    fn from(error: QrError) -> Self {
        match error {
            QrError::InvalidInput { field, message } => ServiceError::invalid_field(field, message),
            QrError::Render(_) => ServiceError::InternalError(error.to_string()),
        }
    }
}

impl From<UrlValidationError> for ServiceError {
    fn from(error: UrlValidationError) -> Self {
        ServiceError::invalid_field("url", error.to_string())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        let field_errors = err.field_errors();
        let mut fields: Vec<&'static str> = field_errors.keys().copied().collect();
        fields.sort_unstable();

        let messages: Vec<String> = fields
            .iter()
            .flat_map(|field| {
                field_errors[field]
                    .iter()
                    .map(|e| e.message.as_ref().unwrap_or(&e.code).to_string())
            })
            .collect();

        ServiceError::BadRequest {
            message: messages.join(", "),
            field: fields.first().copied(),
        }
    }
}

impl From<diesel::result::Error> for ServiceError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => ServiceError::NotFound("Resource not found".into()),
            _ => ServiceError::DatabaseError(error.to_string()),
        }
    }
}

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for ServiceError {
    fn from(error: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        ServiceError::DatabaseError(format!("Connection pool error: {}", error))
    }
}

impl From<ShortCodeError> for ServiceError {
    fn from(error: ShortCodeError) -> Self {
        match error {
            ShortCodeError::DatabaseError(e) => e.into(),
            ShortCodeError::MaxRetriesExceeded => {
                ServiceError::ServiceUnavailable(error.to_string())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::password::CharClass;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_envelope_with_field() {
        let response = ServiceError::invalid_field("size", "Size out of range").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Size out of range");
        assert_eq!(body["field"], "size");
    }

    #[tokio::test]
    async fn test_database_error_is_not_leaked() {
        let response =
            ServiceError::DatabaseError("relation \"x\" does not exist".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("field").is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::from(PasswordError::NoClassesEnabled).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::from(QrError::Render("too long".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::from(ShortCodeError::MaxRetriesExceeded).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServiceError::from(diesel::result::Error::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ServiceError::Gone("x".into()).status_code(), StatusCode::GONE);
    }

    #[test]
    fn test_password_error_message_names_class() {
        let error = ServiceError::from(PasswordError::ClassExhaustedByExclusion {
            class: CharClass::Digits,
        });
        assert!(error.to_string().contains("digits"));
    }
}
