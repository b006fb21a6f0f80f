// Forgiving JSON body extractor
// Clients send loosely typed payloads: numbers as strings, flags as "yes"/"0"

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};

use crate::utils::service_error::ServiceError;
use crate::utils::validation::{lenient_bool, lenient_float, lenient_int, lenient_string};

/// Top-level fields of a JSON object body.
///
/// An absent body, a body that is not JSON, or JSON that is not an object
/// all yield an empty field map instead of a rejection.
#[derive(Debug, Clone, Default)]
pub struct JsonFields(pub Map<String, Value>);

impl JsonFields {
    pub fn from_slice(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Self(map),
            _ => Self::default(),
        }
    }

    /// Build from query-string pairs, all values as JSON strings
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        lenient_bool(self.get(key)).unwrap_or(default)
    }

    /// Integer field; `Ok(None)` when absent, an error when present but not numeric
    pub fn int(&self, key: &'static str) -> Result<Option<i64>, ServiceError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => lenient_int(Some(value))
                .map(Some)
                .ok_or_else(|| ServiceError::invalid_field(key, format!("'{}' must be an integer", key))),
        }
    }

    /// Float field; `Ok(None)` when absent, an error when present but not numeric
    pub fn float(&self, key: &'static str) -> Result<Option<f64>, ServiceError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => lenient_float(Some(value))
                .map(Some)
                .ok_or_else(|| ServiceError::invalid_field(key, format!("'{}' must be a number", key))),
        }
    }

    pub fn string(&self, key: &str) -> Option<String> {
        lenient_string(self.get(key))
    }

    /// Non-blank string field, or a 400 naming the field
    pub fn required_string(&self, key: &'static str) -> Result<String, ServiceError> {
        self.string(key)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ServiceError::invalid_field(key, format!("The '{}' field is required", key)))
    }
}

impl<S> FromRequest<S> for JsonFields
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ServiceError::bad_request(format!("Failed to read request body: {}", e)))?;

        Ok(Self::from_slice(&bytes))
    }
}
