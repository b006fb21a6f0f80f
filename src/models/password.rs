// Password API request/response models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::services::password::{Check, GenerationOptions, Strength, ValidationResult};
use crate::utils::{JsonFields, ServiceError};

pub const DEFAULT_LENGTH: i64 = 16;
pub const DEFAULT_COUNT: i64 = 5;

// =============================================================================
// REQUEST DTOs
// =============================================================================

/// Options for generating passwords
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "length": 20,
    "includeUppercase": true,
    "includeLowercase": true,
    "includeNumbers": true,
    "includeSymbols": true,
    "excludeAmbiguous": true,
    "requireEach": true,
    "exclude": "{}"
}))]
pub struct PasswordParams {
    #[validate(range(
        min = 4,
        max = 128,
        message = "The 'length' parameter must be between 4 and 128"
    ))]
    pub length: i64,
    pub include_uppercase: bool,
    pub include_lowercase: bool,
    pub include_numbers: bool,
    pub include_symbols: bool,
    pub exclude_ambiguous: bool,
    pub require_each: bool,
    /// Characters that must never appear
    pub exclude: String,
}

impl PasswordParams {
    /// Read the generation options from loosely typed fields, applying defaults
    pub fn from_fields(fields: &JsonFields) -> Result<Self, ServiceError> {
        Ok(Self {
            length: fields.int("length")?.unwrap_or(DEFAULT_LENGTH),
            include_uppercase: fields.flag("includeUppercase", true),
            include_lowercase: fields.flag("includeLowercase", true),
            include_numbers: fields.flag("includeNumbers", true),
            include_symbols: fields.flag("includeSymbols", false),
            exclude_ambiguous: fields.flag("excludeAmbiguous", false),
            require_each: fields.flag("requireEach", true),
            exclude: fields.string("exclude").unwrap_or_default(),
        })
    }

    /// Requested length; only meaningful after `validate()` succeeded
    pub fn length(&self) -> usize {
        usize::try_from(self.length).unwrap_or_default()
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            use_upper: self.include_uppercase,
            use_lower: self.include_lowercase,
            use_digits: self.include_numbers,
            use_symbols: self.include_symbols,
            avoid_ambiguous: self.exclude_ambiguous,
            exclude: Default::default(),
            require_each_class: self.require_each,
        }
        .with_exclude(&self.exclude)
    }
}

/// Batch generation request: the generation options plus a count
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BatchPasswordParams {
    #[validate(range(
        min = 1,
        max = 50,
        message = "The 'count' parameter must be between 1 and 50"
    ))]
    pub count: i64,
    #[serde(flatten)]
    #[validate]
    pub params: PasswordParams,
}

impl BatchPasswordParams {
    pub fn from_fields(fields: &JsonFields) -> Result<Self, ServiceError> {
        Ok(Self {
            count: fields.int("count")?.unwrap_or(DEFAULT_COUNT),
            params: PasswordParams::from_fields(fields)?,
        })
    }

    /// Validate length before count so the first reported problem is the length
    pub fn check(&self) -> Result<(), ServiceError> {
        self.params.validate()?;
        self.validate()?;
        Ok(())
    }

    pub fn count(&self) -> usize {
        usize::try_from(self.count).unwrap_or_default()
    }
}

/// Password validation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "password": "Tr0ub4dor&3",
    "requirements": {
        "minLength": 10,
        "requireUppercase": true,
        "requireSymbols": true
    }
}))]
pub struct ValidatePasswordRequest {
    pub password: String,
    /// `minLength`, `maxLength`, `requireUppercase`, `requireLowercase`,
    /// `requireNumbers`, `requireSymbols`
    #[schema(value_type = Object)]
    pub requirements: Option<serde_json::Value>,
}

// =============================================================================
// RESPONSE DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PasswordResponse {
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    pub password: String,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PasswordBatchResponse {
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    pub count: usize,
    pub length: usize,
    pub passwords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PasswordValidationResponse {
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    pub valid: bool,
    pub score: u8,
    pub strength: Strength,
    /// Rule name to `{required, actual, passed}`
    #[schema(value_type = Object)]
    pub checks: BTreeMap<String, Check>,
    pub password_length: usize,
}

impl PasswordValidationResponse {
    pub fn new(result: ValidationResult, password_length: usize) -> Self {
        Self {
            status: "success",
            valid: result.valid,
            score: result.score,
            strength: result.strength,
            checks: result.checks,
            password_length,
        }
    }
}
