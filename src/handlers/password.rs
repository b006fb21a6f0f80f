// Password generation and validation handlers

use std::collections::HashMap;

use axum::{extract::Query, Json};
use tracing::debug;
use validator::Validate;

use crate::{
    models::password::{
        BatchPasswordParams, PasswordBatchResponse, PasswordParams, PasswordResponse,
        PasswordValidationResponse, ValidatePasswordRequest,
    },
    services::password::{self, ValidationRequirements},
    utils::{JsonFields, ServiceError},
};

// =============================================================================
// PASSWORD HANDLERS
// =============================================================================

/// Generate a single password
/// GET /api/v1/password
#[utoipa::path(
    get,
    path = "/api/v1/password",
    tag = "Password",
    operation_id = "generatePassword",
    params(
        ("length" = Option<i64>, Query, description = "Password length, 4 to 128 (default 16)"),
        ("includeUppercase" = Option<bool>, Query, description = "Default true"),
        ("includeLowercase" = Option<bool>, Query, description = "Default true"),
        ("includeNumbers" = Option<bool>, Query, description = "Default true"),
        ("includeSymbols" = Option<bool>, Query, description = "Default false"),
        ("excludeAmbiguous" = Option<bool>, Query, description = "Leave out I l 1 O 0 o"),
        ("requireEach" = Option<bool>, Query, description = "At least one char per class (default true)"),
        ("exclude" = Option<String>, Query, description = "Characters to leave out")
    ),
    responses(
        (status = 200, description = "Password generated", body = PasswordResponse),
        (status = 400, description = "Invalid length or options")
    )
)]
pub async fn generate_password(
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<PasswordResponse>, ServiceError> {
    let params = PasswordParams::from_fields(&JsonFields::from_pairs(query))?;
    params.validate()?;

    let length = params.length();
    let password = password::generate_password(length, &params.generation_options())?;
    debug!(length, "Password generated");

    Ok(Json(PasswordResponse {
        status: "success",
        password,
        length,
    }))
}

/// Generate a batch of passwords with shared options
/// POST /api/v1/passwords
#[utoipa::path(
    post,
    path = "/api/v1/passwords",
    tag = "Password",
    operation_id = "generatePasswords",
    request_body = BatchPasswordParams,
    responses(
        (status = 200, description = "Passwords generated", body = PasswordBatchResponse),
        (status = 400, description = "Invalid length, count or options")
    )
)]
pub async fn generate_passwords(
    fields: JsonFields,
) -> Result<Json<PasswordBatchResponse>, ServiceError> {
    let batch = BatchPasswordParams::from_fields(&fields)?;
    batch.check()?;

    let count = batch.count();
    let length = batch.params.length();
    let passwords =
        password::generate_passwords(count, length, &batch.params.generation_options())?;
    debug!(count, length, "Password batch generated");

    Ok(Json(PasswordBatchResponse {
        status: "success",
        count: passwords.len(),
        length,
        passwords,
    }))
}

/// Score a password against a set of requirements
/// POST /api/v1/password/validate
#[utoipa::path(
    post,
    path = "/api/v1/password/validate",
    tag = "Password",
    operation_id = "validatePassword",
    request_body = ValidatePasswordRequest,
    responses(
        (status = 200, description = "Validation report", body = PasswordValidationResponse),
        (status = 400, description = "Password missing or empty")
    )
)]
pub async fn validate_password(
    fields: JsonFields,
) -> Result<Json<PasswordValidationResponse>, ServiceError> {
    let candidate = fields
        .string("password")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ServiceError::invalid_field("password", "The 'password' field is required")
        })?;

    let requirements = fields
        .get("requirements")
        .map(ValidationRequirements::from_json)
        .unwrap_or_default();

    let result = password::validate(&candidate, &requirements);
    Ok(Json(PasswordValidationResponse::new(
        result,
        candidate.chars().count(),
    )))
}
