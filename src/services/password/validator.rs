// Password validation against configurable requirements plus an entropy-based strength label

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::utils::validation::{lenient_bool, lenient_int};

pub const DEFAULT_MIN_LENGTH: usize = 8;
pub const DEFAULT_MAX_LENGTH: usize = 128;

// Alphabet sizes used by the strength estimate
const LOWER_SPACE: u32 = 26;
const UPPER_SPACE: u32 = 26;
const DIGIT_SPACE: u32 = 10;
const SYMBOL_SPACE: u32 = 32;

// =============================================================================
// REQUIREMENTS
// =============================================================================

/// Rules a candidate password is checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequirements {
    pub min_length: usize,
    pub max_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_numbers: bool,
    pub require_symbols: bool,
}

impl Default for ValidationRequirements {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            require_uppercase: false,
            require_lowercase: false,
            require_numbers: false,
            require_symbols: false,
        }
    }
}

impl ValidationRequirements {
    /// Build requirements from a loosely typed JSON object.
    ///
    /// Any field that is missing or cannot be read keeps its default, so this
    /// never fails. A non-object value yields the defaults.
    pub fn from_json(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(fields) = value.as_object() else {
            return defaults;
        };

        let length_field = |key: &str, default: usize| {
            lenient_int(fields.get(key))
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(default)
        };
        let flag_field =
            |key: &str, default: bool| lenient_bool(fields.get(key)).unwrap_or(default);

        Self {
            min_length: length_field("minLength", defaults.min_length),
            max_length: length_field("maxLength", defaults.max_length),
            require_uppercase: flag_field("requireUppercase", defaults.require_uppercase),
            require_lowercase: flag_field("requireLowercase", defaults.require_lowercase),
            require_numbers: flag_field("requireNumbers", defaults.require_numbers),
            require_symbols: flag_field("requireSymbols", defaults.require_symbols),
        }
    }
}

// =============================================================================
// RESULT TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl Strength {
    /// Map an entropy estimate in bits to a label (upper bounds are exclusive)
    pub fn from_bits(bits: f64) -> Self {
        if bits < 28.0 {
            Strength::VeryWeak
        } else if bits < 36.0 {
            Strength::Weak
        } else if bits < 60.0 {
            Strength::Moderate
        } else if bits < 120.0 {
            Strength::Strong
        } else {
            Strength::VeryStrong
        }
    }
}

/// Expected or observed value of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CheckValue {
    Count(usize),
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub required: CheckValue,
    pub actual: CheckValue,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub score: u8,
    pub strength: Strength,
    pub checks: BTreeMap<String, Check>,
}

// =============================================================================
// VALIDATION
// =============================================================================

fn has_upper(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase())
}

fn has_lower(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
}

fn has_digit(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_digit())
}

fn has_symbol(password: &str) -> bool {
    password.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// Score `password` against `requirements`. Never fails.
pub fn validate(password: &str, requirements: &ValidationRequirements) -> ValidationResult {
    let length = password.chars().count();
    let mut checks = BTreeMap::new();
    let mut passed = 0u32;
    let mut total = 0u32;

    let mut record = |name: &str, check: Check| {
        total += 1;
        if check.passed {
            passed += 1;
        }
        checks.insert(name.to_string(), check);
    };

    let min_ok = length >= requirements.min_length;
    record(
        "minLength",
        Check {
            required: CheckValue::Count(requirements.min_length),
            actual: CheckValue::Count(length),
            passed: min_ok,
        },
    );

    // Only reported when exceeded, and then always a failure
    if length > requirements.max_length {
        record(
            "maxLength",
            Check {
                required: CheckValue::Count(requirements.max_length),
                actual: CheckValue::Count(length),
                passed: false,
            },
        );
    }

    let class_rules: [(&str, bool, fn(&str) -> bool); 4] = [
        ("requireUppercase", requirements.require_uppercase, has_upper),
        ("requireLowercase", requirements.require_lowercase, has_lower),
        ("requireNumbers", requirements.require_numbers, has_digit),
        ("requireSymbols", requirements.require_symbols, has_symbol),
    ];
    for (name, enabled, present) in class_rules {
        if enabled {
            let ok = present(password);
            record(
                name,
                Check {
                    required: CheckValue::Flag(true),
                    actual: CheckValue::Flag(ok),
                    passed: ok,
                },
            );
        }
    }

    let score = if total > 0 {
        (f64::from(passed) / f64::from(total) * 100.0).round() as u8
    } else {
        0
    };

    ValidationResult {
        valid: passed == total,
        score,
        strength: Strength::from_bits(entropy_bits(password)),
        checks,
    }
}

/// Heuristic entropy: `length * log2(alphabet)` where the alphabet is the sum
/// of the classes present in the password.
pub fn entropy_bits(password: &str) -> f64 {
    let mut alphabet = 0u32;
    if has_lower(password) {
        alphabet += LOWER_SPACE;
    }
    if has_upper(password) {
        alphabet += UPPER_SPACE;
    }
    if has_digit(password) {
        alphabet += DIGIT_SPACE;
    }
    if has_symbol(password) {
        alphabet += SYMBOL_SPACE;
    }

    let alphabet = alphabet.max(1);
    password.chars().count() as f64 * f64::from(alphabet).log2()
}

// =============================================================================
// TESTS
// =============================================================================
