// Readers for loosely typed request values

use serde_json::Value;

/// Interpret a JSON value as a boolean flag.
///
/// Accepts booleans, the numbers 0 and 1, and the strings
/// `true/false/1/0/yes/no/on/off` in any case. Anything else is `None`,
/// leaving the caller to apply its default.
pub fn lenient_bool(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => parse_flag(s),
        _ => None,
    }
}

/// Parse a query-string style flag
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Interpret a JSON value as an integer (JSON integers or numeric strings)
pub fn lenient_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Interpret a JSON value as a float (JSON numbers or numeric strings)
pub fn lenient_float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Interpret a JSON value as a string. Numbers are rendered, other types are `None`.
pub fn lenient_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
