//! Field validators for untyped request bodies.
//!
//! Each validator takes the raw JSON value of one field (`None` when the key
//! is absent) and either returns a typed value or a [`ValidationError`]
//! naming that field. Validators are pure and never log.

use crate::error::{ValidationError, ValidationResult};
use crate::types::HealthCheckRating;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::str::FromStr;

/// Truthiness of a raw value as the JSON producers of this API use it:
/// absent, `null`, `false`, `0` and `""` all count as "not supplied".
pub fn is_supplied(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(_) => true,
    }
}

/// Required non-empty text. Whitespace-only text is accepted.
pub fn text(field: &str, value: Option<&Value>) -> ValidationResult<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ValidationError::incorrect_or_missing(field)),
    }
}

/// Optional free text with no format check. Non-text values are rejected.
pub fn optional_text(field: &str, value: Option<&Value>) -> ValidationResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::incorrect(field)),
    }
}

/// Required calendar date. Returns the original text, not a normalized form.
pub fn date(field: &str, value: Option<&Value>) -> ValidationResult<String> {
    match value {
        Some(Value::String(s)) if is_calendar_date(s) => Ok(s.clone()),
        _ => Err(ValidationError::incorrect_or_missing(field)),
    }
}

/// Optional calendar date.
///
/// Absent, `null`, non-text and blank values all mean "no date". Otherwise the
/// trimmed text must be a real calendar date.
pub fn optional_date(field: &str, value: Option<&Value>) -> ValidationResult<Option<String>> {
    let Some(Value::String(raw)) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !is_calendar_date(trimmed) {
        return Err(ValidationError::incorrect(field));
    }
    Ok(Some(trimmed.to_string()))
}

/// Membership in a fixed set of string literals, expressed by `T: FromStr`.
pub fn enumerated<T: FromStr>(field: &str, value: Option<&Value>) -> ValidationResult<T> {
    value
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<T>().ok())
        .ok_or_else(|| ValidationError::incorrect_or_missing(field))
}

/// Exactly one of the numbers 0, 1, 2 or 3.
///
/// Absence is reported separately from a present-but-invalid value.
pub fn health_check_rating(
    field: &str,
    value: Option<&Value>,
) -> ValidationResult<HealthCheckRating> {
    let Some(value) = value else {
        return Err(ValidationError::missing(field));
    };
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && (0.0..=3.0).contains(f))
        .and_then(|f| HealthCheckRating::try_from(f as u8).ok())
        .ok_or_else(|| ValidationError::invalid(field))
}

/// Diagnosis codes are trusted: absent or `null` gives an empty list and an
/// array of strings passes through unchanged. Codes are not checked against
/// the diagnosis catalog.
pub fn diagnosis_codes(field: &str, value: Option<&Value>) -> ValidationResult<Vec<String>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ValidationError::incorrect(field))
            })
            .collect(),
        Some(_) => Err(ValidationError::incorrect(field)),
    }
}

/// Whether `s` parses as a real calendar date or timestamp
pub fn is_calendar_date(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || NaiveDate::parse_from_str(s, "%Y/%m/%d").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
}
