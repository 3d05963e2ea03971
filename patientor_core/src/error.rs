//! Error types for the patientor_core library.

use std::fmt;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for the validation pipeline (validators, parsers, builders)
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Core error type for patientor_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input was structurally or semantically invalid
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Request body was not parseable JSON
    #[error("malformed body: {0}")]
    MalformedBody(String),

    /// Referenced record does not exist
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    /// A generated identifier collided with one already in the store
    #[error("duplicate identifier: {0}")]
    DuplicateId(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store persistence error
    #[error("State error: {0}")]
    State(String),
}

impl Error {
    /// Body text that failed to parse as JSON
    pub fn malformed_body(err: &serde_json::Error) -> Self {
        Error::MalformedBody(err.to_string())
    }

    /// Unknown patient identifier
    pub fn not_found(id: impl Into<String>) -> Self {
        Error::NotFound {
            what: "patient",
            id: id.into(),
        }
    }
}

/// Why a field was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationReason {
    /// Required field absent
    Missing,
    /// Absent, wrong type, empty, or not a member of the allowed set
    IncorrectOrMissing,
    /// Present but malformed (optional fields)
    Incorrect,
    /// Present but outside the allowed values
    Invalid,
    /// Entry discriminator absent or not one of the known tags
    UnknownEntryType,
    /// Hospital discharge group absent or incomplete
    MissingDischargeInformation,
}

/// A field-level rejection produced by the validation pipeline.
///
/// `field` is the wire name of the offending field; nested fields use a dotted
/// path such as `sickLeave.startDate`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, ValidationReason::Missing)
    }

    pub fn incorrect_or_missing(field: impl Into<String>) -> Self {
        Self::new(field, ValidationReason::IncorrectOrMissing)
    }

    pub fn incorrect(field: impl Into<String>) -> Self {
        Self::new(field, ValidationReason::Incorrect)
    }

    pub fn invalid(field: impl Into<String>) -> Self {
        Self::new(field, ValidationReason::Invalid)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            ValidationReason::Missing => write!(f, "missing {}", self.field),
            ValidationReason::IncorrectOrMissing => {
                write!(f, "incorrect or missing {}", self.field)
            }
            ValidationReason::Incorrect => write!(f, "incorrect {}", self.field),
            ValidationReason::Invalid => write!(f, "invalid {}", self.field),
            ValidationReason::UnknownEntryType => f.write_str("unknown or missing entry type"),
            ValidationReason::MissingDischargeInformation => {
                f.write_str("missing discharge information")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::incorrect_or_missing("name").to_string(),
            "incorrect or missing name"
        );
        assert_eq!(
            ValidationError::missing("healthCheckRating").to_string(),
            "missing healthCheckRating"
        );
        assert_eq!(
            ValidationError::new("type", ValidationReason::UnknownEntryType).to_string(),
            "unknown or missing entry type"
        );
    }

    #[test]
    fn test_validation_converts_into_error() {
        let err: Error = ValidationError::incorrect("ssn").into();
        assert!(matches!(err, Error::Validation(ref v) if v.field == "ssn"));
        assert_eq!(err.to_string(), "incorrect ssn");
    }

    #[test]
    fn test_malformed_body_message() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = Error::malformed_body(&parse_err);
        assert!(err.to_string().starts_with("malformed body: "));
        assert!(!matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(Error::not_found("p-9").to_string(), "patient not found: p-9");
    }
}
