use bigdecimal::BigDecimal;
use serde::Serialize;
use std::fmt;

/// A single field-level issue reported back to the caller on a 400.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Pulls a required non-empty string out of an optional payload field,
/// recording an issue (and returning None) when it is missing or blank.
pub fn require_string(
    field: &str,
    value: Option<String>,
    issues: &mut Vec<ValidationError>,
) -> Option<String> {
    match value {
        None => {
            issues.push(ValidationError::new(field, "is required"));
            None
        }
        Some(value) if value.trim().is_empty() => {
            issues.push(ValidationError::new(field, "must not be empty"));
            None
        }
        Some(value) => Some(value),
    }
}

/// Pulls a required positive amount out of an optional payload field.
pub fn require_positive_amount(
    field: &str,
    value: Option<BigDecimal>,
    issues: &mut Vec<ValidationError>,
) -> Option<BigDecimal> {
    match value {
        None => {
            issues.push(ValidationError::new(field, "is required"));
            None
        }
        Some(value) if value <= BigDecimal::from(0) => {
            issues.push(ValidationError::new(field, "must be a positive number"));
            None
        }
        Some(value) => Some(value),
    }
}
