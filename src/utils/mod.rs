//! Utility functions and helpers.

pub mod id;

use uuid::Uuid;

use crate::error::{AppError, Result};

/// Parse a UUID-valued attribute, naming the attribute on failure.
pub fn parse_uuid(value: &str, attribute: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|e| AppError::attribute(attribute, format!("'{value}' is not a valid UUID: {e}")))
}

/// Parse the `id` of a state record that must already exist remotely.
pub fn require_uuid(id: Option<&str>, attribute: &str) -> Result<Uuid> {
    match id {
        Some(value) => parse_uuid(value, attribute),
        None => Err(AppError::attribute(attribute, "value is unknown")),
    }
}

/// Treat an empty string the same as an absent value.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
