// src/error.rs

//! Unified error handling for the provider.

use std::fmt;

use thiserror::Error;

use crate::client::ClientError;

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A remote API call failed
    #[error("Unable to {action}, got error: {source}")]
    Client {
        action: String,
        #[source]
        source: ClientError,
    },

    /// An attribute value could not be interpreted
    #[error("Invalid attribute '{attribute}': {message}")]
    Attribute { attribute: String, message: String },

    /// A composite import identifier had the wrong shape
    #[error("Expected ID in the format '{format}', got [{id}]")]
    InvalidImportId { format: String, id: String },

    /// The relation being added is already present remotely
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Update requested on a resource that only supports create/delete
    #[error("{0} resource is immutable")]
    Immutable(String),

    /// The remote object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Import is refused for this resource type
    #[error("Import not supported: {0}")]
    ImportNotSupported(String),

    /// Add-then-remove update left both relations present
    #[error("Partial update: {0}")]
    PartialUpdate(String),

    /// Unknown resource or data source type name
    #[error("Unknown type '{0}'")]
    UnknownType(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a client error annotated with the attempted action.
    pub fn client(action: impl Into<String>, source: ClientError) -> Self {
        Self::Client {
            action: action.into(),
            source,
        }
    }

    /// Create an error attributed to a single attribute.
    pub fn attribute(attribute: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Attribute {
            attribute: attribute.into(),
            message: message.to_string(),
        }
    }

    /// Create a malformed import identifier error.
    pub fn invalid_import_id(format: impl Into<String>, id: impl Into<String>) -> Self {
        Self::InvalidImportId {
            format: format.into(),
            id: id.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Name of the offending attribute, when the error is attributable to one.
    pub fn attribute_name(&self) -> Option<&str> {
        match self {
            Self::Attribute { attribute, .. } => Some(attribute),
            _ => None,
        }
    }

    /// HTTP status of the underlying remote failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { source, .. } => source.status(),
            _ => None,
        }
    }
}
