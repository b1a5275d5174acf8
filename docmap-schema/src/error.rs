//! Error types for schema construction and loading.

use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while building a schema registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The same entity type was registered twice.
    #[error("duplicate schema for entity type '{0}'")]
    DuplicateEntityType(String),

    /// A composite field declared a default that is not an array.
    #[error("invalid default for '{entity_type}.{field}': {reason}")]
    InvalidDefault {
        entity_type: String,
        field: String,
        reason: String,
    },

    /// TOML manifest could not be parsed.
    #[error("manifest parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON manifest could not be parsed.
    #[error("manifest parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Manifest file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
