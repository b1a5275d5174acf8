//! Error types for the entity layer.

use docmap_schema::AccessorKind;
use thiserror::Error;

/// Result type for entity operations.
pub type OdmResult<T> = Result<T, OdmError>;

/// Errors that can occur while routing field access.
#[derive(Debug, Error)]
pub enum OdmError {
    /// The field is not part of the entity's schema.
    #[error("no such field '{field}' in '{entity_type}', check that the schema is current")]
    NoSuchField { entity_type: String, field: String },

    /// No schema is registered for the entity type.
    #[error("no schema registered for entity type '{0}'")]
    UnknownEntityType(String),

    /// The field exists but has a different accessor kind.
    #[error("field '{field}' in '{entity_type}' is {actual:?}, not {expected}")]
    KindMismatch {
        entity_type: String,
        field: String,
        expected: &'static str,
        actual: AccessorKind,
    },

    /// An element or field value was rejected by its accessor.
    #[error(transparent)]
    Accessor(#[from] docmap_accessor::AccessorError),

    /// The stored primary key is not a valid identifier.
    #[error("invalid primary key: {0}")]
    InvalidPrimaryKey(#[from] docmap_types::Error),
}
