//! Error types for the accessor layer.

use thiserror::Error;

/// Result type for accessor operations.
pub type AccessorResult<T> = Result<T, AccessorError>;

/// Errors raised when an inbound value cannot be admitted.
///
/// A failed operation never mutates the accessor.
#[derive(Debug, Error)]
pub enum AccessorError {
    /// An element failed the variant's admission check.
    #[error("invalid {kind} element {value}: {reason}")]
    InvalidElement {
        kind: &'static str,
        value: String,
        reason: String,
    },

    /// A raw field value that should hold an array holds something else.
    #[error("expected an array of {kind} elements, got {found}")]
    NotAnArray { kind: &'static str, found: String },
}
