//! Core type definitions for docmap.
//!
//! This crate defines the value types shared by the schema, accessor and
//! entity layers:
//! - [`ObjectId`]: the fixed-width reference identifier used for
//!   cross-document references
//! - [`Scalar`]: a non-null scalar element stored in plain arrays
//!
//! Nothing here knows about schemas or change tracking.

mod ids;
mod scalar;

pub use ids::ObjectId;
pub use scalar::Scalar;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid object id '{0}': expected 24 hex characters")]
    InvalidObjectId(String),

    #[error("not a scalar: {0}")]
    NotAScalar(String),

    #[error("non-finite float {0} has no stored form")]
    NonFiniteFloat(f64),
}
