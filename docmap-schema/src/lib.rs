//! Schema table for docmap.
//!
//! Defines the read-only lookup structures the entity layer consumes:
//! - [`AccessorKind`]: how a field is represented in memory (plain value or a
//!   change-tracking array accessor)
//! - [`FieldDescriptor`]: accessor kind plus default value for one field
//! - [`EntitySchema`]: every field of one entity type
//! - [`SchemaRegistry`]: all entity schemas, loadable from TOML or JSON
//!
//! Schemas are built once and never mutated afterwards; they are shared
//! behind `Arc` by every entity of the type.

mod error;
mod registry;
mod schema;

pub use error::{SchemaError, SchemaResult};
pub use registry::{SchemaLookup, SchemaRegistry};
pub use schema::{AccessorKind, EntitySchema, FieldDescriptor};
