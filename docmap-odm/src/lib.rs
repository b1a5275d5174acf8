//! Entity layer for docmap.
//!
//! Ties schemas and accessors together:
//! - [`Entity`] — raw field storage plus a lazily filled accessor cache,
//!   with every field access routed through the schema
//! - [`ChangeSet`] / [`ChangeSetBuilder`] — per-field update atoms collected
//!   from an entity, ready for the store driver
//! - [`Mapper`] — creates entities of registered types
//!
//! Nothing here performs I/O. The driver submits the change set and then
//! calls [`Entity::flush_updates`] once the write succeeded.

mod change_set;
mod entity;
mod error;
mod mapper;

pub use change_set::{ChangeSet, ChangeSetBuilder};
pub use entity::{Entity, PRIMARY_KEY};
pub use error::{OdmError, OdmResult};
pub use mapper::Mapper;

pub use docmap_accessor::{Accessor, ObjectIdArray, ScalarArray, UpdateAtom};
pub use docmap_schema::{AccessorKind, EntitySchema, FieldDescriptor, SchemaLookup, SchemaRegistry};
pub use docmap_types::{ObjectId, Scalar};
