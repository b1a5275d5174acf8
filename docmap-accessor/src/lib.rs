//! Mutation-tracking accessors for composite document fields.
//!
//! An accessor wraps a set-like array field and remembers how it diverged
//! from the last persisted state, so that saving emits small update atoms
//! instead of rewriting the whole array:
//!
//! - [`CompositeAccessor<E>`] — the baseline/pending state machine
//! - [`Element`] — admission check and JSON mapping for element types
//! - [`ScalarArray`] / [`ObjectIdArray`] — the two typed variants
//! - [`Accessor`] — closed enum over the variants for dynamic dispatch
//! - [`UpdateAtom`] — the replace-or-patch operation handed to the store
//!
//! Accessors satisfy the following at all times:
//! - Observable content is `(committed ∪ pending_adds) − pending_removes`,
//!   with no duplicates
//! - An element is never pending both as an add and as a remove
//! - A solid accessor always diffs as a full replacement

mod accessor;
mod atom;
mod composite;
mod element;
mod error;

pub use accessor::Accessor;
pub use atom::UpdateAtom;
pub use composite::{AccessorDebug, CompositeAccessor, ObjectIdArray, ScalarArray};
pub use element::Element;
pub use error::{AccessorError, AccessorResult};
