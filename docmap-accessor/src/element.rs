//! Element admission for the typed accessor variants.

use crate::{AccessorError, AccessorResult};
use docmap_types::{ObjectId, Scalar};
use serde_json::Value;
use std::fmt::Debug;
use std::hash::Hash;

/// An element type that can live inside a [`CompositeAccessor`].
///
/// `normalize` is the admission check every inbound raw value goes through:
/// `Ok(None)` means the value is null and the operation is a no-op,
/// `Err` means the value is rejected. Typed elements go through `admit`.
///
/// [`CompositeAccessor`]: crate::CompositeAccessor
pub trait Element: Clone + Eq + Hash + Debug {
    /// Name used in error messages.
    const KIND: &'static str;

    /// Converts a raw value into an element.
    fn normalize(value: &Value) -> AccessorResult<Option<Self>>;

    /// Checks an already typed element. The default admits everything.
    fn admit(&self) -> AccessorResult<()> {
        Ok(())
    }

    /// Converts the element back into its stored form.
    fn to_value(&self) -> Value;
}

impl Element for Scalar {
    const KIND: &'static str = "scalar";

    fn normalize(value: &Value) -> AccessorResult<Option<Self>> {
        Scalar::from_json(value).map_err(|e| invalid::<Self>(value.to_string(), e))
    }

    fn admit(&self) -> AccessorResult<()> {
        self.validate().map_err(|e| invalid::<Self>(self.to_string(), e))
    }

    fn to_value(&self) -> Value {
        self.to_json()
    }
}

impl Element for ObjectId {
    const KIND: &'static str = "object id";

    fn normalize(value: &Value) -> AccessorResult<Option<Self>> {
        ObjectId::from_json(value).map_err(|e| invalid::<Self>(value.to_string(), e))
    }

    fn to_value(&self) -> Value {
        Value::String(self.to_hex())
    }
}

fn invalid<E: Element>(value: String, err: docmap_types::Error) -> AccessorError {
    AccessorError::InvalidElement {
        kind: E::KIND,
        value,
        reason: err.to_string(),
    }
}
