//! Dynamic dispatch over the typed accessor variants.

use crate::{AccessorDebug, AccessorResult, ObjectIdArray, ScalarArray, UpdateAtom};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// One of the typed array accessors, selected by the field's schema kind.
///
/// Every method takes and returns raw values so the entity layer can route
/// field access without knowing the element type. Use [`Accessor::as_scalars`]
/// or [`Accessor::as_object_ids`] for the typed API.
#[derive(Debug, Clone)]
pub enum Accessor {
    Scalars(ScalarArray),
    ObjectIds(ObjectIdArray),
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Accessor::Scalars($inner) => $body,
            Accessor::ObjectIds($inner) => $body,
        }
    };
}

impl Accessor {
    /// Builds a scalar array accessor from a raw value.
    pub fn scalars(raw: Option<&Value>, solid: bool) -> AccessorResult<Self> {
        ScalarArray::from_value(raw, solid).map(Self::Scalars)
    }

    /// Builds a reference-id array accessor from a raw value.
    pub fn object_ids(raw: Option<&Value>, solid: bool) -> AccessorResult<Self> {
        ObjectIdArray::from_value(raw, solid).map(Self::ObjectIds)
    }

    /// Adds a raw value. Rejected values leave the accessor unchanged.
    pub fn add(&mut self, value: &Value) -> AccessorResult<()> {
        dispatch!(self, a => a.add_value(value))
    }

    pub fn pull(&mut self, value: &Value) {
        dispatch!(self, a => a.pull_value(value))
    }

    #[must_use]
    pub fn has(&self, value: &Value) -> bool {
        dispatch!(self, a => a.has_value(value))
    }

    #[must_use]
    pub fn count(&self) -> usize {
        dispatch!(self, a => a.count())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Observable content in iteration order.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        dispatch!(self, a => a.to_values())
    }

    /// Observable content as a JSON array.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(self.values())
    }

    /// Replaces the whole content and makes the accessor solid.
    pub fn replace(&mut self, raw: &Value) -> AccessorResult<()> {
        dispatch!(self, a => a.replace(raw))
    }

    pub fn set_solid(&mut self, solid: bool) {
        dispatch!(self, a => a.set_solid(solid))
    }

    #[must_use]
    pub fn is_solid(&self) -> bool {
        dispatch!(self, a => a.is_solid())
    }

    #[must_use]
    pub fn has_updates(&self) -> bool {
        dispatch!(self, a => a.has_updates())
    }

    #[must_use]
    pub fn update_atom(&self) -> Option<UpdateAtom> {
        dispatch!(self, a => a.update_atom())
    }

    pub fn mark_persisted(&mut self) {
        dispatch!(self, a => a.mark_persisted())
    }

    #[must_use]
    pub fn debug_info(&self) -> AccessorDebug {
        dispatch!(self, a => a.debug_info())
    }

    pub fn as_scalars(&mut self) -> Option<&mut ScalarArray> {
        match self {
            Self::Scalars(a) => Some(a),
            Self::ObjectIds(_) => None,
        }
    }

    pub fn as_object_ids(&mut self) -> Option<&mut ObjectIdArray> {
        match self {
            Self::ObjectIds(a) => Some(a),
            Self::Scalars(_) => None,
        }
    }
}

impl Serialize for Accessor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        dispatch!(self, a => a.serialize(serializer))
    }
}
