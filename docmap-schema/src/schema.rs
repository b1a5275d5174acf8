use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How a field is held in memory and tracked for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    /// A plain value. Writes replace it wholesale.
    Value,
    /// A set-like array of scalars (tags, labels).
    PlainArray,
    /// A set-like array of references to other documents.
    ObjectIdArray,
}

impl AccessorKind {
    /// Returns true for kinds backed by a change-tracking accessor.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::PlainArray | Self::ObjectIdArray)
    }

    /// Short name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::PlainArray => "plain_array",
            Self::ObjectIdArray => "object_id_array",
        }
    }
}

/// Describes a single field of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub kind: AccessorKind,
    /// Value used when the stored document has no entry for the field.
    /// Absent means `[]` for composite kinds and `null` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldDescriptor {
    /// Shorthand for a plain value field.
    pub fn value() -> Self {
        Self {
            kind: AccessorKind::Value,
            default: None,
        }
    }

    /// Shorthand for a scalar array field.
    pub fn plain_array() -> Self {
        Self {
            kind: AccessorKind::PlainArray,
            default: None,
        }
    }

    /// Shorthand for a reference-id array field.
    pub fn object_id_array() -> Self {
        Self {
            kind: AccessorKind::ObjectIdArray,
            default: None,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the effective default value.
    #[must_use]
    pub fn default_value(&self) -> Value {
        match &self.default {
            Some(v) => v.clone(),
            None if self.kind.is_composite() => Value::Array(Vec::new()),
            None => Value::Null,
        }
    }
}

/// Every field of one entity type, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDescriptor>,
}

impl EntitySchema {
    /// Creates a schema with no fields.
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field, replacing any previous descriptor with the same name.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(name.into(), descriptor);
        self
    }

    /// Looks up a field descriptor.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Returns true if the schema declares the field.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates the fields backed by change-tracking accessors.
    pub fn composite_fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields
            .iter()
            .filter(|(_, d)| d.kind.is_composite())
            .map(|(name, d)| (name.as_str(), d))
    }
}
