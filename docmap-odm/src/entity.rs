//! Schema-routed entity with a lazily filled accessor cache.

use crate::{ChangeSet, OdmError, OdmResult};
use docmap_accessor::{Accessor, AccessorResult, ObjectIdArray, ScalarArray};
use docmap_schema::{AccessorKind, EntitySchema, FieldDescriptor};
use docmap_types::ObjectId;
use serde_json::{Map, Value};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Name of the primary key field. It is never part of a schema.
pub const PRIMARY_KEY: &str = "_id";

/// A document of one schema-described entity type.
///
/// Raw field values live in a JSON map. Composite fields get an accessor the
/// first time they are touched; from then on the accessor is the source of
/// truth for that field and the same instance is handed out on every access.
///
/// Cloning an entity detaches the copy from the store's history: its cached
/// accessors become solid, and so does every composite accessor it builds
/// later.
#[derive(Debug)]
pub struct Entity {
    schema: Arc<EntitySchema>,
    fields: Map<String, Value>,
    /// Fields whose accessors start solid: those supplied by the caller at
    /// construction, and every composite field of a clone.
    overrides: HashSet<String>,
    accessors: BTreeMap<String, Accessor>,
    /// Fields written outside of an accessor since the last flush.
    dirty: BTreeSet<String>,
}

impl Entity {
    /// Wraps a document loaded from the store. Accessors built from it are
    /// not solid.
    pub fn from_stored(schema: Arc<EntitySchema>, data: Map<String, Value>) -> Self {
        Self {
            schema,
            fields: data,
            overrides: HashSet::new(),
            accessors: BTreeMap::new(),
            dirty: BTreeSet::new(),
        }
    }

    /// Creates a new entity from caller-supplied values.
    ///
    /// Every key must be a schema field (or the primary key). Supplied
    /// fields count as changed until the next flush.
    pub fn create(schema: Arc<EntitySchema>, overrides: Map<String, Value>) -> OdmResult<Self> {
        for key in overrides.keys() {
            if key != PRIMARY_KEY && !schema.has_field(key) {
                return Err(no_such_field(&schema, key));
            }
        }

        let supplied: HashSet<String> = overrides
            .keys()
            .filter(|k| k.as_str() != PRIMARY_KEY)
            .cloned()
            .collect();
        let dirty = supplied.iter().cloned().collect();

        Ok(Self {
            schema,
            fields: overrides,
            overrides: supplied,
            accessors: BTreeMap::new(),
            dirty,
        })
    }

    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.schema.entity_type
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    /// Reads the primary key, if one has been assigned.
    pub fn primary_key(&self) -> OdmResult<Option<ObjectId>> {
        match self.fields.get(PRIMARY_KEY) {
            Some(v) => Ok(ObjectId::from_json(v)?),
            None => Ok(None),
        }
    }

    /// Stores the primary key assigned by the store. This is not a change to
    /// persist.
    pub fn set_primary_key(&mut self, id: ObjectId) {
        self.fields.insert(PRIMARY_KEY.to_string(), id.into());
    }

    /// Returns the accessor of a composite field, creating it on first use.
    pub fn accessor(&mut self, field: &str) -> OdmResult<&mut Accessor> {
        let schema = Arc::clone(&self.schema);
        let descriptor = resolve(&schema, field)?;

        match self.accessors.entry(field.to_string()) {
            Entry::Occupied(slot) => Ok(slot.into_mut()),
            Entry::Vacant(slot) => {
                let solid = self.overrides.contains(field);
                let raw = self
                    .fields
                    .get(field)
                    .cloned()
                    .unwrap_or_else(|| descriptor.default_value());

                let Some(built) = instantiate(descriptor.kind, &raw, solid) else {
                    return Err(kind_mismatch(&schema, field, "composite", descriptor.kind));
                };
                let accessor = built?;
                debug!(
                    "Instantiated {} accessor for {}.{} (solid={})",
                    descriptor.kind.name(),
                    schema.entity_type,
                    field,
                    solid
                );
                Ok(slot.insert(accessor))
            }
        }
    }

    /// Typed access to a scalar array field.
    pub fn scalars(&mut self, field: &str) -> OdmResult<&mut ScalarArray> {
        let schema = Arc::clone(&self.schema);
        match self.accessor(field)? {
            Accessor::Scalars(a) => Ok(a),
            Accessor::ObjectIds(_) => Err(kind_mismatch(
                &schema,
                field,
                AccessorKind::PlainArray.name(),
                AccessorKind::ObjectIdArray,
            )),
        }
    }

    /// Typed access to a reference-id array field.
    pub fn object_ids(&mut self, field: &str) -> OdmResult<&mut ObjectIdArray> {
        let schema = Arc::clone(&self.schema);
        match self.accessor(field)? {
            Accessor::ObjectIds(a) => Ok(a),
            Accessor::Scalars(_) => Err(kind_mismatch(
                &schema,
                field,
                AccessorKind::ObjectIdArray.name(),
                AccessorKind::PlainArray,
            )),
        }
    }

    /// Reads a field. Composite fields are read through their accessor.
    pub fn get(&mut self, field: &str) -> OdmResult<Value> {
        let schema = Arc::clone(&self.schema);
        let descriptor = resolve(&schema, field)?;
        if descriptor.kind.is_composite() {
            return Ok(self.accessor(field)?.to_value());
        }
        Ok(self
            .fields
            .get(field)
            .cloned()
            .unwrap_or_else(|| descriptor.default_value()))
    }

    /// Writes a field.
    ///
    /// A composite field has its whole content replaced, which makes its
    /// accessor solid. An accessor that does not exist yet is built from
    /// `value` alone, so a malformed stored value never blocks the write.
    /// Rejected elements leave the field unchanged.
    pub fn set(&mut self, field: &str, value: Value) -> OdmResult<()> {
        let schema = Arc::clone(&self.schema);
        let descriptor = resolve(&schema, field)?;
        if let Some(accessor) = self.accessors.get_mut(field) {
            accessor.replace(&value)?;
            return Ok(());
        }
        if let Some(built) = instantiate(descriptor.kind, &value, true) {
            let accessor = built?;
            debug!(
                "Instantiated {} accessor for {}.{} from a whole-field write",
                descriptor.kind.name(),
                schema.entity_type,
                field
            );
            self.accessors.insert(field.to_string(), accessor);
            return Ok(());
        }
        self.fields.insert(field.to_string(), value);
        self.dirty.insert(field.to_string());
        Ok(())
    }

    /// Returns true if the field's accessor has been created.
    #[must_use]
    pub fn is_cached(&self, field: &str) -> bool {
        self.accessors.contains_key(field)
    }

    /// Returns true if saving would emit any update atom.
    #[must_use]
    pub fn has_updates(&self) -> bool {
        !self.dirty.is_empty() || self.accessors.values().any(Accessor::has_updates)
    }

    /// Collects the update atoms for every changed field.
    pub fn change_set(&self) -> OdmResult<ChangeSet> {
        ChangeSet::from_entity(self)
    }

    /// The whole document: stored fields, schema defaults for missing fields,
    /// and accessor content for cached fields.
    #[must_use]
    pub fn pack(&self) -> Value {
        let mut out = self.fields.clone();
        for (name, descriptor) in &self.schema.fields {
            if !out.contains_key(name) {
                out.insert(name.clone(), descriptor.default_value());
            }
        }
        for (name, accessor) in &self.accessors {
            out.insert(name.clone(), accessor.to_value());
        }
        Value::Object(out)
    }

    /// Reconciles every field with the store after a successful save.
    ///
    /// Accessor baselines become their current content and raw storage is
    /// refreshed from them. Accessor solidity is left as it is.
    pub fn flush_updates(&mut self) {
        for (name, accessor) in &mut self.accessors {
            accessor.mark_persisted();
            self.fields.insert(name.clone(), accessor.to_value());
        }
        debug!(
            "Flushed {} dirty field(s) of {}",
            self.dirty.len(),
            self.schema.entity_type
        );
        self.dirty.clear();
        self.overrides.clear();
    }

    pub(crate) fn cached_accessors(&self) -> impl Iterator<Item = (&str, &Accessor)> {
        self.accessors.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Dirty fields that are not backed by a cached accessor, with their
    /// descriptor and raw value.
    pub(crate) fn dirty_raw_fields(
        &self,
    ) -> impl Iterator<Item = (&str, &FieldDescriptor, Option<&Value>)> {
        self.dirty
            .iter()
            .filter(|name| !self.accessors.contains_key(*name))
            .filter_map(|name| {
                self.schema
                    .field(name)
                    .map(|d| (name.as_str(), d, self.fields.get(name)))
            })
    }
}

impl Clone for Entity {
    fn clone(&self) -> Self {
        let mut overrides = self.overrides.clone();
        overrides.extend(
            self.schema
                .composite_fields()
                .map(|(name, _)| name.to_string()),
        );

        Self {
            schema: Arc::clone(&self.schema),
            fields: self.fields.clone(),
            overrides,
            accessors: self.accessors.clone(),
            dirty: self.dirty.clone(),
        }
    }
}

/// Builds the accessor for a composite kind; `None` for plain values.
pub(crate) fn instantiate(
    kind: AccessorKind,
    raw: &Value,
    solid: bool,
) -> Option<AccessorResult<Accessor>> {
    match kind {
        AccessorKind::PlainArray => Some(Accessor::scalars(Some(raw), solid)),
        AccessorKind::ObjectIdArray => Some(Accessor::object_ids(Some(raw), solid)),
        AccessorKind::Value => None,
    }
}

fn resolve<'a>(schema: &'a EntitySchema, field: &str) -> OdmResult<&'a FieldDescriptor> {
    schema.field(field).ok_or_else(|| no_such_field(schema, field))
}

fn no_such_field(schema: &EntitySchema, field: &str) -> OdmError {
    warn!(
        "No such field '{}' in '{}', check that the schema is current",
        field, schema.entity_type
    );
    OdmError::NoSuchField {
        entity_type: schema.entity_type.clone(),
        field: field.to_string(),
    }
}

fn kind_mismatch(
    schema: &EntitySchema,
    field: &str,
    expected: &'static str,
    actual: AccessorKind,
) -> OdmError {
    OdmError::KindMismatch {
        entity_type: schema.entity_type.clone(),
        field: field.to_string(),
        expected,
        actual,
    }
}
