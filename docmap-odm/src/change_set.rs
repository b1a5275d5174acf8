//! Change-set assembly.
//!
//! A [`ChangeSet`] maps each changed field to one [`UpdateAtom`]. It is built
//! from an entity after all mutations and before
//! [`Entity::flush_updates`](crate::Entity::flush_updates), and is a pure
//! read of the entity's state.

use crate::entity::instantiate;
use crate::{Entity, OdmResult};
use docmap_accessor::UpdateAtom;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-field update atoms for one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeSet {
    entity_type: String,
    atoms: BTreeMap<String, UpdateAtom>,
}

/// Accumulates atoms, dropping fields with nothing to write.
#[derive(Debug, Default)]
pub struct ChangeSetBuilder {
    entity_type: String,
    atoms: BTreeMap<String, UpdateAtom>,
}

impl ChangeSetBuilder {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            atoms: BTreeMap::new(),
        }
    }

    /// Records the atom for a field. `None` and empty patches are skipped.
    pub fn push(&mut self, field: &str, atom: Option<UpdateAtom>) -> &mut Self {
        if let Some(atom) = atom.filter(|a| !a.is_noop()) {
            debug!(
                "{}.{}: {}",
                self.entity_type,
                field,
                if atom.is_replace() { "replace" } else { "patch" }
            );
            self.atoms.insert(field.to_string(), atom);
        }
        self
    }

    pub fn build(self) -> ChangeSet {
        ChangeSet {
            entity_type: self.entity_type,
            atoms: self.atoms,
        }
    }
}

impl ChangeSet {
    /// Walks an entity's dirty fields and cached accessors.
    ///
    /// Composite fields supplied at construction but never accessed are
    /// diffed as if their (solid) accessor existed, so a malformed element
    /// in them surfaces here.
    pub fn from_entity(entity: &Entity) -> OdmResult<Self> {
        let mut builder = ChangeSetBuilder::new(entity.entity_type());

        for (name, descriptor, raw) in entity.dirty_raw_fields() {
            let raw = raw.cloned().unwrap_or(Value::Null);
            let atom = match instantiate(descriptor.kind, &raw, true) {
                Some(built) => built?.update_atom(),
                None => Some(UpdateAtom::Replace { value: raw }),
            };
            builder.push(name, atom);
        }

        for (name, accessor) in entity.cached_accessors() {
            builder.push(name, accessor.update_atom());
        }

        let change_set = builder.build();
        debug!(
            "Built change set for {} with {} field(s)",
            change_set.entity_type,
            change_set.len()
        );
        Ok(change_set)
    }

    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&UpdateAtom> {
        self.atoms.get(field)
    }

    /// Iterates `(field, atom)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UpdateAtom)> {
        self.atoms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Renders the atoms as document-store update operators.
    ///
    /// Replacements become `$set`, patch adds `$addToSet` with `$each`, and
    /// patch removes `$pull` with `$in`. A store refuses `$addToSet` and
    /// `$pull` on the same path in one update, so pulls for fields that also
    /// add go into a second document. Adds and removes never overlap, so the
    /// two documents may be applied in order without changing the result.
    #[must_use]
    pub fn to_update_documents(&self) -> Vec<Value> {
        let mut set = Map::new();
        let mut add_to_set = Map::new();
        let mut pull = Map::new();
        let mut deferred_pull = Map::new();

        for (field, atom) in &self.atoms {
            match atom {
                UpdateAtom::Replace { value } => {
                    set.insert(field.clone(), value.clone());
                }
                UpdateAtom::Patch { adds, removes } => {
                    if !adds.is_empty() {
                        add_to_set.insert(field.clone(), operator("$each", adds));
                    }
                    if !removes.is_empty() {
                        let op = operator("$in", removes);
                        if adds.is_empty() {
                            pull.insert(field.clone(), op);
                        } else {
                            deferred_pull.insert(field.clone(), op);
                        }
                    }
                }
            }
        }

        let mut first = Map::new();
        for (name, fields) in [("$set", set), ("$addToSet", add_to_set), ("$pull", pull)] {
            if !fields.is_empty() {
                first.insert(name.to_string(), Value::Object(fields));
            }
        }

        let mut documents = Vec::new();
        if !first.is_empty() {
            documents.push(Value::Object(first));
        }
        if !deferred_pull.is_empty() {
            documents.push(operator_doc("$pull", deferred_pull));
        }
        documents
    }
}

fn operator(name: &str, values: &[Value]) -> Value {
    let mut map = Map::new();
    map.insert(name.to_string(), Value::Array(values.to_vec()));
    Value::Object(map)
}

fn operator_doc(name: &str, fields: Map<String, Value>) -> Value {
    let mut map = Map::new();
    map.insert(name.to_string(), Value::Object(fields));
    Value::Object(map)
}
