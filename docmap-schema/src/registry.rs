//! Process-wide schema registry.
//!
//! The registry is normally filled by a schema compiler that runs outside
//! this crate. For tools and tests it can also be read from a manifest:
//!
//! ```toml
//! [[entity]]
//! type = "accessed"
//!
//! [entity.fields.tags]
//! kind = "plain_array"
//! default = ["new"]
//! ```

use crate::{EntitySchema, FieldDescriptor, SchemaError, SchemaResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Field resolution as seen by the entity layer.
pub trait SchemaLookup {
    /// Returns the schema of an entity type.
    fn schema(&self, entity_type: &str) -> Option<Arc<EntitySchema>>;

    /// Resolves one field of an entity type.
    fn resolve_field(&self, entity_type: &str, field: &str) -> Option<&FieldDescriptor>;
}

/// Immutable collection of entity schemas keyed by entity type.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<EntitySchema>>,
}

#[derive(Debug, Deserialize)]
struct SchemaManifest {
    #[serde(default, rename = "entity")]
    entities: Vec<EntitySchema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a list of schemas.
    pub fn from_schemas(schemas: impl IntoIterator<Item = EntitySchema>) -> SchemaResult<Self> {
        let mut registry = Self::new();
        for schema in schemas {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    /// Parses a TOML manifest.
    pub fn from_toml_str(contents: &str) -> SchemaResult<Self> {
        let manifest: SchemaManifest = toml::from_str(contents)?;
        Self::from_schemas(manifest.entities)
    }

    /// Parses a JSON manifest of the shape `{"entity": [...]}`.
    pub fn from_json_str(contents: &str) -> SchemaResult<Self> {
        let manifest: SchemaManifest = serde_json::from_str(contents)?;
        Self::from_schemas(manifest.entities)
    }

    /// Loads a manifest from disk. Files ending in `.json` are read as JSON,
    /// anything else as TOML.
    pub fn load_from(path: &Path) -> SchemaResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let registry = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents)?,
            _ => Self::from_toml_str(&contents)?,
        };
        info!(
            "Loaded {} entity schema(s) from {:?}",
            registry.len(),
            path
        );
        Ok(registry)
    }

    /// Adds a schema. Fails on duplicate entity types and on composite
    /// fields whose default is not an array.
    pub fn register(&mut self, schema: EntitySchema) -> SchemaResult<()> {
        if self.schemas.contains_key(&schema.entity_type) {
            return Err(SchemaError::DuplicateEntityType(schema.entity_type));
        }
        validate_defaults(&schema)?;

        debug!(
            "Registered schema '{}' with {} field(s)",
            schema.entity_type,
            schema.fields.len()
        );
        self.schemas
            .insert(schema.entity_type.clone(), Arc::new(schema));
        Ok(())
    }

    /// Returns the number of registered entity types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Iterates the registered entity type names.
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

impl SchemaLookup for SchemaRegistry {
    fn schema(&self, entity_type: &str) -> Option<Arc<EntitySchema>> {
        self.schemas.get(entity_type).cloned()
    }

    fn resolve_field(&self, entity_type: &str, field: &str) -> Option<&FieldDescriptor> {
        self.schemas.get(entity_type)?.field(field)
    }
}

fn validate_defaults(schema: &EntitySchema) -> SchemaResult<()> {
    for (name, descriptor) in schema.composite_fields() {
        match &descriptor.default {
            None | Some(Value::Array(_)) => {}
            Some(other) => {
                return Err(SchemaError::InvalidDefault {
                    entity_type: schema.entity_type.clone(),
                    field: name.to_string(),
                    reason: format!(
                        "{} fields need an array default, got {other}",
                        descriptor.kind.name()
                    ),
                });
            }
        }
    }
    Ok(())
}
