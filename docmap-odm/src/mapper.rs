use crate::{Entity, OdmError, OdmResult};
use docmap_schema::{EntitySchema, FieldDescriptor, SchemaLookup};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Creates entities of registered types.
///
/// The mapper only holds the schema lookup it was given; it owns no
/// connection and no entity state.
pub struct Mapper<L: SchemaLookup> {
    schemas: L,
}

impl<L: SchemaLookup> Mapper<L> {
    pub fn new(schemas: L) -> Self {
        Self { schemas }
    }

    /// Creates a new entity from caller-supplied values.
    pub fn make(&self, entity_type: &str, fields: Map<String, Value>) -> OdmResult<Entity> {
        Entity::create(self.schema(entity_type)?, fields)
    }

    /// Wraps a document read from the store.
    pub fn load(&self, entity_type: &str, document: Map<String, Value>) -> OdmResult<Entity> {
        Ok(Entity::from_stored(self.schema(entity_type)?, document))
    }

    /// Resolves one field, failing if the type or field is unknown.
    pub fn resolve_field(&self, entity_type: &str, field: &str) -> OdmResult<&FieldDescriptor> {
        if self.schemas.schema(entity_type).is_none() {
            return Err(OdmError::UnknownEntityType(entity_type.to_string()));
        }
        self.schemas
            .resolve_field(entity_type, field)
            .ok_or_else(|| OdmError::NoSuchField {
                entity_type: entity_type.to_string(),
                field: field.to_string(),
            })
    }

    pub fn schemas(&self) -> &L {
        &self.schemas
    }

    fn schema(&self, entity_type: &str) -> OdmResult<Arc<EntitySchema>> {
        self.schemas
            .schema(entity_type)
            .ok_or_else(|| OdmError::UnknownEntityType(entity_type.to_string()))
    }
}
