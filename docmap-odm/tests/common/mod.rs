//! Shared fixtures for entity tests.

#![allow(dead_code)]

use docmap_odm::{EntitySchema, FieldDescriptor, Mapper, SchemaRegistry};
use serde_json::{Map, Value, json};
use std::sync::Once;

pub const ID_A: &str = "5f1d7a3b9c0e4a2b1c3d4e5f";
pub const ID_B: &str = "5f1d7a3b9c0e4a2b1c3d4e60";

static TRACING: Once = Once::new();

/// Installs a test subscriber once; honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn accessed_schema() -> EntitySchema {
    EntitySchema::new("accessed")
        .with_field("name", FieldDescriptor::value().with_default(json!("untitled")))
        .with_field("tags", FieldDescriptor::plain_array())
        .with_field("related_ids", FieldDescriptor::object_id_array())
        .with_field("labels", FieldDescriptor::plain_array().with_default(json!(["new"])))
}

pub fn registry() -> SchemaRegistry {
    SchemaRegistry::from_schemas([accessed_schema()]).expect("fixture schema is valid")
}

pub fn mapper() -> Mapper<SchemaRegistry> {
    init_tracing();
    Mapper::new(registry())
}

pub fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture fields must be an object, got {other}"),
    }
}
