use docmap_schema::{AccessorKind, EntitySchema, FieldDescriptor};
use pretty_assertions::assert_eq;
use serde_json::json;

fn accessed() -> EntitySchema {
    EntitySchema::new("accessed")
        .with_field("name", FieldDescriptor::value())
        .with_field("tags", FieldDescriptor::plain_array())
        .with_field("related_ids", FieldDescriptor::object_id_array())
}

// ── AccessorKind ─────────────────────────────────────────────────

#[test]
fn composite_kinds() {
    assert!(AccessorKind::PlainArray.is_composite());
    assert!(AccessorKind::ObjectIdArray.is_composite());
    assert!(!AccessorKind::Value.is_composite());
}

#[test]
fn kind_serde_is_snake_case() {
    assert_eq!(
        serde_json::to_value(AccessorKind::ObjectIdArray).unwrap(),
        json!("object_id_array")
    );
    let kind: AccessorKind = serde_json::from_value(json!("plain_array")).unwrap();
    assert_eq!(kind, AccessorKind::PlainArray);
}

#[test]
fn kind_name_matches_serde() {
    for kind in [AccessorKind::Value, AccessorKind::PlainArray, AccessorKind::ObjectIdArray] {
        assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.name()));
    }
}

// ── FieldDescriptor ──────────────────────────────────────────────

#[test]
fn composite_default_is_empty_array() {
    assert_eq!(FieldDescriptor::plain_array().default_value(), json!([]));
    assert_eq!(FieldDescriptor::object_id_array().default_value(), json!([]));
}

#[test]
fn value_default_is_null() {
    assert_eq!(FieldDescriptor::value().default_value(), json!(null));
}

#[test]
fn explicit_default_wins() {
    let d = FieldDescriptor::plain_array().with_default(json!(["x"]));
    assert_eq!(d.default_value(), json!(["x"]));
}

#[test]
fn descriptor_json_omits_missing_default() {
    let json = serde_json::to_value(FieldDescriptor::plain_array()).unwrap();
    assert_eq!(json, json!({ "kind": "plain_array" }));
}

// ── EntitySchema ─────────────────────────────────────────────────

#[test]
fn field_lookup() {
    let schema = accessed();
    assert_eq!(schema.field("tags").map(|d| d.kind), Some(AccessorKind::PlainArray));
    assert!(schema.field("missing").is_none());
    assert!(schema.has_field("name"));
    assert!(!schema.has_field("test"));
}

#[test]
fn composite_fields_skip_values() {
    let schema = accessed();
    let names: Vec<&str> = schema.composite_fields().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["related_ids", "tags"]);
}

#[test]
fn with_field_replaces_descriptor() {
    let schema = EntitySchema::new("t")
        .with_field("f", FieldDescriptor::value())
        .with_field("f", FieldDescriptor::plain_array());
    assert_eq!(schema.fields.len(), 1);
    assert_eq!(schema.field("f").unwrap().kind, AccessorKind::PlainArray);
}

#[test]
fn schema_json_roundtrip() {
    let schema = accessed();
    let json = serde_json::to_string(&schema).unwrap();
    let back: EntitySchema = serde_json::from_str(&json).unwrap();
    assert_eq!(back, schema);
}
