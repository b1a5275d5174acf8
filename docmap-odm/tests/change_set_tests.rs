mod common;

use common::{ID_A, ID_B, fields, mapper};
use docmap_odm::{ChangeSetBuilder, OdmError, UpdateAtom};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn untouched_entity_has_empty_change_set() {
    let mut entity = mapper()
        .load("accessed", fields(json!({ "tags": ["a"], "name": "n" })))
        .unwrap();
    entity.accessor("tags").unwrap();
    let cs = entity.change_set().unwrap();
    assert!(cs.is_empty());
    assert_eq!(cs.entity_type(), "accessed");
    assert!(cs.to_update_documents().is_empty());
}

#[test]
fn patch_for_stored_entity() {
    let mut entity = mapper()
        .load("accessed", fields(json!({ "tags": ["a", "b", "c"] })))
        .unwrap();
    let tags = entity.accessor("tags").unwrap();
    tags.add(&json!("d")).unwrap();
    tags.pull(&json!("a"));

    let cs = entity.change_set().unwrap();
    assert_eq!(cs.len(), 1);
    assert_eq!(
        cs.get("tags"),
        Some(&UpdateAtom::Patch { adds: vec![json!("d")], removes: vec![json!("a")] })
    );
}

#[test]
fn cancelled_mutations_are_omitted() {
    let mut entity = mapper()
        .load("accessed", fields(json!({ "tags": ["a"] })))
        .unwrap();
    let tags = entity.accessor("tags").unwrap();
    tags.add(&json!("b")).unwrap();
    tags.pull(&json!("b"));
    tags.pull(&json!("a"));
    tags.add(&json!("a")).unwrap();

    assert!(entity.change_set().unwrap().is_empty());
}

#[test]
fn created_entity_replaces_supplied_fields() {
    let mut entity = mapper()
        .make("accessed", fields(json!({ "tags": ["a", "b"], "name": "n" })))
        .unwrap();
    entity.accessor("tags").unwrap().add(&json!("c")).unwrap();

    let cs = entity.change_set().unwrap();
    assert_eq!(
        cs.iter().collect::<Vec<_>>(),
        vec![
            ("name", &UpdateAtom::Replace { value: json!("n") }),
            ("tags", &UpdateAtom::Replace { value: json!(["a", "b", "c"]) }),
        ]
    );
}

#[test]
fn supplied_composite_never_accessed_is_still_replaced() {
    let entity = mapper()
        .make("accessed", fields(json!({ "related_ids": [{ "$oid": ID_A }] })))
        .unwrap();
    let cs = entity.change_set().unwrap();
    assert_eq!(
        cs.get("related_ids"),
        Some(&UpdateAtom::Replace { value: json!([ID_A]) })
    );
}

#[test]
fn supplied_malformed_ids_fail_at_change_set() {
    let entity = mapper()
        .make("accessed", fields(json!({ "related_ids": ["bad"] })))
        .unwrap();
    assert!(matches!(entity.change_set(), Err(OdmError::Accessor(_))));
}

#[test]
fn cloned_entity_replaces_cached_fields() {
    let mut entity = mapper()
        .load("accessed", fields(json!({ "tags": ["a"], "related_ids": [ID_A] })))
        .unwrap();
    entity.accessor("tags").unwrap().add(&json!("b")).unwrap();

    let copy = entity.clone();
    let cs = copy.change_set().unwrap();
    assert_eq!(
        cs.get("tags"),
        Some(&UpdateAtom::Replace { value: json!(["a", "b"]) })
    );
    assert!(cs.get("related_ids").is_none());
}

#[test]
fn value_field_write_is_replace() {
    let mut entity = mapper().load("accessed", fields(json!({}))).unwrap();
    entity.set("name", json!("renamed")).unwrap();
    let cs = entity.change_set().unwrap();
    assert_eq!(cs.get("name"), Some(&UpdateAtom::Replace { value: json!("renamed") }));
}

#[test]
fn change_set_serializes_atoms() {
    let mut entity = mapper()
        .load("accessed", fields(json!({ "tags": ["a"] })))
        .unwrap();
    entity.accessor("tags").unwrap().add(&json!("b")).unwrap();
    let json = serde_json::to_value(entity.change_set().unwrap()).unwrap();
    assert_eq!(
        json,
        json!({
            "entity_type": "accessed",
            "atoms": { "tags": { "mode": "patch", "adds": ["b"] } }
        })
    );
}

// ── Builder ──────────────────────────────────────────────────────

#[test]
fn builder_skips_empty_atoms() {
    let mut builder = ChangeSetBuilder::new("t");
    builder
        .push("a", None)
        .push("b", Some(UpdateAtom::Patch { adds: vec![], removes: vec![] }))
        .push("c", Some(UpdateAtom::Replace { value: json!(1) }));
    let cs = builder.build();
    assert_eq!(cs.len(), 1);
    assert!(cs.get("c").is_some());
}

// ── Update documents ─────────────────────────────────────────────

#[test]
fn update_documents_use_store_operators() {
    let mut entity = mapper()
        .load(
            "accessed",
            fields(json!({ "tags": ["a", "b"], "related_ids": [ID_A], "labels": ["x"] })),
        )
        .unwrap();
    entity.set("name", json!("n")).unwrap();
    entity.accessor("tags").unwrap().pull(&json!("a"));
    entity.accessor("related_ids").unwrap().add(&json!(ID_B)).unwrap();
    entity.accessor("labels").unwrap().set_solid(true);

    assert_eq!(
        entity.change_set().unwrap().to_update_documents(),
        vec![json!({
            "$set": { "labels": ["x"], "name": "n" },
            "$addToSet": { "related_ids": { "$each": [ID_B] } },
            "$pull": { "tags": { "$in": ["a"] } },
        })]
    );
}

#[test]
fn add_and_pull_on_same_field_split_documents() {
    let mut entity = mapper()
        .load("accessed", fields(json!({ "tags": ["a", "b"] })))
        .unwrap();
    let tags = entity.accessor("tags").unwrap();
    tags.add(&json!("c")).unwrap();
    tags.pull(&json!("a"));

    assert_eq!(
        entity.change_set().unwrap().to_update_documents(),
        vec![
            json!({ "$addToSet": { "tags": { "$each": ["c"] } } }),
            json!({ "$pull": { "tags": { "$in": ["a"] } } }),
        ]
    );
}

#[test]
fn persistence_cycle() {
    let mut entity = mapper()
        .load("accessed", fields(json!({ "tags": ["a", "b"] })))
        .unwrap();
    entity.accessor("tags").unwrap().add(&json!("c")).unwrap();
    assert_eq!(entity.change_set().unwrap().len(), 1);

    entity.flush_updates();
    assert!(entity.change_set().unwrap().is_empty());

    entity.accessor("tags").unwrap().pull(&json!("c"));
    assert_eq!(
        entity.change_set().unwrap().get("tags"),
        Some(&UpdateAtom::Patch { adds: vec![], removes: vec![json!("c")] })
    );
}
