use docmap_types::ObjectId;
use serde_json::json;
use std::collections::HashSet;
use std::str::FromStr;

const HEX: &str = "5f1d7a3b9c0e4a2b1c3d4e5f";

// ── Generation ────────────────────────────────────────────────────

#[test]
fn new_ids_are_unique() {
    let ids: HashSet<ObjectId> = (0..1000).map(|_| ObjectId::new()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn new_id_embeds_current_time() {
    let before = chrono::Utc::now().timestamp();
    let id = ObjectId::new();
    let after = chrono::Utc::now().timestamp();
    let ts = id.timestamp().timestamp();
    assert!(ts >= before && ts <= after);
}

#[test]
fn ids_from_same_process_share_middle_bytes() {
    let a = ObjectId::new().bytes();
    let b = ObjectId::new().bytes();
    assert_eq!(a[4..9], b[4..9]);
}

// ── Parsing ───────────────────────────────────────────────────────

#[test]
fn parse_and_display_roundtrip() {
    let id = ObjectId::parse(HEX).unwrap();
    assert_eq!(id.to_string(), HEX);
    assert_eq!(id.to_hex(), HEX);
}

#[test]
fn parse_accepts_upper_case() {
    let id = ObjectId::parse(&HEX.to_uppercase()).unwrap();
    assert_eq!(id.to_string(), HEX);
}

#[test]
fn parse_rejects_wrong_length() {
    assert!(ObjectId::parse("abc").is_err());
    assert!(ObjectId::parse(&format!("{HEX}00")).is_err());
    assert!(ObjectId::parse("").is_err());
}

#[test]
fn parse_rejects_non_hex() {
    assert!(ObjectId::parse("zz1d7a3b9c0e4a2b1c3d4e5f").is_err());
}

#[test]
fn from_str_matches_parse() {
    assert_eq!(ObjectId::from_str(HEX).unwrap(), ObjectId::parse(HEX).unwrap());
}

#[test]
fn error_message_names_input() {
    let err = ObjectId::parse("nope").unwrap_err();
    assert!(err.to_string().contains("nope"));
}

#[test]
fn timestamp_reads_leading_bytes() {
    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&1_600_000_000u32.to_be_bytes());
    let id = ObjectId::from_bytes(bytes);
    assert_eq!(id.timestamp().timestamp(), 1_600_000_000);
}

// ── JSON ──────────────────────────────────────────────────────────

#[test]
fn from_json_string() {
    let id = ObjectId::from_json(&json!(HEX)).unwrap();
    assert_eq!(id.map(|i| i.to_hex()), Some(HEX.to_string()));
}

#[test]
fn from_json_extended_oid() {
    let id = ObjectId::from_json(&json!({ "$oid": HEX })).unwrap();
    assert_eq!(id, Some(ObjectId::parse(HEX).unwrap()));
}

#[test]
fn from_json_null_is_none() {
    assert_eq!(ObjectId::from_json(&json!(null)).unwrap(), None);
}

#[test]
fn from_json_rejects_other_shapes() {
    assert!(ObjectId::from_json(&json!(42)).is_err());
    assert!(ObjectId::from_json(&json!([HEX])).is_err());
    assert!(ObjectId::from_json(&json!({ "$oid": 1 })).is_err());
    assert!(ObjectId::from_json(&json!({ "$oid": HEX, "x": 1 })).is_err());
}

#[test]
fn serde_uses_hex_string() {
    let id = ObjectId::parse(HEX).unwrap();
    let json = serde_json::to_value(id).unwrap();
    assert_eq!(json, json!(HEX));
    let back: ObjectId = serde_json::from_value(json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn serde_rejects_malformed() {
    let res: Result<ObjectId, _> = serde_json::from_value(json!("not-an-id"));
    assert!(res.is_err());
}
