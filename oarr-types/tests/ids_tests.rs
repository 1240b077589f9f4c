use oarr_types::RecordId;
use std::collections::HashSet;
use std::str::FromStr;

// ── RecordId ──────────────────────────────────────────────────────

#[test]
fn generated_ids_are_unique() {
    let a = RecordId::generate();
    let b = RecordId::generate();
    assert_ne!(a, b);
}

#[test]
fn generated_ids_sort_by_creation() {
    let a = RecordId::generate();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let b = RecordId::generate();
    assert!(a < b);
}

#[test]
fn parse_trims_whitespace() {
    let id = RecordId::parse("  abc123 ").unwrap();
    assert_eq!(id.as_str(), "abc123");
}

#[test]
fn parse_rejects_blank() {
    assert!(RecordId::parse("").is_err());
    assert!(RecordId::parse("   ").is_err());
    assert!(RecordId::from_str("\t").is_err());
}

#[test]
fn display_matches_inner_string() {
    let id = RecordId::parse("rec-42").unwrap();
    assert_eq!(id.to_string(), "rec-42");
}

#[test]
fn info_uri_prefix_is_stripped() {
    assert_eq!(RecordId::from_info_uri("info:oarr:xyz").as_str(), "xyz");
    assert_eq!(RecordId::from_info_uri("xyz").as_str(), "xyz");
}

#[test]
fn serde_is_transparent() {
    let id = RecordId::parse("rec-1").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"rec-1\"");
    let back: RecordId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn hash_and_eq() {
    let id = RecordId::parse("same").unwrap();
    let mut set = HashSet::new();
    set.insert(id.clone());
    set.insert(id);
    assert_eq!(set.len(), 1);
}
