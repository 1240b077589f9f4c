use oarr_model::{FieldValue, ListField, MetadataField, Register, TextField, DEFAULT_LANG};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::str::FromStr;

fn default_count(reg: &Register) -> usize {
    reg.metadata().iter().filter(|r| r.is_default()).count()
}

// ── Default record ───────────────────────────────────────────────

#[test]
fn first_record_becomes_default() {
    let mut reg = Register::default();
    reg.set_text(TextField::Name, "Repo", Some("fr"));
    let default = reg.metadata().default_record().unwrap();
    assert_eq!(default.lang(), "fr");
    assert_eq!(default_count(&reg), 1);
}

#[test]
fn unqualified_write_on_empty_register_creates_default_lang() {
    let mut reg = Register::default();
    reg.set_text(TextField::Twitter, "@repo", None);
    assert_eq!(reg.metadata().default_record().unwrap().lang(), DEFAULT_LANG);
    assert_eq!(reg.twitter(), Some("@repo"));
}

#[test]
fn later_languages_are_not_default() {
    let mut reg = Register::default();
    reg.set_text(TextField::Name, "Repo", Some("en"));
    reg.set_text(TextField::Name, "Dépôt", Some("fr"));
    assert_eq!(reg.metadata().len(), 2);
    assert!(!reg.metadata().for_lang("fr").unwrap().is_default());
    assert_eq!(default_count(&reg), 1);
}

#[test]
fn set_default_language_moves_flag() {
    let mut reg = Register::default();
    reg.set_text(TextField::Name, "Repo", Some("en"));
    reg.set_text(TextField::Name, "Dépôt", Some("fr"));
    reg.set_default_language("fr");
    assert_eq!(reg.metadata().default_record().unwrap().lang(), "fr");
    assert_eq!(reg.name(), Some("Dépôt"));
    assert_eq!(default_count(&reg), 1);
}

#[test]
fn set_default_language_creates_missing_record() {
    let mut reg = Register::default();
    reg.set_text(TextField::Name, "Repo", Some("en"));
    reg.set_default_language("de");
    assert_eq!(reg.metadata().len(), 2);
    assert_eq!(reg.metadata().default_record().unwrap().lang(), "de");
    assert_eq!(reg.name(), None);
}

// ── Fallback ─────────────────────────────────────────────────────

#[test]
fn missing_language_falls_back_to_default() {
    let mut reg = Register::default();
    reg.set_text(TextField::Name, "Repo", None);
    assert_eq!(reg.text(TextField::Name, Some("es")), Some("Repo"));
}

#[test]
fn fallback_is_per_field() {
    let mut reg = Register::default();
    reg.set_text(TextField::Name, "Repo", Some("en"));
    reg.set_text(TextField::Description, "English description", Some("en"));
    reg.set_text(TextField::Name, "Dépôt", Some("fr"));

    assert_eq!(reg.text(TextField::Name, Some("fr")), Some("Dépôt"));
    assert_eq!(reg.text(TextField::Description, Some("fr")), Some("English description"));
}

#[test]
fn metadata_for_returns_default_when_language_missing() {
    let mut reg = Register::default();
    reg.set_text(TextField::Name, "Repo", Some("en"));
    assert_eq!(reg.metadata().metadata_for("ja").unwrap().lang(), "en");
    assert_eq!(reg.metadata().metadata_for("en").unwrap().lang(), "en");
}

#[test]
fn empty_register_reads_none() {
    let reg = Register::default();
    assert_eq!(reg.name(), None);
    assert_eq!(reg.get_field(ListField::RepositoryType, Some("en")), None);
}

// ── Generic accessors ────────────────────────────────────────────

#[test]
fn get_and_set_field_by_parsed_key() {
    let mut reg = Register::default();
    let field = MetadataField::from_str("content_type").unwrap();
    reg.set_field(field, vec!["Theses"], None).unwrap();
    assert_eq!(
        reg.get_field(field, None),
        Some(FieldValue::List(vec!["Theses".to_string()]))
    );
}

#[test]
fn unknown_key_is_rejected() {
    assert!(MetadataField::from_str("colour").is_err());
}

#[test]
fn shape_mismatch_is_rejected() {
    let mut reg = Register::default();
    assert!(reg.set_field(TextField::Name, vec!["a"], None).is_err());
    assert!(reg.set_field(ListField::Language, "English", None).is_err());
    assert!(reg.metadata().is_empty());
}

#[test]
fn field_keys_match_wire_names() {
    assert_eq!(MetadataField::from(TextField::CountryCode).key(), "country_code");
    assert_eq!(MetadataField::from(ListField::RepositoryType).to_string(), "repository_type");
}

// ── List helpers ─────────────────────────────────────────────────

#[test]
fn add_repository_type_dedups() {
    let mut reg = Register::default();
    assert!(reg.add_repository_type("Institutional", None));
    assert!(!reg.add_repository_type("Institutional", None));
    assert!(reg.add_repository_type("Governmental", None));
    assert_eq!(
        reg.repository_type().unwrap(),
        ["Institutional".to_string(), "Governmental".to_string()]
    );
}

#[test]
fn add_to_language_list_starts_from_default_view() {
    let mut reg = Register::default();
    reg.add_content_type("Theses", Some("en"));
    reg.add_content_type("Articles", Some("fr"));
    assert_eq!(
        reg.list(ListField::ContentType, Some("fr")).unwrap(),
        ["Theses".to_string(), "Articles".to_string()]
    );
    assert_eq!(reg.content_type().unwrap(), ["Theses".to_string()]);
}

#[test]
fn add_language_sets_name_and_code() {
    let mut reg = Register::default();
    reg.add_language(Some("English"), Some("en"), None);
    reg.add_language(Some("English"), Some("eng"), None);
    assert_eq!(reg.language().unwrap(), ["English".to_string()]);
    assert_eq!(reg.language_code().unwrap(), ["en".to_string(), "eng".to_string()]);
}

// ── Loading ──────────────────────────────────────────────────────

#[test]
fn repeated_language_records_are_folded_on_load() {
    let reg: Register = serde_json::from_value(serde_json::json!({
        "metadata": [
            {"lang": "en", "record": {"name": "First", "repository_type": ["Institutional"]}},
            {"lang": "fr", "default": true, "record": {"name": "Dépôt"}},
            {"lang": "en", "record": {"name": "Second", "description": "Later", "subject": [{"term": "Science"}]}}
        ]
    }))
    .unwrap();

    assert_eq!(reg.metadata().len(), 2);
    assert_eq!(default_count(&reg), 1);
    assert_eq!(reg.metadata().default_record().unwrap().lang(), "fr");

    let en = reg.metadata().for_lang("en").unwrap().fields();
    assert_eq!(en.text(TextField::Name), Some("First"));
    assert_eq!(en.text(TextField::Description), Some("Later"));
    assert_eq!(en.list(ListField::RepositoryType), Some(&["Institutional".to_string()][..]));
    assert!(en.extra.contains_key("subject"));
}

#[test]
fn repeated_default_language_keeps_its_flag() {
    let reg: Register = serde_json::from_value(serde_json::json!({
        "metadata": [
            {"lang": "en", "record": {"name": "Repo"}},
            {"lang": "fr", "record": {"name": "Dépôt"}},
            {"lang": "fr", "default": true, "record": {}}
        ]
    }))
    .unwrap();

    assert_eq!(reg.metadata().len(), 2);
    assert_eq!(reg.metadata().default_record().unwrap().lang(), "fr");
    assert_eq!(reg.name(), Some("Dépôt"));
}

// ── Invariant under arbitrary writes ─────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Write(Option<String>),
    AddType(Option<String>),
    MakeDefault(String),
}

fn lang_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["en", "fr", "de", "es", "ja"]).prop_map(str::to_string)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::option::of(lang_strategy()).prop_map(Op::Write),
        prop::option::of(lang_strategy()).prop_map(Op::AddType),
        lang_strategy().prop_map(Op::MakeDefault),
    ]
}

proptest! {
    #[test]
    fn exactly_one_default_after_every_operation(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut reg = Register::default();
        for op in ops {
            match op {
                Op::Write(lang) => reg.set_text(TextField::Name, "n", lang.as_deref()),
                Op::AddType(lang) => {
                    reg.add_repository_type("t", lang.as_deref());
                }
                Op::MakeDefault(lang) => reg.set_default_language(&lang),
            }
            prop_assert_eq!(default_count(&reg), 1);
        }
    }

    #[test]
    fn languages_are_never_duplicated(langs in prop::collection::vec(lang_strategy(), 1..30)) {
        let mut reg = Register::default();
        for lang in &langs {
            reg.set_text(TextField::Description, lang.clone(), Some(lang.as_str()));
        }
        let mut seen: Vec<_> = reg.metadata().iter().map(|r| r.lang().to_string()).collect();
        let total = seen.len();
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), total);
    }
}
