//! Multilingual metadata.
//!
//! A register carries one [`MetadataRecord`] per language. Exactly one of them
//! is the default once any exist; reads for a language fall back to the
//! default record field by field. [`Metadata`] owns the records and is the only
//! way to create or re-flag them, so the invariant holds after every call and
//! after deserialising a stored record.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Language of the record created when a default is needed and none exists.
pub const DEFAULT_LANG: &str = "en";

/// Language-scoped scalar attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    Description,
    Url,
    Twitter,
    Country,
    CountryCode,
    Continent,
    ContinentCode,
}

impl TextField {
    pub const ALL: [Self; 8] = [
        Self::Name,
        Self::Description,
        Self::Url,
        Self::Twitter,
        Self::Country,
        Self::CountryCode,
        Self::Continent,
        Self::ContinentCode,
    ];

    /// JSON key inside a metadata record.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Url => "url",
            Self::Twitter => "twitter",
            Self::Country => "country",
            Self::CountryCode => "country_code",
            Self::Continent => "continent",
            Self::ContinentCode => "continent_code",
        }
    }
}

/// Language-scoped list attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    Language,
    LanguageCode,
    RepositoryType,
    ContentType,
}

impl ListField {
    pub const ALL: [Self; 4] = [
        Self::Language,
        Self::LanguageCode,
        Self::RepositoryType,
        Self::ContentType,
    ];

    /// JSON key inside a metadata record.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::LanguageCode => "language_code",
            Self::RepositoryType => "repository_type",
            Self::ContentType => "content_type",
        }
    }
}

/// Any metadata attribute, scalar or list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    Text(TextField),
    List(ListField),
}

impl MetadataField {
    /// JSON key inside a metadata record.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Text(f) => f.key(),
            Self::List(f) => f.key(),
        }
    }
}

impl From<TextField> for MetadataField {
    fn from(field: TextField) -> Self {
        Self::Text(field)
    }
}

impl From<ListField> for MetadataField {
    fn from(field: ListField) -> Self {
        Self::List(field)
    }
}

impl FromStr for MetadataField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(f) = TextField::ALL.into_iter().find(|f| f.key() == s) {
            return Ok(Self::Text(f));
        }
        ListField::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .map(Self::List)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A metadata value as read or written through the generic accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

/// The attributes of one language's metadata record (`record` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_type: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<Vec<String>>,
    /// Attributes this model does not interpret (subjects, policies, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataFields {
    #[must_use]
    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Name => self.name.as_deref(),
            TextField::Description => self.description.as_deref(),
            TextField::Url => self.url.as_deref(),
            TextField::Twitter => self.twitter.as_deref(),
            TextField::Country => self.country.as_deref(),
            TextField::CountryCode => self.country_code.as_deref(),
            TextField::Continent => self.continent.as_deref(),
            TextField::ContinentCode => self.continent_code.as_deref(),
        }
    }

    #[must_use]
    pub fn list(&self, field: ListField) -> Option<&[String]> {
        match field {
            ListField::Language => self.language.as_deref(),
            ListField::LanguageCode => self.language_code.as_deref(),
            ListField::RepositoryType => self.repository_type.as_deref(),
            ListField::ContentType => self.content_type.as_deref(),
        }
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        *self.text_slot(field) = Some(value.into());
    }

    pub fn set_list(&mut self, field: ListField, value: Vec<String>) {
        *self.list_slot(field) = Some(value);
    }

    /// Fills fields absent here from `other`; values already set win.
    fn absorb(&mut self, other: Self) {
        for field in TextField::ALL {
            let slot = self.text_slot(field);
            if slot.is_none() {
                *slot = other.text(field).map(str::to_string);
            }
        }
        for field in ListField::ALL {
            let slot = self.list_slot(field);
            if slot.is_none() {
                *slot = other.list(field).map(<[String]>::to_vec);
            }
        }
        for (key, value) in other.extra {
            self.extra.entry(key).or_insert(value);
        }
    }

    fn text_slot(&mut self, field: TextField) -> &mut Option<String> {
        match field {
            TextField::Name => &mut self.name,
            TextField::Description => &mut self.description,
            TextField::Url => &mut self.url,
            TextField::Twitter => &mut self.twitter,
            TextField::Country => &mut self.country,
            TextField::CountryCode => &mut self.country_code,
            TextField::Continent => &mut self.continent,
            TextField::ContinentCode => &mut self.continent_code,
        }
    }

    fn list_slot(&mut self, field: ListField) -> &mut Option<Vec<String>> {
        match field {
            ListField::Language => &mut self.language,
            ListField::LanguageCode => &mut self.language_code,
            ListField::RepositoryType => &mut self.repository_type,
            ListField::ContentType => &mut self.content_type,
        }
    }
}

/// One language's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    lang: String,
    #[serde(default)]
    default: bool,
    #[serde(default)]
    record: MetadataFields,
}

impl MetadataRecord {
    fn new(lang: &str, default: bool) -> Self {
        Self {
            lang: lang.to_string(),
            default,
            record: MetadataFields::default(),
        }
    }

    #[must_use]
    pub fn lang(&self) -> &str {
        &self.lang
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.default
    }

    #[must_use]
    pub fn fields(&self) -> &MetadataFields {
        &self.record
    }
}

/// The ordered set of metadata records of a register.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<MetadataRecord>", into = "Vec<MetadataRecord>")]
pub struct Metadata {
    records: Vec<MetadataRecord>,
}

impl From<Vec<MetadataRecord>> for Metadata {
    /// Normalises stored data. Records repeating a language are folded into
    /// the first record for it. The first flagged record stays default and
    /// other flags are cleared; with no flag at all the first record becomes
    /// default.
    fn from(raw: Vec<MetadataRecord>) -> Self {
        let mut records: Vec<MetadataRecord> = Vec::with_capacity(raw.len());
        for record in raw {
            match records.iter_mut().find(|r| r.lang == record.lang) {
                Some(first) => {
                    debug!("Folding repeated metadata record for {} into the first", record.lang);
                    first.default |= record.default;
                    first.record.absorb(record.record);
                }
                None => records.push(record),
            }
        }

        match records.iter().position(|r| r.default) {
            Some(keep) => {
                for (i, record) in records.iter_mut().enumerate() {
                    if record.default && i != keep {
                        debug!("Clearing extra default flag on metadata record {}", record.lang);
                        record.default = false;
                    }
                }
            }
            None => {
                if let Some(first) = records.first_mut() {
                    debug!("No default metadata record; promoting {}", first.lang);
                    first.default = true;
                }
            }
        }
        Self { records }
    }
}

impl From<Metadata> for Vec<MetadataRecord> {
    fn from(metadata: Metadata) -> Self {
        metadata.records
    }
}

impl Metadata {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataRecord> {
        self.records.iter()
    }

    /// The default record, if any metadata exists.
    #[must_use]
    pub fn default_record(&self) -> Option<&MetadataRecord> {
        self.records.iter().find(|r| r.default)
    }

    /// The record for exactly this language.
    #[must_use]
    pub fn for_lang(&self, lang: &str) -> Option<&MetadataRecord> {
        self.records.iter().find(|r| r.lang == lang)
    }

    /// The record for `lang`, or the default record when that language has none.
    #[must_use]
    pub fn metadata_for(&self, lang: &str) -> Option<&MetadataRecord> {
        self.for_lang(lang).or_else(|| self.default_record())
    }

    /// Reads a scalar field with per-field fallback to the default record.
    #[must_use]
    pub fn text(&self, field: TextField, lang: Option<&str>) -> Option<&str> {
        lang.and_then(|l| self.for_lang(l))
            .and_then(|r| r.record.text(field))
            .or_else(|| self.default_record().and_then(|r| r.record.text(field)))
    }

    /// Reads a list field with per-field fallback to the default record.
    #[must_use]
    pub fn list(&self, field: ListField, lang: Option<&str>) -> Option<&[String]> {
        lang.and_then(|l| self.for_lang(l))
            .and_then(|r| r.record.list(field))
            .or_else(|| self.default_record().and_then(|r| r.record.list(field)))
    }

    /// Reads any field with per-field fallback to the default record.
    #[must_use]
    pub fn get(&self, field: MetadataField, lang: Option<&str>) -> Option<FieldValue> {
        match field {
            MetadataField::Text(f) => self.text(f, lang).map(|s| FieldValue::Text(s.to_string())),
            MetadataField::List(f) => self.list(f, lang).map(|l| FieldValue::List(l.to_vec())),
        }
    }

    /// Writes any field. Fails if the value's shape does not match the field.
    pub fn set(
        &mut self,
        field: MetadataField,
        value: FieldValue,
        lang: Option<&str>,
    ) -> ModelResult<()> {
        match (field, value) {
            (MetadataField::Text(f), FieldValue::Text(v)) => self.set_text(f, v, lang),
            (MetadataField::List(f), FieldValue::List(v)) => self.set_list(f, v, lang),
            (MetadataField::Text(f), FieldValue::List(_)) => {
                return Err(ModelError::FieldShape {
                    field: f.key(),
                    expected: "text",
                });
            }
            (MetadataField::List(f), FieldValue::Text(_)) => {
                return Err(ModelError::FieldShape {
                    field: f.key(),
                    expected: "list",
                });
            }
        }
        Ok(())
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>, lang: Option<&str>) {
        self.target_mut(lang).record.set_text(field, value);
    }

    pub fn set_list(&mut self, field: ListField, value: Vec<String>, lang: Option<&str>) {
        self.target_mut(lang).record.set_list(field, value);
    }

    /// Appends `value` to a list field unless already present.
    ///
    /// The language's current view (including the default fallback) is the
    /// starting point, so a new language record does not hide the default's
    /// values. Returns true if the value was added.
    pub fn add_to_list(&mut self, field: ListField, value: &str, lang: Option<&str>) -> bool {
        let mut values = self.list(field, lang).map(<[String]>::to_vec).unwrap_or_default();
        if values.iter().any(|v| v == value) {
            return false;
        }
        values.push(value.to_string());
        self.set_list(field, values, lang);
        true
    }

    /// Makes `lang` the default language, creating its record if needed. The
    /// previous default is un-flagged in the same step.
    pub fn set_default_language(&mut self, lang: &str) {
        let target = self.position_or_insert(lang);
        for (i, record) in self.records.iter_mut().enumerate() {
            record.default = i == target;
        }
    }

    /// Every non-empty `url` across all languages.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter_map(|r| r.record.url.as_deref())
            .filter(|u| !u.trim().is_empty())
    }

    fn target_mut(&mut self, lang: Option<&str>) -> &mut MetadataRecord {
        let i = match lang {
            Some(l) => self.position_or_insert(l),
            None => match self.records.iter().position(|r| r.default) {
                Some(i) => i,
                None => self.position_or_insert(DEFAULT_LANG),
            },
        };
        &mut self.records[i]
    }

    fn position_or_insert(&mut self, lang: &str) -> usize {
        if let Some(i) = self.records.iter().position(|r| r.lang == lang) {
            return i;
        }
        let default = self.records.is_empty();
        self.records.push(MetadataRecord::new(lang, default));
        self.records.len() - 1
    }
}
