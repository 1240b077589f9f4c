//! The descriptive section of a registry record.

use crate::country::CountryLookup;
use crate::entries::{Affiliation, ApiEndpoint, Contact, SoftwareDescriptor};
use crate::error::ModelResult;
use crate::metadata::{FieldValue, ListField, Metadata, MetadataField, TextField};
use crate::status::OperationalStatus;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// `register` section shared by canonical and incoming records.
///
/// List sections are private: insertions go through the dedup-aware `add_*`
/// methods, and lists read from JSON are deduplicated with the same identity
/// rules on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Register {
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "unique_entries")]
    api: Vec<ApiEndpoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "unique_entries")]
    organisation: Vec<Affiliation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "unique_entries")]
    contact: Vec<Contact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "unique_entries")]
    software: Vec<SoftwareDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flagged_status")]
    operational_status: Option<OperationalStatus>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Register {
    // ── Metadata ─────────────────────────────────────────────────────

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Reads a metadata field; `lang = None` reads the default record.
    #[must_use]
    pub fn get_field(&self, field: impl Into<MetadataField>, lang: Option<&str>) -> Option<FieldValue> {
        self.metadata.get(field.into(), lang)
    }

    /// Writes a metadata field; `lang = None` writes the default record.
    pub fn set_field(
        &mut self,
        field: impl Into<MetadataField>,
        value: impl Into<FieldValue>,
        lang: Option<&str>,
    ) -> ModelResult<()> {
        self.metadata.set(field.into(), value.into(), lang)
    }

    #[must_use]
    pub fn text(&self, field: TextField, lang: Option<&str>) -> Option<&str> {
        self.metadata.text(field, lang)
    }

    #[must_use]
    pub fn list(&self, field: ListField, lang: Option<&str>) -> Option<&[String]> {
        self.metadata.list(field, lang)
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>, lang: Option<&str>) {
        self.metadata.set_text(field, value, lang);
    }

    pub fn set_list(&mut self, field: ListField, value: Vec<String>, lang: Option<&str>) {
        self.metadata.set_list(field, value, lang);
    }

    pub fn set_default_language(&mut self, lang: &str) {
        self.metadata.set_default_language(lang);
    }

    /// Repository title in the default language.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.text(TextField::Name, None)
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.text(TextField::Description, None)
    }

    /// Repository home page in the default language.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.text(TextField::Url, None)
    }

    #[must_use]
    pub fn twitter(&self) -> Option<&str> {
        self.text(TextField::Twitter, None)
    }

    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.text(TextField::Country, None)
    }

    #[must_use]
    pub fn country_code(&self) -> Option<&str> {
        self.text(TextField::CountryCode, None)
    }

    #[must_use]
    pub fn continent(&self) -> Option<&str> {
        self.text(TextField::Continent, None)
    }

    #[must_use]
    pub fn continent_code(&self) -> Option<&str> {
        self.text(TextField::ContinentCode, None)
    }

    #[must_use]
    pub fn language(&self) -> Option<&[String]> {
        self.list(ListField::Language, None)
    }

    #[must_use]
    pub fn language_code(&self) -> Option<&[String]> {
        self.list(ListField::LanguageCode, None)
    }

    #[must_use]
    pub fn repository_type(&self) -> Option<&[String]> {
        self.list(ListField::RepositoryType, None)
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&[String]> {
        self.list(ListField::ContentType, None)
    }

    /// Sets country name and code, deriving whichever side is missing.
    ///
    /// The code is upper-cased. A failed lookup leaves the derived side unset.
    pub fn set_country(
        &mut self,
        name: Option<&str>,
        code: Option<&str>,
        lang: Option<&str>,
        lookup: &dyn CountryLookup,
    ) {
        let name = name.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string);
        let code = code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_ascii_uppercase);
        if name.is_none() && code.is_none() {
            return;
        }

        let name = name.or_else(|| code.as_deref().and_then(|c| lookup.name_for_code(c)));
        let code = code.or_else(|| name.as_deref().and_then(|n| lookup.code_for_name(n)));

        match name {
            Some(name) => self.set_text(TextField::Country, name, lang),
            None => debug!("No country name for code {:?}", code),
        }
        match code {
            Some(code) => self.set_text(TextField::CountryCode, code, lang),
            None => debug!("No country code for name {:?}", self.text(TextField::Country, lang)),
        }
    }

    pub fn set_continent(&mut self, name: Option<&str>, code: Option<&str>, lang: Option<&str>) {
        if let Some(name) = name {
            self.set_text(TextField::Continent, name, lang);
        }
        if let Some(code) = code {
            self.set_text(TextField::ContinentCode, code, lang);
        }
    }

    pub fn add_language(&mut self, name: Option<&str>, code: Option<&str>, lang: Option<&str>) {
        if let Some(name) = name {
            self.metadata.add_to_list(ListField::Language, name, lang);
        }
        if let Some(code) = code {
            self.metadata.add_to_list(ListField::LanguageCode, code, lang);
        }
    }

    /// Appends to a list field unless the value is already present.
    pub fn add_to_list(&mut self, field: ListField, value: &str, lang: Option<&str>) -> bool {
        self.metadata.add_to_list(field, value, lang)
    }

    pub fn add_repository_type(&mut self, value: &str, lang: Option<&str>) -> bool {
        self.metadata.add_to_list(ListField::RepositoryType, value, lang)
    }

    pub fn add_content_type(&mut self, value: &str, lang: Option<&str>) -> bool {
        self.metadata.add_to_list(ListField::ContentType, value, lang)
    }

    // ── Operational status ───────────────────────────────────────────

    #[must_use]
    pub fn operational_status(&self) -> Option<&OperationalStatus> {
        self.operational_status.as_ref()
    }

    /// Stores the status. Values outside the registry vocabulary are kept but
    /// logged.
    pub fn set_operational_status(&mut self, status: impl Into<OperationalStatus>) {
        let status = status.into();
        warn_if_unrecognised(&status);
        self.operational_status = Some(status);
    }

    // ── API endpoints ────────────────────────────────────────────────

    #[must_use]
    pub fn apis(&self) -> &[ApiEndpoint] {
        &self.api
    }

    /// Endpoints of one type, or all endpoints for `None`.
    pub fn api<'a>(&'a self, api_type: Option<&'a str>) -> impl Iterator<Item = &'a ApiEndpoint> + 'a {
        self.api
            .iter()
            .filter(move |a| api_type.is_none() || a.api_type.as_deref() == api_type)
    }

    /// Appends the endpoint unless a same-type, URL-equivalent one exists.
    pub fn add_api_endpoint(&mut self, endpoint: ApiEndpoint) -> bool {
        push_unique(&mut self.api, endpoint, ApiEndpoint::is_duplicate_of)
    }

    // ── Organisation ─────────────────────────────────────────────────

    #[must_use]
    pub fn organisation(&self) -> &[Affiliation] {
        &self.organisation
    }

    /// Appends the affiliation unless one with an equivalent URL exists.
    pub fn add_affiliation(&mut self, affiliation: Affiliation) -> bool {
        push_unique(&mut self.organisation, affiliation, Affiliation::is_duplicate_of)
    }

    // ── Contacts ─────────────────────────────────────────────────────

    #[must_use]
    pub fn contact(&self) -> &[Contact] {
        &self.contact
    }

    /// Appends the contact unless one with the same email exists.
    pub fn add_contact(&mut self, contact: Contact) -> bool {
        push_unique(&mut self.contact, contact, Contact::is_duplicate_of)
    }

    // ── Software ─────────────────────────────────────────────────────

    #[must_use]
    pub fn software(&self) -> &[SoftwareDescriptor] {
        &self.software
    }

    pub fn add_software(
        &mut self,
        name: impl Into<String>,
        version: Option<String>,
        url: Option<String>,
    ) -> bool {
        self.add_software_descriptor(SoftwareDescriptor::new(name, version, url))
    }

    /// Appends the descriptor unless one with the same normalised name exists.
    pub fn add_software_descriptor(&mut self, software: SoftwareDescriptor) -> bool {
        push_unique(&mut self.software, software, SoftwareDescriptor::is_duplicate_of)
    }

    // ── Unmodelled sections ──────────────────────────────────────────

    /// Register sections this model does not interpret (policies, ...).
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

fn push_unique<T>(list: &mut Vec<T>, item: T, is_duplicate: impl Fn(&T, &T) -> bool) -> bool {
    if list.iter().any(|existing| is_duplicate(existing, &item)) {
        return false;
    }
    list.push(item);
    true
}

fn warn_if_unrecognised(status: &OperationalStatus) {
    if !status.is_recognised() {
        warn!(
            "Operational status should be one of Operational, Trial, Broken or Closed, got {:?}",
            status.as_str()
        );
    }
}

fn flagged_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<OperationalStatus>, D::Error> {
    let status = Option::<OperationalStatus>::deserialize(deserializer)?;
    if let Some(status) = &status {
        warn_if_unrecognised(status);
    }
    Ok(status)
}

/// Identity rule shared by the register's list entries.
trait Entry {
    fn same_identity(&self, other: &Self) -> bool;
}

impl Entry for ApiEndpoint {
    fn same_identity(&self, other: &Self) -> bool {
        self.is_duplicate_of(other)
    }
}

impl Entry for Affiliation {
    fn same_identity(&self, other: &Self) -> bool {
        self.is_duplicate_of(other)
    }
}

impl Entry for Contact {
    fn same_identity(&self, other: &Self) -> bool {
        self.is_duplicate_of(other)
    }
}

impl Entry for SoftwareDescriptor {
    fn same_identity(&self, other: &Self) -> bool {
        self.is_duplicate_of(other)
    }
}

/// Reads a list section, keeping the first of any entries with the same
/// identity.
fn unique_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Entry,
{
    let raw = Vec::<T>::deserialize(deserializer)?;
    let total = raw.len();
    let mut entries = Vec::with_capacity(total);
    for entry in raw {
        push_unique(&mut entries, entry, T::same_identity);
    }
    if entries.len() < total {
        debug!("Dropped {} duplicate register entries on load", total - entries.len());
    }
    Ok(entries)
}
