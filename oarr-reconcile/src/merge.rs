//! Field-level merge of an incoming record into its canonical counterpart.
//!
//! The merge is driven by [`MERGE_POLICY`], a table mapping each mergeable
//! field to one of three policies:
//!
//! - **prefer existing**: the canonical value wins; an absent value is filled
//!   from the incoming record
//! - **union**: list values are combined, existing order first, duplicates
//!   dropped
//! - **identity-matched append**: incoming entries are appended unless an
//!   existing entry has the same identity (email, URL closure, API type and
//!   URL closure, normalised software name)
//!
//! Merging is not commutative and is idempotent: merging the same incoming
//! record twice yields the same result as merging it once.

use oarr_model::{
    CanonicalRecord, CountryLookup, IncomingRecord, IsoCountries, ListField, Register, TextField,
};
use std::sync::Arc;
use tracing::debug;

/// A single-valued field merged with prefer-existing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Metadata(TextField),
    OperationalStatus,
}

/// A list section of the register whose entries carry an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Contact,
    Organisation,
    Software,
    Api,
}

/// How one field is folded into the canonical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    PreferExisting(ScalarField),
    UnionDedup(ListField),
    IdentityMatchedAppend(Collection),
}

impl FieldPolicy {
    /// Name of the field in the stored document.
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::PreferExisting(ScalarField::Metadata(f)) => f.key(),
            Self::PreferExisting(ScalarField::OperationalStatus) => "operational_status",
            Self::UnionDedup(f) => f.key(),
            Self::IdentityMatchedAppend(Collection::Contact) => "contact",
            Self::IdentityMatchedAppend(Collection::Organisation) => "organisation",
            Self::IdentityMatchedAppend(Collection::Software) => "software",
            Self::IdentityMatchedAppend(Collection::Api) => "api",
        }
    }
}

/// The registry's merge policy, applied in order.
///
/// `country_code` stands for the country pair: when adopted, the country name
/// is derived through the country lookup.
pub const MERGE_POLICY: &[FieldPolicy] = &[
    FieldPolicy::UnionDedup(ListField::RepositoryType),
    FieldPolicy::UnionDedup(ListField::ContentType),
    FieldPolicy::PreferExisting(ScalarField::OperationalStatus),
    FieldPolicy::IdentityMatchedAppend(Collection::Contact),
    FieldPolicy::PreferExisting(ScalarField::Metadata(TextField::Name)),
    FieldPolicy::IdentityMatchedAppend(Collection::Api),
    FieldPolicy::PreferExisting(ScalarField::Metadata(TextField::Twitter)),
    FieldPolicy::PreferExisting(ScalarField::Metadata(TextField::Description)),
    FieldPolicy::IdentityMatchedAppend(Collection::Organisation),
    FieldPolicy::PreferExisting(ScalarField::Metadata(TextField::CountryCode)),
    FieldPolicy::IdentityMatchedAppend(Collection::Software),
];

/// Applies a merge policy table for one ingesting system.
#[derive(Clone)]
pub struct MergeEngine {
    namespace: String,
    countries: Arc<dyn CountryLookup>,
}

impl std::fmt::Debug for MergeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeEngine")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl MergeEngine {
    /// Creates an engine owning the admin `namespace`, using [`MERGE_POLICY`]
    /// and the ISO 3166 country table.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            countries: Arc::new(IsoCountries),
        }
    }

    #[must_use]
    pub fn with_country_lookup(mut self, countries: Arc<dyn CountryLookup>) -> Self {
        self.countries = countries;
        self
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Folds `incoming` into `existing` and returns the merged record.
    ///
    /// Identity fields (`id`, `created_date`, `last_updated`) are carried over
    /// from `existing` untouched.
    #[must_use]
    pub fn merge(&self, mut existing: CanonicalRecord, incoming: &IncomingRecord) -> CanonicalRecord {
        self.merge_into(&mut existing, incoming);
        existing
    }

    /// In-place variant of [`merge`](Self::merge). Returns the number of
    /// register fields and entries that changed.
    pub fn merge_into(&self, existing: &mut CanonicalRecord, incoming: &IncomingRecord) -> usize {
        let mut changes = 0;
        for policy in MERGE_POLICY {
            let changed = self.apply(*policy, &mut existing.register, &incoming.register);
            if changed > 0 {
                debug!("Merged {} ({} change(s))", policy.field_name(), changed);
            }
            changes += changed;
        }

        // Our own namespace is replaced wholesale; other systems' payloads stay.
        if let Some(payload) = incoming.get_admin(&self.namespace) {
            existing.set_admin(self.namespace.clone(), payload.clone());
        }
        changes
    }

    fn apply(&self, policy: FieldPolicy, existing: &mut Register, incoming: &Register) -> usize {
        match policy {
            FieldPolicy::UnionDedup(field) => usize::from(union_list(existing, incoming, field)),
            FieldPolicy::PreferExisting(ScalarField::OperationalStatus) => {
                if existing.operational_status().is_some() {
                    return 0;
                }
                match incoming.operational_status() {
                    Some(status) => {
                        existing.set_operational_status(status.clone());
                        1
                    }
                    None => 0,
                }
            }
            FieldPolicy::PreferExisting(ScalarField::Metadata(TextField::CountryCode)) => {
                usize::from(self.adopt_country(existing, incoming))
            }
            FieldPolicy::PreferExisting(ScalarField::Metadata(field)) => {
                usize::from(prefer_existing(existing, incoming, field))
            }
            FieldPolicy::IdentityMatchedAppend(collection) => append_unknown(existing, incoming, collection),
        }
    }

    /// Adopts the incoming country when the canonical record has no code. A
    /// country name already on the canonical record is kept; the missing side
    /// of the pair is derived through the lookup.
    fn adopt_country(&self, existing: &mut Register, incoming: &Register) -> bool {
        if present(existing.country_code()).is_some() {
            return false;
        }
        let code = present(incoming.country_code());
        let name = present(existing.country()).or_else(|| present(incoming.country()));
        if code.is_none() && present(incoming.country()).is_none() {
            return false;
        }
        let (name, code) = (name.map(str::to_string), code.map(str::to_string));
        existing.set_country(name.as_deref(), code.as_deref(), None, self.countries.as_ref());
        present(existing.country_code()).is_some()
    }
}

/// Merges with [`MERGE_POLICY`] on behalf of `namespace`.
#[must_use]
pub fn merge(existing: CanonicalRecord, incoming: &IncomingRecord, namespace: &str) -> CanonicalRecord {
    MergeEngine::new(namespace).merge(existing, incoming)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn prefer_existing(existing: &mut Register, incoming: &Register, field: TextField) -> bool {
    if present(existing.text(field, None)).is_some() {
        return false;
    }
    match present(incoming.text(field, None)) {
        Some(value) => {
            existing.set_text(field, value, None);
            true
        }
        None => false,
    }
}

fn union_list(existing: &mut Register, incoming: &Register, field: ListField) -> bool {
    let current = existing.list(field, None).unwrap_or_default();
    let additions = incoming.list(field, None).unwrap_or_default();
    if current.is_empty() && additions.is_empty() {
        return false;
    }

    let mut merged: Vec<String> = Vec::with_capacity(current.len() + additions.len());
    for value in current.iter().chain(additions) {
        if !merged.contains(value) {
            merged.push(value.clone());
        }
    }
    if merged.as_slice() == current {
        return false;
    }
    existing.set_list(field, merged, None);
    true
}

fn append_unknown(existing: &mut Register, incoming: &Register, collection: Collection) -> usize {
    match collection {
        Collection::Contact => count(incoming.contact().iter().map(|c| existing.add_contact(c.clone()))),
        Collection::Organisation => count(
            incoming
                .organisation()
                .iter()
                .map(|o| existing.add_affiliation(o.clone())),
        ),
        Collection::Software => count(
            incoming
                .software()
                .iter()
                .map(|s| existing.add_software_descriptor(s.clone())),
        ),
        Collection::Api => count(incoming.apis().iter().map(|a| existing.add_api_endpoint(a.clone()))),
    }
}

fn count(added: impl Iterator<Item = bool>) -> usize {
    added.filter(|&added| added).count()
}
