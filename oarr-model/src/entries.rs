//! List entries of a register: API endpoints, affiliations, contacts, software.
//!
//! Each entry type knows its own identity rule through `is_duplicate_of`.
//! Entries lacking their identity key (no URL, no email) only collapse with a
//! structurally identical entry, so re-applying the same input never grows a
//! list.

use crate::url::urls_equivalent;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// A machine interface of a repository (OAI-PMH, SWORD, RSS, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiEndpoint {
    pub fn new(api_type: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            api_type: Some(api_type.into()),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        non_blank(self.base_url.as_ref())
    }

    /// Same type and URL-equivalent base URLs.
    #[must_use]
    pub fn is_duplicate_of(&self, other: &Self) -> bool {
        if self.api_type != other.api_type {
            return false;
        }
        match (self.base_url(), other.base_url()) {
            (Some(a), Some(b)) => urls_equivalent(a, b),
            _ => self == other,
        }
    }
}

/// Details of an organisation hosting or running a repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffiliationDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An organisation entry (`register.organisation[]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Affiliation {
    #[serde(default)]
    pub role: Vec<String>,
    #[serde(default)]
    pub details: AffiliationDetails,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Affiliation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            details: AffiliationDetails {
                name: Some(name.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.details.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role.push(role.into());
        self
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        non_blank(self.details.url.as_ref())
    }

    /// URL-equivalent home pages; entries without a URL never match by key.
    #[must_use]
    pub fn is_duplicate_of(&self, other: &Self) -> bool {
        match (self.url(), other.url()) {
            (Some(a), Some(b)) => urls_equivalent(a, b),
            _ => self == other,
        }
    }
}

/// Details of a contact person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A contact entry (`register.contact[]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub role: Vec<String>,
    #[serde(default)]
    pub details: ContactDetails,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Contact {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            details: ContactDetails {
                email: Some(email.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.details.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role.push(role.into());
        self
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        non_blank(self.details.email.as_ref())
    }

    /// Same email address (trimmed, case-insensitive).
    #[must_use]
    pub fn is_duplicate_of(&self, other: &Self) -> bool {
        match (self.email(), other.email()) {
            (Some(a), Some(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
            _ => self == other,
        }
    }
}

/// Repository platform software (`register.software[]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftwareDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SoftwareDescriptor {
    pub fn new(name: impl Into<String>, version: Option<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
            url,
            extra: Map::new(),
        }
    }

    /// Name used for identity: trimmed and lower-cased.
    #[must_use]
    pub fn normalised_name(&self) -> String {
        self.name.trim().to_lowercase()
    }

    #[must_use]
    pub fn is_duplicate_of(&self, other: &Self) -> bool {
        let (a, b) = (self.normalised_name(), other.normalised_name());
        if a.is_empty() || b.is_empty() {
            return self == other;
        }
        a == b
    }
}
