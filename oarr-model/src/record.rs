//! Canonical and incoming registry records.

use crate::register::Register;
use oarr_types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Key, inside an admin payload, of the source-side last-modified timestamp.
pub const LAST_MODIFIED_KEY: &str = "last_modified";

/// Opaque payload owned by one ingesting system.
pub type AdminPayload = Map<String, Value>;

/// Provenance payloads keyed by ingesting-system namespace.
///
/// The reconciler only ever reads and replaces its own namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Admin(BTreeMap<String, AdminPayload>);

impl Admin {
    #[must_use]
    pub fn get(&self, namespace: &str) -> Option<&AdminPayload> {
        self.0.get(namespace)
    }

    /// Replaces the namespace's payload wholesale.
    pub fn set(&mut self, namespace: impl Into<String>, payload: AdminPayload) {
        self.0.insert(namespace.into(), payload);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `last_modified` timestamp recorded in a namespace, if present and
    /// parseable.
    #[must_use]
    pub fn last_modified(&self, namespace: &str) -> Option<Timestamp> {
        let raw = self.get(namespace)?.get(LAST_MODIFIED_KEY)?.as_str()?;
        match Timestamp::parse(raw) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!("Ignoring unparseable {} in admin.{}: {}", LAST_MODIFIED_KEY, namespace, e);
                None
            }
        }
    }
}

/// The persisted, deduplicated record of one repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated: Option<String>,
    #[serde(default)]
    pub register: Register,
    #[serde(default, skip_serializing_if = "Admin::is_empty")]
    admin: Admin,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl CanonicalRecord {
    #[must_use]
    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    /// Store-assigned creation date, verbatim.
    #[must_use]
    pub fn created_date_raw(&self) -> Option<&str> {
        self.created_date.as_deref()
    }

    /// Store-assigned last-update date, verbatim.
    #[must_use]
    pub fn last_updated_raw(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    #[must_use]
    pub fn created_date(&self) -> Option<Timestamp> {
        self.created_date.as_deref().and_then(|d| Timestamp::parse(d).ok())
    }

    #[must_use]
    pub fn last_updated(&self) -> Option<Timestamp> {
        self.last_updated.as_deref().and_then(|d| Timestamp::parse(d).ok())
    }

    #[must_use]
    pub fn admin(&self) -> &Admin {
        &self.admin
    }

    #[must_use]
    pub fn get_admin(&self, namespace: &str) -> Option<&AdminPayload> {
        self.admin.get(namespace)
    }

    /// Replaces one namespace's payload; other namespaces are untouched.
    pub fn set_admin(&mut self, namespace: impl Into<String>, payload: AdminPayload) {
        self.admin.set(namespace, payload);
    }

    /// When this namespace last reconciled the record, from its admin payload.
    #[must_use]
    pub fn last_reconciled(&self, namespace: &str) -> Option<Timestamp> {
        self.admin.last_modified(namespace)
    }

    /// Records store-side persistence: sets the store's id, the creation date
    /// if absent, and `last_updated`. Only store implementations call this.
    pub fn mark_persisted(&mut self, id: RecordId, at: Timestamp) {
        self.id = Some(id);
        self.created_date.get_or_insert_with(|| at.to_wire());
        self.last_updated = Some(at.to_wire());
    }
}

/// A crosswalked observation of a repository from one source feed.
///
/// Carries no id; the reconciler reads it and never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomingRecord {
    #[serde(default)]
    pub register: Register,
    #[serde(default, skip_serializing_if = "Admin::is_empty")]
    pub admin: Admin,
}

impl IncomingRecord {
    #[must_use]
    pub fn admin(&self) -> &Admin {
        &self.admin
    }

    #[must_use]
    pub fn get_admin(&self, namespace: &str) -> Option<&AdminPayload> {
        self.admin.get(namespace)
    }

    pub fn set_admin(&mut self, namespace: impl Into<String>, payload: AdminPayload) {
        self.admin.set(namespace, payload);
    }

    /// The home-page URL used for identity, if non-blank.
    #[must_use]
    pub fn home_page(&self) -> Option<&str> {
        self.register.url().filter(|u| !u.trim().is_empty())
    }

    /// The source feed's last-modified timestamp, from this namespace's payload.
    #[must_use]
    pub fn source_timestamp(&self, namespace: &str) -> Option<Timestamp> {
        self.admin.last_modified(namespace)
    }
}

impl From<IncomingRecord> for CanonicalRecord {
    /// A first-seen entity becomes a canonical record as-is.
    fn from(incoming: IncomingRecord) -> Self {
        Self {
            register: incoming.register,
            admin: incoming.admin,
            ..Default::default()
        }
    }
}
