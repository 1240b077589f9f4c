//! Record store abstraction.
//!
//! The registry is a remote key-value document store with last-writer-wins
//! semantics. [`MemoryStore`] is an in-process implementation for tests and
//! dry runs.

use crate::error::StoreResult;
use async_trait::async_trait;
use oarr_model::{CanonicalRecord, UrlVariants};
use oarr_types::{RecordId, Timestamp};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Abstract registry store interface.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns one canonical record whose metadata `url` (any language) is one
    /// of `urls`, if any.
    async fn find_by_url_variants(&self, urls: &UrlVariants) -> StoreResult<Option<CanonicalRecord>>;

    /// Fetches a record by id.
    async fn get_record(&self, id: &RecordId) -> StoreResult<Option<CanonicalRecord>>;

    /// Persists a record, creating it when `id` is `None`. Returns the id the
    /// record is stored under.
    async fn save_record(
        &self,
        record: &CanonicalRecord,
        id: Option<&RecordId>,
    ) -> StoreResult<RecordId>;
}

/// In-memory record store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<RecordId, CanonicalRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of all records, ordered by id.
    pub async fn records(&self) -> Vec<CanonicalRecord> {
        self.records.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_by_url_variants(&self, urls: &UrlVariants) -> StoreResult<Option<CanonicalRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.register.metadata().urls().any(|u| urls.contains(u)))
            .cloned())
    }

    async fn get_record(&self, id: &RecordId) -> StoreResult<Option<CanonicalRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn save_record(
        &self,
        record: &CanonicalRecord,
        id: Option<&RecordId>,
    ) -> StoreResult<RecordId> {
        let id = id
            .or_else(|| record.id())
            .cloned()
            .unwrap_or_else(RecordId::generate);
        let mut stored = record.clone();
        stored.mark_persisted(id.clone(), Timestamp::now());
        self.records.write().await.insert(id.clone(), stored);
        debug!("Stored record {}", id);
        Ok(id)
    }
}
