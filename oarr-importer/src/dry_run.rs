//! Store wrapper that reads through to a real store but keeps writes local.

use async_trait::async_trait;
use oarr_model::{CanonicalRecord, UrlVariants};
use oarr_reconcile::{MemoryStore, RecordStore, StoreResult};
use oarr_types::RecordId;
use tracing::info;

/// Reads fall back to the wrapped store; writes land in an in-memory overlay
/// so later records in the same batch still see them.
#[derive(Debug)]
pub struct DryRunStore<S> {
    inner: Option<S>,
    overlay: MemoryStore,
}

impl<S: RecordStore> DryRunStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner: Some(inner),
            overlay: MemoryStore::new(),
        }
    }

    /// A dry run with no registry behind it: every record starts unseen.
    pub fn offline() -> Self {
        Self {
            inner: None,
            overlay: MemoryStore::new(),
        }
    }

    /// Records the batch would have written.
    pub async fn pending(&self) -> Vec<CanonicalRecord> {
        self.overlay.records().await
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for DryRunStore<S> {
    async fn find_by_url_variants(&self, urls: &UrlVariants) -> StoreResult<Option<CanonicalRecord>> {
        if let Some(found) = self.overlay.find_by_url_variants(urls).await? {
            return Ok(Some(found));
        }
        match &self.inner {
            Some(inner) => inner.find_by_url_variants(urls).await,
            None => Ok(None),
        }
    }

    async fn get_record(&self, id: &RecordId) -> StoreResult<Option<CanonicalRecord>> {
        if let Some(found) = self.overlay.get_record(id).await? {
            return Ok(Some(found));
        }
        match &self.inner {
            Some(inner) => inner.get_record(id).await,
            None => Ok(None),
        }
    }

    async fn save_record(
        &self,
        record: &CanonicalRecord,
        id: Option<&RecordId>,
    ) -> StoreResult<RecordId> {
        let id = self.overlay.save_record(record, id).await?;
        info!("Dry run: not writing record {} to the registry", id);
        Ok(id)
    }
}
