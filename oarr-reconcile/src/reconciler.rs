//! One reconciliation step: resolve, merge, persist.

use crate::error::ReconcileResult;
use crate::merge::MergeEngine;
use crate::resolve::{resolve, Resolution, SkipReason};
use crate::store::RecordStore;
use oarr_model::{CanonicalRecord, IncomingRecord};
use oarr_types::RecordId;
use tracing::info;

/// What happened to one incoming record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(RecordId),
    Updated(RecordId),
    Skipped(SkipReason),
}

/// Reconciles incoming records into a store on behalf of one ingesting
/// system.
#[derive(Debug, Clone)]
pub struct Reconciler {
    engine: MergeEngine,
}

impl Reconciler {
    /// Creates a reconciler owning the admin `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self::with_engine(MergeEngine::new(namespace))
    }

    pub fn with_engine(engine: MergeEngine) -> Self {
        Self { engine }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        self.engine.namespace()
    }

    /// Reconciles one incoming record: one lookup, then at most one save.
    pub async fn reconcile<S>(&self, incoming: &IncomingRecord, store: &S) -> ReconcileResult<Outcome>
    where
        S: RecordStore + ?Sized,
    {
        let namespace = self.namespace();
        let url = incoming.home_page();
        let resolution = resolve(url, incoming.source_timestamp(namespace), namespace, store).await?;

        match resolution {
            Resolution::Skip(reason) => {
                info!("Skipping {}: {}", url.unwrap_or("<no url>"), reason);
                Ok(Outcome::Skipped(reason))
            }
            Resolution::Create => {
                let record = CanonicalRecord::from(incoming.clone());
                let id = store.save_record(&record, None).await?;
                info!("Created record {} for {}", id, url.unwrap_or_default());
                Ok(Outcome::Created(id))
            }
            Resolution::Update(existing) => {
                let target = existing.id().cloned();
                let merged = self.engine.merge(*existing, incoming);
                let id = store.save_record(&merged, target.as_ref()).await?;
                info!("Updated record {} from {}", id, url.unwrap_or_default());
                Ok(Outcome::Updated(id))
            }
        }
    }
}
