//! Batch driver for the OARR reconciler.
//!
//! Reads a JSON array of crosswalked [`IncomingRecord`]s and reconciles each
//! one against a [`RecordStore`]. A failure on one record is logged and
//! counted; the batch always runs to the end.

mod config;
mod dry_run;

pub use config::{ConfigOverrides, ImporterConfig, DEFAULT_NAMESPACE};
pub use dry_run::DryRunStore;

use anyhow::{Context, Result};
use oarr_model::IncomingRecord;
use oarr_reconcile::{Outcome, RecordStore, Reconciler};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Counts of what a batch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.updated + self.skipped + self.failed
    }

    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Created(_) => self.created += 1,
            Outcome::Updated(_) => self.updated += 1,
            Outcome::Skipped(_) => self.skipped += 1,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} record(s): {} created, {} updated, {} skipped, {} failed",
            self.total(),
            self.created,
            self.updated,
            self.skipped,
            self.failed
        )
    }
}

/// Loads the crosswalk output: a JSON array of incoming records.
pub fn read_input(path: &Path) -> Result<Vec<IncomingRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse input {}", path.display()))
}

/// Reconciles every record in order, continuing past failures.
pub async fn run_batch<S>(records: &[IncomingRecord], store: &S, reconciler: &Reconciler) -> BatchSummary
where
    S: RecordStore + ?Sized,
{
    let mut summary = BatchSummary::default();
    for (i, incoming) in records.iter().enumerate() {
        match reconciler.reconcile(incoming, store).await {
            Ok(outcome) => summary.record(&outcome),
            Err(e) => {
                warn!(
                    "Record {} ({}) failed: {}",
                    i,
                    incoming.home_page().unwrap_or("<no url>"),
                    e
                );
                summary.failed += 1;
            }
        }
    }
    info!("Batch finished: {}", summary);
    summary
}
