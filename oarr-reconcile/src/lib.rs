//! Reconciliation of registry records.
//!
//! Folds records observed in a source feed into the canonical registry:
//!
//! 1. **Resolve**: expand the incoming home page into its URL variants, look
//!    up a canonical record carrying any of them, and decide `Create`,
//!    `Update` or `Skip` from this system's last-reconciled timestamp
//! 2. **Merge**: on `Update`, fill the canonical record from the incoming one
//!    under the per-field policy table [`MERGE_POLICY`]
//! 3. **Persist**: hand the result back to the store
//!
//! The store is reached only through the [`RecordStore`] trait. One
//! reconciliation performs one lookup and at most one save; there is no
//! locking, the store arbitrates concurrent writers.

pub mod error;
pub mod merge;
mod reconciler;
mod resolve;
mod store;

pub use error::{ReconcileError, ReconcileResult, StoreError, StoreResult};
pub use merge::{merge, Collection, FieldPolicy, MergeEngine, ScalarField, MERGE_POLICY};
pub use reconciler::{Outcome, Reconciler};
pub use resolve::{resolve, Resolution, SkipReason};
pub use store::{MemoryStore, RecordStore};
