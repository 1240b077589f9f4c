//! Identity resolution: does an incoming record already have a canonical
//! counterpart, and is that counterpart stale?

use crate::error::ReconcileResult;
use crate::store::RecordStore;
use oarr_model::{canonicalize_url, CanonicalRecord};
use oarr_types::Timestamp;
use std::fmt;
use tracing::debug;

/// What to do with one incoming record.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No canonical record carries any variant of the home page.
    Create,
    /// A canonical record matched and has not seen this source version yet.
    Update(Box<CanonicalRecord>),
    /// Nothing to do.
    Skip(SkipReason),
}

/// Why an incoming record was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The record has no home-page URL to match on.
    MissingUrl,
    /// The source feed gave no last-modified timestamp.
    MissingTimestamp,
    /// The canonical record was reconciled at or after the source timestamp.
    UpToDate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingUrl => "no home page URL",
            Self::MissingTimestamp => "no source last-modified timestamp",
            Self::UpToDate => "not modified since last reconciliation",
        })
    }
}

/// Decides `Create`, `Update` or `Skip` for a record identified by `url` and
/// last modified upstream at `source_modified`.
///
/// Performs exactly one store lookup and never writes. Staleness is judged
/// against the `last_modified` this system recorded in its own admin
/// `namespace`; a match without one is always updated.
pub async fn resolve<S>(
    url: Option<&str>,
    source_modified: Option<Timestamp>,
    namespace: &str,
    store: &S,
) -> ReconcileResult<Resolution>
where
    S: RecordStore + ?Sized,
{
    let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
        return Ok(Resolution::Skip(SkipReason::MissingUrl));
    };
    let Some(source_modified) = source_modified else {
        return Ok(Resolution::Skip(SkipReason::MissingTimestamp));
    };

    let variants = canonicalize_url(url);
    let Some(existing) = store.find_by_url_variants(&variants).await? else {
        debug!("No canonical record for {}", url);
        return Ok(Resolution::Create);
    };

    match existing.last_reconciled(namespace) {
        None => {
            debug!("Match for {} has never been reconciled by {}", url, namespace);
            Ok(Resolution::Update(Box::new(existing)))
        }
        Some(reconciled) if reconciled.is_before(&source_modified) => {
            debug!("Match for {} last reconciled {}, source modified {}", url, reconciled, source_modified);
            Ok(Resolution::Update(Box::new(existing)))
        }
        Some(_) => Ok(Resolution::Skip(SkipReason::UpToDate)),
    }
}
