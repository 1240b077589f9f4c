//! HTTP client for the OARR registry.
//!
//! Implements [`RecordStore`](oarr_reconcile::RecordStore) over the registry's
//! JSON API:
//!
//! - `GET {base}record/{id}`: fetch one record
//! - `GET {base}query?source=<json>`: Elasticsearch query, used for URL lookup
//! - `POST {base}record[/{id}]?api_key=...`: create or overwrite a record

mod client;
mod error;

pub use client::{ClientConfig, OarrClient};
pub use error::{ClientError, ClientResult};
