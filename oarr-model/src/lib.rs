//! Canonical registry record model.
//!
//! Defines the document types the reconciler reads and writes:
//! - [`CanonicalRecord`]: the persisted, deduplicated record of one repository
//! - [`IncomingRecord`]: a freshly crosswalked observation, never persisted as-is
//! - [`Register`]: the descriptive section shared by both, with dedup-aware mutators
//! - [`Metadata`]: multilingual metadata with a single default-language record
//! - [`canonicalize_url`]: URL equivalence used for every identity comparison
//!
//! The JSON shape of these types is the registry store's wire contract. Fields
//! the model does not know about are carried through untouched.

mod country;
mod entries;
mod error;
mod metadata;
mod record;
mod register;
mod status;
mod url;

pub use country::{CountryLookup, IsoCountries};
pub use entries::{Affiliation, AffiliationDetails, ApiEndpoint, Contact, ContactDetails, SoftwareDescriptor};
pub use error::{ModelError, ModelResult};
pub use metadata::{
    FieldValue, ListField, Metadata, MetadataField, MetadataFields, MetadataRecord, TextField,
    DEFAULT_LANG,
};
pub use record::{Admin, AdminPayload, CanonicalRecord, IncomingRecord, LAST_MODIFIED_KEY};
pub use register::Register;
pub use status::OperationalStatus;
pub use url::{canonicalize_url, urls_equivalent, variants_intersect, UrlVariants};
