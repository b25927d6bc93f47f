//! Response assembly for the patient REST API.
//!
//! - [`bundle`] - Search bundle assembly with patient-scope filtering
//! - [`headers`] - Versioned update responses (ETag, Location, etc.)
//! - [`urls`] - Resource URL composition

pub mod bundle;
pub mod headers;
pub mod urls;

pub use bundle::{BundleEntry, SearchBundle, SearchBundler, SearchMode};
pub use headers::{
    FHIR_JSON_CONTENT_TYPE, ResourceHeaders, VersionedResponse, VersionedResponseComposer,
};
pub use urls::{history_url, resource_url};
