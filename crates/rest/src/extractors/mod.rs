//! Axum extractors for patient API requests.
//!
//! - [`PatientScope`] - Extract the caller's patient scope
//! - [`FhirResource`] - Extract an optional JSON resource body

mod fhir_resource;
mod scope;

pub use fhir_resource::FhirResource;
pub use scope::PatientScope;
