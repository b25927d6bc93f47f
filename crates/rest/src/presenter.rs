//! Conversion of raw service records into public FHIR resources.
//!
//! A [`Presenter`] is a pure, total function from a [`RawRecord`] to the
//! JSON resource a client sees. The REST layer never inspects the presented
//! resource; it only places it into bundles or response bodies.

use serde_json::{Map, Value, json};

use crate::service::RawRecord;

/// Converts service records into their public resource representation.
pub trait Presenter: Send + Sync {
    /// Converts a record. Must not fail and must not perform I/O.
    fn to_public_resource(&self, record: &RawRecord) -> Value;
}

/// Elements of the DSTU2 Patient resource copied from record fields.
const PATIENT_ELEMENTS: &[&str] = &[
    "meta",
    "implicitRules",
    "language",
    "text",
    "contained",
    "extension",
    "modifierExtension",
    "identifier",
    "active",
    "name",
    "telecom",
    "gender",
    "birthDate",
    "deceasedBoolean",
    "deceasedDateTime",
    "address",
    "maritalStatus",
    "multipleBirthBoolean",
    "multipleBirthInteger",
    "photo",
    "contact",
    "animal",
    "communication",
    "careProvider",
    "managingOrganization",
    "link",
];

/// Presents records as DSTU2 `Patient` resources.
///
/// Only elements defined on Patient are copied; service-internal fields are
/// dropped. The record's version token, when present, becomes
/// `meta.versionId`.
///
/// # Example
///
/// ```rust
/// use patient_rest::presenter::{PatientPresenter, Presenter};
/// use patient_rest::service::RawRecord;
/// use serde_json::json;
///
/// let record = RawRecord::new("1")
///     .with_patient("1")
///     .with_field("gender", json!("female"))
///     .with_field("ssn_hash", json!("ab12"));
///
/// let patient = PatientPresenter.to_public_resource(&record);
/// assert_eq!(patient["resourceType"], "Patient");
/// assert_eq!(patient["gender"], "female");
/// assert!(patient.get("ssn_hash").is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PatientPresenter;

impl Presenter for PatientPresenter {
    fn to_public_resource(&self, record: &RawRecord) -> Value {
        let mut resource = Map::new();
        resource.insert("resourceType".to_string(), json!("Patient"));
        resource.insert("id".to_string(), json!(record.id()));

        for element in PATIENT_ELEMENTS {
            if let Some(value) = record.field(element) {
                resource.insert((*element).to_string(), value.clone());
            }
        }

        if let Some(version) = record.resource_version() {
            let meta = resource
                .entry("meta")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(meta) = meta.as_object_mut() {
                meta.insert("versionId".to_string(), json!(version));
            }
        }

        Value::Object(resource)
    }
}
