//! Records exchanged with the data service.
//!
//! This module defines [`RawRecord`], the domain record a service returns for
//! reads and searches, and [`UpdateOutcome`], the result descriptor returned
//! after a write. Both are owned by the service and read-only to the REST
//! layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A domain record returned by the data service.
///
/// Besides the record identity and the owning patient, a record carries
/// arbitrary service-specific fields. These are kept in a flattened JSON map
/// so they survive deserialization untouched and can be handed to a
/// [`Presenter`](crate::presenter::Presenter).
///
/// # Examples
///
/// ```
/// use patient_rest::service::RawRecord;
/// use serde_json::json;
///
/// let record: RawRecord = serde_json::from_value(json!({
///     "id": "1",
///     "patientId": "a",
///     "gender": "female"
/// }))
/// .unwrap();
///
/// assert_eq!(record.id(), "1");
/// assert_eq!(record.patient_id(), Some("a"));
/// assert_eq!(record.field("gender"), Some(&json!("female")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// The record identity.
    id: String,

    /// The identity of the patient owning this record.
    #[serde(rename = "patientId", default, skip_serializing_if = "Option::is_none")]
    patient_id: Option<String>,

    /// The service's version token for this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource_version: Option<String>,

    /// Service-specific fields.
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl RawRecord {
    /// Creates a record with the given identity and no other data.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            patient_id: None,
            resource_version: None,
            fields: Map::new(),
        }
    }

    /// Sets the owning patient identity.
    pub fn with_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    /// Sets the resource version token.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.resource_version = Some(version.into());
        self
    }

    /// Adds a service-specific field.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Returns the record identity.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the owning patient identity, if the service recorded one.
    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    /// Returns the resource version token, if any.
    pub fn resource_version(&self) -> Option<&str> {
        self.resource_version.as_deref()
    }

    /// Returns a single service-specific field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns all service-specific fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns true if a caller with the given patient scope may see this record.
    ///
    /// An unscoped caller sees every record; a scoped caller only sees records
    /// whose owner matches the scope exactly.
    pub fn visible_to(&self, scope: Option<&str>) -> bool {
        match scope {
            None => true,
            Some(patient) => self.patient_id() == Some(patient),
        }
    }
}

/// The result of a write performed by the data service.
///
/// A service returns `None` instead of an outcome when there is no resource
/// to update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// Identity of the written resource.
    pub id: String,

    /// Whether the write created a new resource.
    #[serde(default)]
    pub created: bool,

    /// Version token of the resource after the write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

impl UpdateOutcome {
    /// Creates an outcome for an update of an existing resource.
    pub fn updated(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created: false,
            resource_version: None,
        }
    }

    /// Creates an outcome for a newly created resource.
    pub fn created(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created: true,
            resource_version: None,
        }
    }

    /// Sets the resulting version token.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.resource_version = Some(version.into());
        self
    }
}
