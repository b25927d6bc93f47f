//! Test fixtures for REST API testing.
//!
//! Provides predefined patient records for use in tests.

use patient_rest::service::RawRecord;
use serde_json::{Value, json};

/// A patient record fixture.
#[derive(Debug, Clone)]
pub struct PatientFixture {
    /// Record id.
    pub id: String,
    /// Owning patient, when different from the id.
    pub owner: Option<String>,
    /// Family name.
    pub family: String,
    /// Given names.
    pub given: Vec<String>,
    /// Gender code.
    pub gender: Option<String>,
    /// Version token.
    pub version: Option<String>,
}

impl PatientFixture {
    /// Creates a patient owned by itself.
    pub fn new(id: &str, family: &str) -> Self {
        Self {
            id: id.to_string(),
            owner: None,
            family: family.to_string(),
            given: Vec::new(),
            gender: None,
            version: None,
        }
    }

    /// Sets the owning patient.
    pub fn owned_by(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }

    /// Sets given names.
    pub fn with_given(mut self, given: Vec<&str>) -> Self {
        self.given = given.into_iter().map(String::from).collect();
        self
    }

    /// Sets gender.
    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = Some(gender.to_string());
        self
    }

    /// Sets the version token.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Builds the raw service record.
    pub fn to_record(&self) -> RawRecord {
        let mut name = json!({ "family": [self.family] });
        if !self.given.is_empty() {
            name["given"] = json!(self.given);
        }

        let mut record = RawRecord::new(&self.id)
            .with_patient(self.owner.as_deref().unwrap_or(&self.id))
            .with_field("name", json!([name]))
            .with_field("internalNotes", json!("not for clients"));
        if let Some(gender) = &self.gender {
            record = record.with_field("gender", json!(gender));
        }
        if let Some(version) = &self.version {
            record = record.with_version(version);
        }
        record
    }
}

/// Two patients, each owning their own record.
pub fn two_patients() -> Vec<RawRecord> {
    vec![
        PatientFixture::new("a", "Smith")
            .with_given(vec!["John"])
            .with_gender("male")
            .with_version("3")
            .to_record(),
        PatientFixture::new("b", "Jones")
            .with_given(vec!["Jane"])
            .with_gender("female")
            .to_record(),
    ]
}

/// A patient resource body for updates.
pub fn patient_body(id: &str, family: &str) -> Value {
    json!({
        "resourceType": "Patient",
        "id": id,
        "name": [{ "family": [family] }],
        "active": true
    })
}
