//! In-memory data service.
//!
//! [`InMemoryService`] keeps records in a `BTreeMap` behind a tokio
//! `RwLock`. It backs the `patient-server` binary and the test suites; a real
//! deployment plugs in its own [`ResourceService`].
//!
//! Update semantics:
//!
//! - the path id addresses the record; the body's fields replace the stored
//!   service fields (`id` and `resourceType` are not stored as fields)
//! - an unknown id is created with version `1` when creation is allowed,
//!   otherwise the service reports no outcome
//! - an existing record's version is incremented
//! - an existing record keeps its owner; a new record is owned by the
//!   body's `patientId`, defaulting to the record id

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    RawRecord, ResourceService, ServiceError, ServiceRequest, ServiceResult, UpdateOutcome,
};
use crate::context::RequestContext;

/// Body elements that never become stored service fields.
const RESERVED_FIELDS: &[&str] = &["id", "resourceType", "patientId", "resource_version"];

/// A [`ResourceService`] holding records in memory.
#[derive(Debug)]
pub struct InMemoryService {
    records: RwLock<BTreeMap<String, RawRecord>>,
    allow_create: bool,
    failure: Option<Failure>,
}

/// How a failing service fails.
#[derive(Debug, Clone)]
enum Failure {
    Backend(String),
    Unavailable,
}

impl Default for InMemoryService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryService {
    /// Creates an empty service that creates unknown records on update.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            allow_create: true,
            failure: None,
        }
    }

    /// Creates a service pre-populated with records.
    pub fn with_records(records: impl IntoIterator<Item = RawRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.id().to_string(), r))
            .collect();
        Self {
            records: RwLock::new(records),
            ..Self::new()
        }
    }

    /// Creates a service whose every call fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(Failure::Backend(message.into())),
            ..Self::new()
        }
    }

    /// Creates a service that reports itself unreachable on every call.
    pub fn unavailable() -> Self {
        Self {
            failure: Some(Failure::Unavailable),
            ..Self::new()
        }
    }

    /// Sets whether updates of unknown ids create a record.
    pub fn allow_create(mut self, allow: bool) -> Self {
        self.allow_create = allow;
        self
    }

    /// Inserts or replaces a record.
    pub async fn insert(&self, record: RawRecord) {
        self.records
            .write()
            .await
            .insert(record.id().to_string(), record);
    }

    /// Returns a stored record by id.
    pub async fn get(&self, id: &str) -> Option<RawRecord> {
        self.records.read().await.get(id).cloned()
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_failure(&self) -> ServiceResult<()> {
        match &self.failure {
            Some(Failure::Backend(message)) => Err(ServiceError::Backend {
                message: message.clone(),
            }),
            Some(Failure::Unavailable) => Err(ServiceError::Unavailable {
                service: self.service_name().to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Returns the version that follows `current`.
fn next_version(current: Option<&str>) -> String {
    current
        .and_then(|v| v.parse::<u64>().ok())
        .map(|v| v + 1)
        .unwrap_or(1)
        .to_string()
}

/// Builds the stored record for an update of `id` with `body`.
fn build_record(id: &str, body: &Value, existing: Option<&RawRecord>) -> RawRecord {
    let version = next_version(existing.and_then(|r| r.resource_version()));
    // An existing owner is never reassigned by the body.
    let patient = existing
        .and_then(|r| r.patient_id())
        .or_else(|| body.get("patientId").and_then(|v| v.as_str()))
        .unwrap_or(id)
        .to_string();

    let mut record = RawRecord::new(id)
        .with_patient(patient)
        .with_version(version);

    if let Some(fields) = body.as_object() {
        for (name, value) in fields {
            if !RESERVED_FIELDS.contains(&name.as_str()) {
                record = record.with_field(name.clone(), value.clone());
            }
        }
    }

    record
}

#[async_trait]
impl ResourceService for InMemoryService {
    fn service_name(&self) -> &'static str {
        "in-memory"
    }

    async fn get_resources(
        &self,
        request: &ServiceRequest,
        context: &RequestContext,
    ) -> ServiceResult<Vec<RawRecord>> {
        self.check_failure()?;
        debug!(
            version = %context.version(),
            params = ?request.params,
            "In-memory search"
        );
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn get_resource_by_id(
        &self,
        request: &ServiceRequest,
        _context: &RequestContext,
    ) -> ServiceResult<Option<RawRecord>> {
        self.check_failure()?;
        let Some(id) = request.id.as_deref() else {
            return Ok(None);
        };
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn update_resource(
        &self,
        request: &ServiceRequest,
        _context: &RequestContext,
    ) -> ServiceResult<Option<UpdateOutcome>> {
        self.check_failure()?;
        let Some(id) = request.id.as_deref() else {
            return Ok(None);
        };
        let body = request.body.as_ref().ok_or_else(|| ServiceError::Backend {
            message: format!("Update of {} requires a resource body", id),
        })?;

        let mut records = self.records.write().await;
        let existing = records.get(id);
        if existing.is_none() && !self.allow_create {
            return Ok(None);
        }

        let created = existing.is_none();
        let record = build_record(id, body, existing);
        let outcome = UpdateOutcome {
            id: id.to_string(),
            created,
            resource_version: record.resource_version().map(String::from),
        };
        records.insert(id.to_string(), record);

        debug!(id = %id, created = created, "In-memory update");
        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> RequestContext {
        RequestContext::unscoped("dstu2")
    }

    #[tokio::test]
    async fn test_update_creates_then_updates() {
        let service = InMemoryService::new();
        let request = ServiceRequest::for_id("5", Some(json!({"id": "5", "gender": "male"})));

        let first = service.update_resource(&request, &ctx()).await.unwrap().unwrap();
        assert!(first.created);
        assert_eq!(first.resource_version.as_deref(), Some("1"));

        let second = service.update_resource(&request, &ctx()).await.unwrap().unwrap();
        assert!(!second.created);
        assert_eq!(second.resource_version.as_deref(), Some("2"));

        let stored = service.get("5").await.unwrap();
        assert_eq!(stored.patient_id(), Some("5"));
        assert_eq!(stored.field("gender"), Some(&json!("male")));
        assert!(stored.field("id").is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_without_create_is_absent() {
        let service = InMemoryService::new().allow_create(false);
        let request = ServiceRequest::for_id("9", Some(json!({"id": "9"})));
        assert!(service.update_resource(&request, &ctx()).await.unwrap().is_none());
        assert!(service.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_keeps_existing_owner() {
        let service = InMemoryService::with_records([RawRecord::new("1").with_patient("a")]);
        let request = ServiceRequest::for_id("1", Some(json!({"id": "1"})));
        service.update_resource(&request, &ctx()).await.unwrap();
        assert_eq!(service.get("1").await.unwrap().patient_id(), Some("a"));
    }

    #[tokio::test]
    async fn test_update_body_cannot_reassign_owner() {
        let service = InMemoryService::with_records([RawRecord::new("1").with_patient("a")]);
        let request = ServiceRequest::for_id("1", Some(json!({"id": "1", "patientId": "z"})));
        service.update_resource(&request, &ctx()).await.unwrap();

        let stored = service.get("1").await.unwrap();
        assert_eq!(stored.patient_id(), Some("a"));
        assert!(stored.field("patientId").is_none());
    }

    #[tokio::test]
    async fn test_failing_service() {
        let service = InMemoryService::failing("database offline");
        let err = service
            .get_resources(&ServiceRequest::default(), &ctx())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "database offline");
    }

    #[tokio::test]
    async fn test_unavailable_service() {
        let service = InMemoryService::unavailable();
        let err = service
            .get_resource_by_id(&ServiceRequest::for_id("1", None), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable { ref service } if service == "in-memory"));
        assert_eq!(err.to_string(), "service unavailable: in-memory");
    }

    #[test]
    fn test_next_version() {
        assert_eq!(next_version(None), "1");
        assert_eq!(next_version(Some("41")), "42");
        assert_eq!(next_version(Some("abc")), "1");
    }
}
