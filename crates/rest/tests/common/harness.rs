//! REST API test harness.
//!
//! Provides infrastructure for testing the REST API endpoints.

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use patient_rest::service::{InMemoryService, RawRecord};
use patient_rest::{AppState, ServerConfig};
use serde_json::Value;

/// Base URL used for every harness server.
pub const BASE_URL: &str = "http://localhost:8080";

const X_PATIENT_ID: HeaderName = HeaderName::from_static("x-patient-id");

/// Test harness for REST API testing.
///
/// Keeps a handle on the in-memory service so tests can inspect what the
/// API wrote.
///
/// # Example
///
/// ```rust,ignore
/// let harness = RestTestHarness::with_records(fixtures::two_patients());
///
/// let response = harness.get("/dstu2/Patient/a").as_patient("a").await;
/// assert_eq!(response.status_code(), 200);
/// ```
pub struct RestTestHarness {
    /// The test server instance.
    pub server: TestServer,

    /// The data service behind the server.
    pub service: Arc<InMemoryService>,

    /// Server configuration.
    pub config: ServerConfig,
}

impl RestTestHarness {
    /// Creates a harness over an empty service.
    pub fn new() -> Self {
        Self::with_service(InMemoryService::new(), test_config())
    }

    /// Creates a harness over a pre-populated service.
    pub fn with_records(records: Vec<RawRecord>) -> Self {
        Self::with_service(InMemoryService::with_records(records), test_config())
    }

    /// Creates a harness with an explicit service and configuration.
    pub fn with_service(service: InMemoryService, config: ServerConfig) -> Self {
        let service = Arc::new(service);
        let state = AppState::new(Arc::clone(&service), config.clone());
        let app = patient_rest::routing::create_routes(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            service,
            config,
        }
    }

    /// Starts a GET request.
    pub fn get(&self, path: &str) -> TestRequest {
        self.server.get(path)
    }

    /// Starts a PUT request with a JSON body.
    pub fn put(&self, path: &str, body: &Value) -> TestRequest {
        self.server.put(path).json(body)
    }
}

/// Configuration used by harness servers.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        base_url: BASE_URL.to_string(),
        ..ServerConfig::for_testing()
    }
}

/// Adds the patient scope header to a request.
pub trait ScopedRequest {
    /// Makes the request on behalf of `patient`.
    fn as_patient(self, patient: &str) -> Self;
}

impl ScopedRequest for TestRequest {
    fn as_patient(self, patient: &str) -> Self {
        self.add_header(
            X_PATIENT_ID,
            HeaderValue::from_str(patient).expect("Invalid patient id"),
        )
    }
}
