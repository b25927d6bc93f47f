//! Data service boundary.
//!
//! The REST layer never stores or queries records itself. Every request is
//! answered by exactly one call to a [`ResourceService`], the single await
//! point of the request. Services are injected once at start-up and shared
//! read-only across requests.
//!
//! - [`types`] - Records and write outcomes returned by services
//! - [`memory`] - In-memory service used by the server binary and tests

pub mod memory;
pub mod types;

pub use memory::InMemoryService;
pub use types::{RawRecord, UpdateOutcome};

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::context::RequestContext;

/// Errors surfaced by a data service.
///
/// The display text of every variant is passed through verbatim as the
/// message of an internal-error response.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The backing system could not be reached.
    #[error("service unavailable: {service}")]
    Unavailable {
        /// Name of the unreachable system.
        service: String,
    },

    /// The backing system reported a failure.
    #[error("{message}")]
    Backend {
        /// Message reported by the backing system.
        message: String,
    },
}

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// The parts of an inbound request a service needs to do its work.
#[derive(Debug, Clone, Default)]
pub struct ServiceRequest {
    /// Resource id from the request path, for instance-level operations.
    pub id: Option<String>,

    /// Query parameters, passed through unparsed.
    pub params: HashMap<String, String>,

    /// JSON request body, if the request carried one.
    pub body: Option<Value>,
}

impl ServiceRequest {
    /// Creates a request for a type-level operation.
    pub fn with_params(params: HashMap<String, String>) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Creates a request for an instance-level operation.
    pub fn for_id(id: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            id: Some(id.into()),
            params: HashMap::new(),
            body,
        }
    }

    /// Returns the patient identity named in the request payload, if any.
    ///
    /// This is the `id` element of the JSON body.
    pub fn payload_patient_id(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get("id"))
            .and_then(|id| id.as_str())
    }
}

/// The data service consumed by the REST layer.
///
/// Implementations own record storage and query semantics. The REST layer
/// only interprets the shape of the results:
///
/// - an empty `Vec` from [`get_resources`](Self::get_resources) is a valid,
///   empty search result;
/// - `None` from [`get_resource_by_id`](Self::get_resource_by_id) or
///   [`update_resource`](Self::update_resource) means there is no such
///   resource and becomes a 404;
/// - any `Err` becomes a 500 carrying the error's message.
#[async_trait]
pub trait ResourceService: Send + Sync {
    /// Returns a human-readable name for this service.
    fn service_name(&self) -> &'static str;

    /// Returns the records matching a search request.
    async fn get_resources(
        &self,
        request: &ServiceRequest,
        context: &RequestContext,
    ) -> ServiceResult<Vec<RawRecord>>;

    /// Returns the record addressed by `request.id`.
    async fn get_resource_by_id(
        &self,
        request: &ServiceRequest,
        context: &RequestContext,
    ) -> ServiceResult<Option<RawRecord>>;

    /// Writes the request body to the resource addressed by `request.id`.
    async fn update_resource(
        &self,
        request: &ServiceRequest,
        context: &RequestContext,
    ) -> ServiceResult<Option<UpdateOutcome>>;
}
