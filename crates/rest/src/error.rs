//! Error types for the patient REST API.
//!
//! Every failure a handler can produce is one of the variants of
//! [`RestError`], which renders itself as a FHIR OperationOutcome with the
//! matching HTTP status code:
//!
//! | Variant | HTTP Status | FHIR Issue Code |
//! |---------|-------------|-----------------|
//! | Unauthorized | 401 | security |
//! | NotFound | 404 | not-found |
//! | BadRequest | 400 | invalid |
//! | InternalError | 500 | exception |
//!
//! Failures reported by the data service are always classified as
//! [`RestError::InternalError`] with the service message passed through
//! verbatim. An absent service result is never an error on the service side;
//! the controller turns it into [`RestError::NotFound`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::service::ServiceError;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// A patient-scoped caller tried to act on another patient (HTTP 401).
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// The service had no resource for the request (HTTP 404).
    NotFound {
        /// The resource type (e.g., "Patient").
        resource_type: String,
        /// The requested resource ID, when the request carried one.
        id: Option<String>,
    },

    /// Malformed request body (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Any other failure surfaced by the service (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the FHIR issue code for this error.
    pub fn issue_code(&self) -> &'static str {
        match self {
            RestError::Unauthorized { .. } => "security",
            RestError::NotFound { .. } => "not-found",
            RestError::BadRequest { .. } => "invalid",
            RestError::InternalError { .. } => "exception",
        }
    }

    /// Returns the human-readable diagnostic carried in the OperationOutcome.
    pub fn details(&self) -> String {
        match self {
            RestError::Unauthorized { message }
            | RestError::BadRequest { message }
            | RestError::InternalError { message } => message.clone(),
            RestError::NotFound { resource_type, .. } => {
                format!("{} not found", resource_type)
            }
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RestError::NotFound {
                resource_type,
                id: Some(id),
            } => write!(f, "Resource not found: {}/{}", resource_type, id),
            RestError::NotFound {
                resource_type,
                id: None,
            } => write!(f, "Resource not found: {}", resource_type),
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let operation_outcome = create_operation_outcome("error", self.issue_code(), &self.details());
        (self.status_code(), Json(operation_outcome)).into_response()
    }
}

/// Creates a FHIR OperationOutcome resource.
///
/// # Arguments
///
/// * `severity` - The issue severity (fatal, error, warning, information)
/// * `code` - The FHIR issue code
/// * `details` - Human-readable details
fn create_operation_outcome(severity: &str, code: &str, details: &str) -> serde_json::Value {
    serde_json::json!({
        "resourceType": "OperationOutcome",
        "issue": [{
            "severity": severity,
            "code": code,
            "details": {
                "text": details
            }
        }]
    })
}

impl From<ServiceError> for RestError {
    fn from(err: ServiceError) -> Self {
        RestError::InternalError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
