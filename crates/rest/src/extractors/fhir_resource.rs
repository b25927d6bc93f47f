//! FHIR resource extractor.
//!
//! Extracts an optional JSON resource from the request body.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::RestError;

/// Axum extractor for an optional FHIR resource body.
///
/// An empty body yields `None`. A non-empty body must be JSON; no schema
/// validation is performed. Lookups may carry a body too, since the patient
/// identity named in it is subject to the access guard.
///
/// # Example
///
/// ```rust,ignore
/// use patient_rest::extractors::FhirResource;
///
/// async fn update_handler(FhirResource(resource): FhirResource) {
///     if let Some(resource) = resource {
///         println!("Resource id: {}", resource["id"]);
///     }
/// }
/// ```
#[derive(Debug, Default)]
pub struct FhirResource(pub Option<Value>);

/// Error type for FHIR resource extraction failures.
#[derive(Debug)]
pub enum FhirResourceRejection {
    /// The body could not be read.
    UnreadableBody(String),
    /// JSON parsing failed.
    InvalidJson(String),
}

impl IntoResponse for FhirResourceRejection {
    fn into_response(self) -> Response {
        let error = match self {
            FhirResourceRejection::UnreadableBody(msg) => RestError::BadRequest {
                message: format!("Unreadable request body: {}", msg),
            },
            FhirResourceRejection::InvalidJson(msg) => RestError::BadRequest {
                message: format!("Invalid JSON: {}", msg),
            },
        };
        error.into_response()
    }
}

/// Parses a request body into an optional JSON value.
fn parse_body(bytes: &[u8]) -> Result<Option<Value>, FhirResourceRejection> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map(Some)
        .map_err(|e| FhirResourceRejection::InvalidJson(e.to_string()))
}

impl<S> FromRequest<S> for FhirResource
where
    S: Send + Sync,
{
    type Rejection = FhirResourceRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| FhirResourceRejection::UnreadableBody(e.body_text()))?;

        parse_body(&bytes).map(FhirResource)
    }
}
