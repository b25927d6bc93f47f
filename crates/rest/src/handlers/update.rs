//! Update interaction handler.
//!
//! Implements the FHIR [update interaction](https://hl7.org/fhir/http.html#update):
//! `PUT [base]/[version]/[type]/[id]`

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{FhirResource, PatientScope};
use crate::service::{ResourceService, ServiceRequest};
use crate::state::AppState;

/// Handler for the update interaction.
///
/// Writes the resource through the data service, which may create it.
///
/// # HTTP Request
///
/// `PUT [base]/[version]/[type]/[id]`
///
/// # Response
///
/// The body is always empty. Success responses carry `Location`,
/// `Last-Modified` and `Content-Type: application/json+fhir`, plus
/// `Content-Location` and `ETag` when the service reported a version.
///
/// - `200 OK` - Resource updated
/// - `201 Created` - Resource created
/// - `400 Bad Request` - Body is not JSON
/// - `401 Unauthorized` - The payload names another patient
/// - `404 Not Found` - The service had nothing to update
/// - `500 Internal Server Error` - The data service failed
///
/// # Example
///
/// ```http
/// PUT /dstu2/Patient/123 HTTP/1.1
/// Host: fhir.example.com
/// Content-Type: application/json+fhir
///
/// {"resourceType": "Patient", "id": "123", "name": [{"family": "Smith"}]}
/// ```
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    scope: PatientScope,
    FhirResource(body): FhirResource,
) -> RestResult<Response>
where
    S: ResourceService,
{
    debug!(
        resource_type = %state.config().resource_type,
        id = %id,
        scope = %scope,
        has_body = body.is_some(),
        "Processing update request"
    );

    let context = state.request_context(scope);
    let request = ServiceRequest::for_id(id, body);
    let response = state.controller().update(&request, &context).await?;

    Ok(response.into_response())
}
