//! Read interaction handler.
//!
//! Implements the FHIR [read interaction](https://hl7.org/fhir/http.html#read):
//! `GET [base]/[version]/[type]/[id]`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{FhirResource, PatientScope};
use crate::service::{ResourceService, ServiceRequest};
use crate::state::AppState;

/// Handler for the read interaction.
///
/// Reads a resource by id and returns its public representation.
///
/// # HTTP Request
///
/// `GET [base]/[version]/[type]/[id]`
///
/// A JSON body is accepted but not required. When it names an `id` that
/// differs from the caller's patient scope the request is refused before the
/// data service is consulted.
///
/// # Response
///
/// - `200 OK` - Resource found
/// - `401 Unauthorized` - The caller may not access the resource
/// - `404 Not Found` - Resource does not exist
/// - `500 Internal Server Error` - The data service failed
///
/// # Example
///
/// ```http
/// GET /dstu2/Patient/123 HTTP/1.1
/// Host: fhir.example.com
/// X-Patient-ID: 123
/// ```
pub async fn read_handler<S>(
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
        "Processing read request"
    );

    let context = state.request_context(scope);
    let request = ServiceRequest::for_id(id, body);
    let resource = state.controller().read(&request, &context).await?;

    Ok((StatusCode::OK, Json(resource)).into_response())
}
