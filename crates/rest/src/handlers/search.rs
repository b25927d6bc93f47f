//! Search interaction handler.
//!
//! Implements the FHIR [search interaction](https://hl7.org/fhir/http.html#search):
//! `GET [base]/[version]/[type]?params`
//!
//! Query parameters are passed to the data service unparsed. The service
//! decides which records match; the handler only restricts the result to the
//! caller's patient scope.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::PatientScope;
use crate::service::{ResourceService, ServiceRequest};
use crate::state::AppState;

/// Handler for type-level search.
///
/// # HTTP Request
///
/// `GET [base]/[version]/[type]?params`
///
/// # Response
///
/// - `200 OK` - Bundle of type "searchset", possibly empty
/// - `500 Internal Server Error` - The data service failed
pub async fn search_handler<S>(
    State(state): State<AppState<S>>,
    scope: PatientScope,
    Query(params): Query<HashMap<String, String>>,
) -> RestResult<Response>
where
    S: ResourceService,
{
    debug!(
        resource_type = %state.config().resource_type,
        scope = %scope,
        params = ?params,
        "Processing search request"
    );

    let context = state.request_context(scope);
    let request = ServiceRequest::with_params(params);
    let bundle = state.controller().search(&request, &context).await?;

    Ok((StatusCode::OK, Json(bundle)).into_response())
}
