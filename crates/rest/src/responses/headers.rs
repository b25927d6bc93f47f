//! Versioned update responses.
//!
//! [`VersionedResponseComposer`] maps the outcome of an update into a status
//! code and the FHIR versioning headers. The response never has a body.
//!
//! Header values are checked when the response is composed. A value that
//! cannot be sent as a header fails the composition; a response is never
//! sent with one of its headers missing.

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, SecondsFormat, Utc};

use super::urls::{history_url, resource_url};
use crate::error::{RestError, RestResult};
use crate::service::UpdateOutcome;

/// The DSTU2 JSON media type.
pub const FHIR_JSON_CONTENT_TYPE: &str = "application/json+fhir";

/// Builder for versioned response headers.
///
/// Generates:
/// - Location
/// - Content-Location (version-specific)
/// - ETag
/// - Last-Modified
/// - Content-Type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHeaders {
    location: Option<String>,
    content_location: Option<String>,
    etag: Option<String>,
    last_modified: Option<String>,
    content_type: String,
}

impl Default for ResourceHeaders {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHeaders {
    /// Creates a new ResourceHeaders builder.
    pub fn new() -> Self {
        Self {
            location: None,
            content_location: None,
            etag: None,
            last_modified: None,
            content_type: FHIR_JSON_CONTENT_TYPE.to_string(),
        }
    }

    /// Sets the Location URL.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the Content-Location URL.
    pub fn with_content_location(mut self, location: impl Into<String>) -> Self {
        self.content_location = Some(location.into());
        self
    }

    /// Sets the ETag value, verbatim.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Sets the Last-Modified timestamp.
    pub fn with_last_modified(mut self, timestamp: impl Into<String>) -> Self {
        self.last_modified = Some(timestamp.into());
        self
    }

    /// Converts to an Axum HeaderMap.
    ///
    /// Fails with [`RestError::InternalError`] if any value set on the
    /// builder is not a valid header value.
    pub fn to_header_map(&self) -> RestResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        insert(&mut headers, header::CONTENT_TYPE, Some(&self.content_type))?;
        insert(&mut headers, header::LOCATION, self.location.as_ref())?;
        insert(
            &mut headers,
            header::CONTENT_LOCATION,
            self.content_location.as_ref(),
        )?;
        insert(&mut headers, header::ETAG, self.etag.as_ref())?;
        insert(&mut headers, header::LAST_MODIFIED, self.last_modified.as_ref())?;

        Ok(headers)
    }

    /// Returns the Location value.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the Content-Location value.
    pub fn content_location(&self) -> Option<&str> {
        self.content_location.as_deref()
    }

    /// Returns the ETag value.
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Returns the Last-Modified value.
    pub fn last_modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }

    /// Returns the Content-Type value.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: Option<&String>) -> RestResult<()> {
    if let Some(value) = value {
        let value = HeaderValue::from_str(value).map_err(|_| RestError::InternalError {
            message: format!("Cannot send {} header value {:?}", name, value),
        })?;
        headers.insert(name, value);
    }
    Ok(())
}

/// A bodiless response to an update.
///
/// Holds the header map built at composition time, so turning it into an
/// HTTP response cannot drop a header.
#[derive(Debug, Clone)]
pub struct VersionedResponse {
    status: StatusCode,
    headers: ResourceHeaders,
    header_map: HeaderMap,
}

impl VersionedResponse {
    /// Returns the status code (200 or 201).
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &ResourceHeaders {
        &self.headers
    }
}

impl IntoResponse for VersionedResponse {
    fn into_response(self) -> Response {
        (self.status, self.header_map).into_response()
    }
}

/// Composes update responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionedResponseComposer;

impl VersionedResponseComposer {
    /// Composes the response for `outcome`, stamped with the current time.
    ///
    /// Returns `Ok(None)` when there is no outcome, meaning the service had no
    /// resource to update, and an error when a header value cannot be sent.
    pub fn compose(
        outcome: Option<&UpdateOutcome>,
        base_url: &str,
        version: &str,
        resource_type: &str,
    ) -> RestResult<Option<VersionedResponse>> {
        Self::compose_at(outcome, base_url, version, resource_type, Utc::now())
    }

    /// Composes the response for `outcome` with an explicit `Last-Modified` time.
    pub fn compose_at(
        outcome: Option<&UpdateOutcome>,
        base_url: &str,
        version: &str,
        resource_type: &str,
        now: DateTime<Utc>,
    ) -> RestResult<Option<VersionedResponse>> {
        let Some(outcome) = outcome else {
            return Ok(None);
        };

        let status = if outcome.created {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };

        let mut headers = ResourceHeaders::new()
            .with_location(resource_url(base_url, version, resource_type, &outcome.id))
            .with_last_modified(now.to_rfc3339_opts(SecondsFormat::Millis, true));

        if let Some(resource_version) = &outcome.resource_version {
            headers = headers
                .with_content_location(history_url(
                    base_url,
                    version,
                    resource_type,
                    &outcome.id,
                    resource_version,
                ))
                .with_etag(resource_version);
        }

        let header_map = headers.to_header_map()?;

        Ok(Some(VersionedResponse {
            status,
            headers,
            header_map,
        }))
    }
}
