//! Resource controller.
//!
//! [`ResourceController`] is built once at start-up with its collaborators
//! (service, presenter, configuration) and exposes the three operations of
//! the API as methods. Each operation makes exactly one service call.
//!
//! | Operation | Guard | Service call | Result |
//! |-----------|-------|--------------|--------|
//! | [`search`](ResourceController::search) | - | `get_resources` | [`SearchBundle`] |
//! | [`read`](ResourceController::read) | payload id | `get_resource_by_id` | presented resource |
//! | [`update`](ResourceController::update) | path id, payload id | `update_resource` | [`VersionedResponse`] |
//!
//! Guard denials short-circuit before the service is called. Service
//! failures become [`RestError::InternalError`]; absent results become
//! [`RestError::NotFound`].
//!
//! A scoped caller may only write the record addressed by its own patient
//! identity. The path id is the record the service writes, so it is guarded
//! as well as any `id` the body names.
//!
//! Lookup by id additionally checks ownership of the returned record when
//! `enforce_read_ownership` is set, applying the same rule the search filter
//! uses. With the flag off, lookup by id performs no ownership check on the
//! fetched record and only the payload identity is guarded.

use std::sync::Arc;

use axum::http::HeaderValue;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::context::RequestContext;
use crate::error::{RestError, RestResult};
use crate::guard::ResourceAccessGuard;
use crate::presenter::Presenter;
use crate::responses::{SearchBundle, SearchBundler, VersionedResponse, VersionedResponseComposer};
use crate::service::{ResourceService, ServiceRequest};

/// Request orchestration for one resource type.
pub struct ResourceController<S> {
    service: Arc<S>,
    presenter: Arc<dyn Presenter>,
    config: Arc<ServerConfig>,
}

impl<S: ResourceService> ResourceController<S> {
    /// Creates a controller with its collaborators.
    pub fn new(service: Arc<S>, presenter: Arc<dyn Presenter>, config: Arc<ServerConfig>) -> Self {
        Self {
            service,
            presenter,
            config,
        }
    }

    /// Returns the data service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Builds the context for a request made with the given patient scope.
    pub fn request_context(&self, patient: Option<String>) -> RequestContext {
        RequestContext::new(self.config.api_version.clone(), patient)
    }

    /// Searches and bundles the visible results.
    pub async fn search(
        &self,
        request: &ServiceRequest,
        context: &RequestContext,
    ) -> RestResult<SearchBundle> {
        let records = self
            .service
            .get_resources(request, context)
            .await
            .map_err(|e| {
                warn!(error = %e, "Search failed");
                RestError::from(e)
            })?;

        let bundle = SearchBundler::new(self.presenter.as_ref()).bundle(
            Some(&records),
            context.patient(),
            &self.config.base_url,
            &self.config.resource_type,
            context.version(),
        );

        debug!(
            returned = records.len(),
            visible = bundle.total(),
            "Search completed"
        );

        Ok(bundle)
    }

    /// Looks up a single resource by id.
    pub async fn read(&self, request: &ServiceRequest, context: &RequestContext) -> RestResult<Value> {
        ResourceAccessGuard::authorize(context.patient(), request.payload_patient_id())
            .into_result()?;

        let record = self
            .service
            .get_resource_by_id(request, context)
            .await
            .map_err(|e| {
                warn!(error = %e, "Lookup failed");
                RestError::from(e)
            })?
            .ok_or_else(|| self.not_found(request))?;

        if self.config.enforce_read_ownership && !record.visible_to(context.patient()) {
            debug!(
                id = %record.id(),
                owner = ?record.patient_id(),
                "Lookup denied by ownership"
            );
            return Err(RestError::Unauthorized {
                message: format!(
                    "You are not allowed to access {} {}.",
                    self.config.resource_type,
                    record.id()
                ),
            });
        }

        Ok(self.presenter.to_public_resource(&record))
    }

    /// Writes a resource and composes the versioned response.
    pub async fn update(
        &self,
        request: &ServiceRequest,
        context: &RequestContext,
    ) -> RestResult<VersionedResponse> {
        ResourceAccessGuard::authorize(context.patient(), request.id.as_deref()).into_result()?;
        ResourceAccessGuard::authorize(context.patient(), request.payload_patient_id())
            .into_result()?;
        if let Some(id) = request.id.as_deref() {
            check_header_safe(id)?;
        }

        let outcome = self
            .service
            .update_resource(request, context)
            .await
            .map_err(|e| {
                warn!(error = %e, "Update failed");
                RestError::from(e)
            })?;

        let response = VersionedResponseComposer::compose(
            outcome.as_ref(),
            &self.config.base_url,
            context.version(),
            &self.config.resource_type,
        )?
        .ok_or_else(|| self.not_found(request))?;

        debug!(
            status = %response.status(),
            etag = ?response.headers().etag(),
            "Update completed"
        );

        Ok(response)
    }

    fn not_found(&self, request: &ServiceRequest) -> RestError {
        RestError::NotFound {
            resource_type: self.config.resource_type.clone(),
            id: request.id.clone(),
        }
    }
}

/// Rejects ids that could not be echoed back in the `Location` header.
fn check_header_safe(id: &str) -> RestResult<()> {
    match HeaderValue::from_str(id) {
        Ok(_) => Ok(()),
        Err(_) => Err(RestError::BadRequest {
            message: format!("Invalid resource id {:?}", id),
        }),
    }
}
