//! Application state for the patient REST API.
//!
//! This module defines the shared state handed to every request handler. It
//! wraps the [`ResourceController`] so the collaborators are wired together
//! once at start-up and shared read-only afterwards.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::context::RequestContext;
use crate::controller::ResourceController;
use crate::extractors::PatientScope;
use crate::presenter::{PatientPresenter, Presenter};
use crate::service::ResourceService;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The data service type (must implement [`ResourceService`])
///
/// # Example
///
/// ```rust,ignore
/// use patient_rest::{AppState, ServerConfig};
/// use patient_rest::service::InMemoryService;
/// use std::sync::Arc;
///
/// let state = AppState::new(Arc::new(InMemoryService::new()), ServerConfig::default());
/// ```
pub struct AppState<S> {
    controller: Arc<ResourceController<S>>,
}

// S sits behind an Arc and need not be Clone.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
        }
    }
}

impl<S: ResourceService> AppState<S> {
    /// Creates state that presents records with [`PatientPresenter`].
    pub fn new(service: Arc<S>, config: ServerConfig) -> Self {
        Self::with_presenter(service, Arc::new(PatientPresenter), config)
    }

    /// Creates state with an explicit presenter.
    pub fn with_presenter(
        service: Arc<S>,
        presenter: Arc<dyn Presenter>,
        config: ServerConfig,
    ) -> Self {
        Self {
            controller: Arc::new(ResourceController::new(
                service,
                presenter,
                Arc::new(config),
            )),
        }
    }

    /// Returns the resource controller.
    pub fn controller(&self) -> &ResourceController<S> {
        &self.controller
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        self.controller.config()
    }

    /// Returns a reference to the data service.
    pub fn service(&self) -> &S {
        self.controller.service()
    }

    /// Builds the request context for a caller.
    pub fn request_context(&self, scope: PatientScope) -> RequestContext {
        self.controller.request_context(scope.into_patient_id())
    }
}
