//! # patient-rest - Patient-scoped FHIR REST API
//!
//! This crate provides the HTTP layer of a patient-facing FHIR DSTU2 API. It
//! sits between clients and a data service: it enforces patient-level access
//! scoping, turns raw service records into FHIR resources and shapes
//! responses with the FHIR versioning headers.
//!
//! Storage and query semantics belong to the data service, injected as an
//! implementation of [`service::ResourceService`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use patient_rest::{create_app_with_config, ServerConfig};
//! use patient_rest::service::InMemoryService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(InMemoryService::new(), config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | search | GET | `/[version]/[type]?params` |
//! | read | GET | `/[version]/[type]/[id]` |
//! | update | PUT | `/[version]/[type]/[id]` |
//! | health | GET | `/health` |
//!
//! `[version]` defaults to `dstu2` and `[type]` to `Patient`.
//!
//! ## Patient Scope
//!
//! A caller is either unscoped or restricted to a single patient. The scope
//! comes from a [`extractors::PatientScope`] request extension set by
//! authentication middleware, or else from the `X-Patient-ID` header.
//!
//! - Search results are filtered to the caller's own records.
//! - Reads and updates whose JSON body names another patient are refused.
//! - Updates addressed to another patient's record id are refused.
//! - Reads of a record owned by another patient are refused unless
//!   `enforce_read_ownership` is turned off.
//!
//! ## Error Handling
//!
//! All errors are returned as FHIR [OperationOutcome](https://hl7.org/fhir/DSTU2/operationoutcome.html)
//! resources with appropriate HTTP status codes:
//!
//! | HTTP Status | FHIR Issue Code | Description |
//! |-------------|-----------------|-------------|
//! | 400 | invalid | Malformed request body or resource id |
//! | 401 | security | Patient scope violation |
//! | 404 | not-found | Resource not found |
//! | 500 | exception | Data service failure |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and OperationOutcome generation
//! - [`config`] - Server configuration
//! - [`context`] - Per-request context
//! - [`service`] - Data service boundary and the in-memory service
//! - [`presenter`] - Public representation of raw records
//! - [`guard`] - Patient access guard
//! - [`controller`] - Request orchestration
//! - [`state`] - Application state
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] - Axum extractors for scope and request bodies
//! - [`responses`] - Search bundles and versioned update responses
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod extractors;
pub mod guard;
pub mod handlers;
pub mod presenter;
pub mod responses;
pub mod routing;
pub mod service;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use context::RequestContext;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::presenter::{PatientPresenter, Presenter};
use crate::service::ResourceService;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(service: S) -> Router
where
    S: ResourceService + 'static,
{
    create_app_with_config(service, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Records are presented with [`PatientPresenter`].
///
/// # Example
///
/// ```rust,ignore
/// use patient_rest::{create_app_with_config, ServerConfig};
/// use patient_rest::service::InMemoryService;
///
/// let config = ServerConfig {
///     port: 3000,
///     base_url: "https://fhir.example.com".to_string(),
///     ..Default::default()
/// };
/// let app = create_app_with_config(InMemoryService::new(), config);
/// ```
pub fn create_app_with_config<S>(service: S, config: ServerConfig) -> Router
where
    S: ResourceService + 'static,
{
    create_app_with_presenter(service, Arc::new(PatientPresenter), config)
}

/// Creates the Axum application with a custom presenter.
pub fn create_app_with_presenter<S>(
    service: S,
    presenter: Arc<dyn Presenter>,
    config: ServerConfig,
) -> Router
where
    S: ResourceService + 'static,
{
    info!(
        service = service.service_name(),
        resource_path = %config.resource_path(),
        "Creating REST API server"
    );

    let state = AppState::with_presenter(Arc::new(service), presenter, config.clone());

    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = split_list(&config.cors_origins)
            .filter_map(|s| s.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = split_list(&config.cors_methods)
            .filter_map(|s| s.parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = split_list(&config.cors_headers)
            .filter_map(|s| s.parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` overrides
/// `level` when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("patient_rest={},tower_http=debug", level)));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
