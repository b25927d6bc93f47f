//! Patient API route configuration.
//!
//! Resource routes are mounted under the configured version tag and
//! resource type, e.g. `/dstu2/Patient`.

use axum::{Router, routing::get};

use crate::handlers;
use crate::service::ResourceService;
use crate::state::AppState;

/// Creates all API routes.
///
/// # Routes
///
/// ## System-level
/// - `GET /health` - Health check
///
/// ## Type-level
/// - `GET /{version}/{type}` - Search
///
/// ## Instance-level
/// - `GET /{version}/{type}/{id}` - Read
/// - `PUT /{version}/{type}/{id}` - Update
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: ResourceService + 'static,
{
    let resource_path = state.config().resource_path();
    let instance_path = format!("{}/{{id}}", resource_path);

    Router::new()
        .route("/health", get(handlers::health_handler::<S>))
        .route(&resource_path, get(handlers::search_handler::<S>))
        .route(
            &instance_path,
            get(handlers::read_handler::<S>).put(handlers::update_handler::<S>),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::ServerConfig;
    use crate::service::InMemoryService;

    fn router(config: ServerConfig) -> Router {
        create_routes(AppState::new(Arc::new(InMemoryService::new()), config))
    }

    async fn status(router: Router, method: Method, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        router.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_routes_follow_configured_prefix() {
        let config = ServerConfig {
            api_version: "v9".to_string(),
            resource_type: "Observation".to_string(),
            ..ServerConfig::for_testing()
        };
        let router = router(config);

        assert_eq!(
            status(router.clone(), Method::GET, "/v9/Observation").await,
            StatusCode::OK
        );
        assert_eq!(
            status(router.clone(), Method::GET, "/dstu2/Patient").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(router, Method::GET, "/v9/Observation/missing").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let router = router(ServerConfig::for_testing());
        assert_eq!(
            status(router, Method::DELETE, "/dstu2/Patient/1").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
