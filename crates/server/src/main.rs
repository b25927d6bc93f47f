//! Patient API server.
//!
//! Serves the patient-scoped FHIR DSTU2 API backed by the in-memory data
//! service.

use clap::Parser;
use patient_rest::service::InMemoryService;
use patient_rest::{ServerConfig, create_app_with_config, init_logging};
use tracing::info;

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        base_url = %config.base_url,
        resource_path = %config.resource_path(),
        enforce_read_ownership = config.enforce_read_ownership,
        "Starting patient API server"
    );

    let app = create_app_with_config(InMemoryService::new(), config.clone());
    serve(app, &config).await
}
