use assessment_relay::AppState;
use assessment_relay::config::RelayConfig;
use assessment_relay::routes::assessment_routes;
use assessment_relay::services::upstream_client::ReqwestUpstreamClient;
use std::sync::Arc;
use tokio::net::TcpListener; //TCP listener
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main] // the program entry point using the Tokio async runtime.
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok(); //loads environment variables

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match RelayConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let client = Arc::new(ReqwestUpstreamClient::new(
        &config.api_token,
        config.request_timeout,
    )?);

    info!(
        tenant = %config.tenant_base_url,
        timeout_secs = config.request_timeout.as_secs(),
        "Relaying assessments upstream"
    );
    if config.allowed_origins.is_empty() {
        info!("CORS: allowing any origin");
    } else {
        info!("CORS: allowing {:?}", config.allowed_origins);
    }

    let app = assessment_routes::router(AppState::new(config.clone(), client));

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
