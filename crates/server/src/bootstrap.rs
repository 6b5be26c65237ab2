use std::sync::Arc;

use smartedu_actions::ActionDispatcher;
use smartedu_core::config::{AppConfig, ConfigError};
use smartedu_gateway::{GatewayError, HttpBackendGateway};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub dispatcher: Arc<ActionDispatcher<HttpBackendGateway>>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("backend client could not be built: {0}")]
    Gateway(#[from] GatewayError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let gateway = HttpBackendGateway::from_config(&config.backend)?;
    info!(
        event_name = "system.bootstrap.gateway_ready",
        correlation_id = "bootstrap",
        backend_base_url = gateway.base_url(),
        timeout_secs = config.backend.timeout_secs,
        "backend gateway configured"
    );

    Ok(Application { config, dispatcher: Arc::new(ActionDispatcher::new(gateway)) })
}
