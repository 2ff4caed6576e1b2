//! Elasticsearch Controller
//!
//! Observes the Elasticsearch clusters declared by `ElasticsearchCluster`
//! resources and reports their health in the resource status:
//! - One background observer per cluster polls health and license
//! - Observers are replaced when the cluster's endpoint, credentials or CA change
//! - Observers are stopped by a finalizer when the resource is deleted

mod config;
mod controller;
mod error;
mod name;
mod reconciler;

#[cfg(test)]
mod reconciler_test;

use crate::config::Config;
use crate::error::ControllerError;
use controller::Controller;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if rustls::crypto::ring::default_provider().install_default().is_err() {
        debug!("rustls crypto provider already installed");
    }

    info!("Starting Elasticsearch Controller");

    let config = Config::from_env()?;

    info!("Configuration:");
    info!("  Namespace: {}", config.namespace.as_deref().unwrap_or("all namespaces"));
    info!("  Observation interval: {:?}", config.observer_settings.observation_interval);
    info!("  Request timeout: {:?}", config.observer_settings.request_timeout);

    let controller = Controller::new(&config).await?;
    controller.run().await?;

    Ok(())
}
