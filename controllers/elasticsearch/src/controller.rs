//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires the
//! ElasticsearchCluster watch to the reconciler and owns the observers'
//! lifecycle.

use crate::config::Config;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crds::ElasticsearchCluster;
use es_client::EsClient;
use futures::StreamExt;
use kube::{Api, Client};
use kube_runtime::controller::{Action, Config as ControllerConfig};
use kube_runtime::{Controller as KubeController, watcher};
use observer::ObserverManager;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Delay before retrying a failed reconciliation
const ERROR_REQUEUE: Duration = Duration::from_secs(60);

/// Main controller for ElasticsearchCluster resources.
pub struct Controller {
    api: Api<ElasticsearchCluster>,
    reconciler: Arc<Reconciler>,
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(config: &Config) -> Result<Self, ControllerError> {
        info!("Initializing Elasticsearch Controller");

        let kube_client = Client::try_default().await?;

        let api: Api<ElasticsearchCluster> = match config.namespace.as_deref() {
            Some(ns) => Api::namespaced(kube_client.clone(), ns),
            None => Api::all(kube_client.clone()),
        };

        let observers = ObserverManager::<EsClient>::new(config.observer_settings);
        let reconciler = Arc::new(Reconciler::new(kube_client, observers));

        Ok(Self { api, reconciler })
    }

    /// Runs the controller until a termination signal is received, then stops
    /// every observer.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("Elasticsearch Controller running");

        KubeController::new(self.api, watcher::Config::default())
            .with_config(ControllerConfig::default().concurrency(3))
            .shutdown_on_signal()
            .run(reconcile, error_policy, Arc::clone(&self.reconciler))
            .for_each(|res| async move {
                match res {
                    Ok((obj, _)) => debug!("Reconciled {:?}", obj),
                    Err(e) => error!("Controller error: {}", e),
                }
            })
            .await;

        info!("Shutting down, stopping {} observers", self.reconciler.observers().list().len());
        self.reconciler.observers().stop_all().await;
        Ok(())
    }
}

async fn reconcile(
    cluster: Arc<ElasticsearchCluster>,
    reconciler: Arc<Reconciler>,
) -> Result<Action, ControllerError> {
    reconciler.reconcile(cluster).await
}

fn error_policy(
    cluster: Arc<ElasticsearchCluster>,
    error: &ControllerError,
    _reconciler: Arc<Reconciler>,
) -> Action {
    error!(
        "Reconciliation error for ElasticsearchCluster {:?}/{:?}: {}",
        cluster.metadata.namespace, cluster.metadata.name, error
    );
    Action::requeue(ERROR_REQUEUE)
}
