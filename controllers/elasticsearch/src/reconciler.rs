//! Reconciliation logic for ElasticsearchCluster CRDs.
//!
//! Each reconciliation builds an Elasticsearch client from the resource spec,
//! asks the observer manager for the last observed state and writes it to the
//! resource status. Deletion goes through a finalizer that stops the observer.

use crate::error::ControllerError;
use crate::name;
use chrono::{DateTime, Utc};
use crds::{ClusterPhase, ElasticsearchCluster, ElasticsearchClusterStatus, NamespacedName};
use es_client::{BasicAuth, EsClient, HealthStatus};
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client};
use kube_runtime::controller::Action;
use kube_runtime::finalizer::{Event as Finalizer, finalizer};
use observer::{ObserverManager, State};
use std::sync::Arc;
use tracing::{debug, info};

/// Finalizer guaranteeing observers are stopped when a cluster is deleted
pub const FINALIZER_NAME: &str = "stack.microscaler.io/observer";

/// Reconciles ElasticsearchCluster resources.
pub struct Reconciler {
    client: Client,
    observers: ObserverManager<EsClient>,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(client: Client, observers: ObserverManager<EsClient>) -> Self {
        Self { client, observers }
    }

    /// Observers owned by this reconciler
    pub fn observers(&self) -> &ObserverManager<EsClient> {
        &self.observers
    }

    /// Reconciles an ElasticsearchCluster, dispatching to apply or cleanup.
    pub async fn reconcile(&self, cluster: Arc<ElasticsearchCluster>) -> Result<Action, ControllerError> {
        let namespace = cluster.metadata.namespace.as_deref().ok_or_else(|| {
            ControllerError::InvalidResource("ElasticsearchCluster missing namespace".to_string())
        })?;
        let api: Api<ElasticsearchCluster> = Api::namespaced(self.client.clone(), namespace);

        finalizer(&api, FINALIZER_NAME, cluster, |event| async move {
            match event {
                Finalizer::Apply(cluster) => self.apply(&cluster).await,
                Finalizer::Cleanup(cluster) => self.cleanup(&cluster).await,
            }
        })
        .await
        .map_err(|e| ControllerError::Finalizer(Box::new(e)))
    }

    async fn apply(&self, cluster: &ElasticsearchCluster) -> Result<Action, ControllerError> {
        let id = NamespacedName::from_resource(cluster);
        debug!("Reconciling ElasticsearchCluster {}", id);

        let es_client = Arc::new(self.build_client(cluster, &id).await?);
        let state = self.observers.observed_state_resolver(&id, es_client).await;

        let status = status_from_state(&state, Utc::now());
        if status_changed(cluster.status.as_ref(), &status) {
            info!(
                "ElasticsearchCluster {} phase {:?} -> {:?}",
                id,
                cluster.status.as_ref().map(|s| s.phase),
                status.phase
            );
            let api: Api<ElasticsearchCluster> = Api::namespaced(self.client.clone(), &id.namespace);
            let patch = serde_json::json!({ "status": status });
            api.patch_status(&id.name, &PatchParams::default(), &Patch::Merge(&patch))
                .await?;
        }

        Ok(Action::requeue(self.observers.settings().observation_interval))
    }

    async fn cleanup(&self, cluster: &ElasticsearchCluster) -> Result<Action, ControllerError> {
        let id = NamespacedName::from_resource(cluster);
        info!("ElasticsearchCluster {} deleted, stopping observer", id);
        self.observers.stop_observing(&id).await;
        Ok(Action::await_change())
    }

    /// Builds the client described by the cluster spec and its referenced Secrets.
    async fn build_client(
        &self,
        cluster: &ElasticsearchCluster,
        id: &NamespacedName,
    ) -> Result<EsClient, ControllerError> {
        let endpoint = cluster
            .spec
            .endpoint
            .clone()
            .unwrap_or_else(|| name::default_endpoint(id));

        let user = match &cluster.spec.credentials_secret_ref {
            Some(secret_ref) => {
                let secret = self.get_secret(&id.namespace, &secret_ref.name).await?;
                Some(BasicAuth::new(
                    secret_value(&secret, &secret_ref.username_key)?,
                    secret_value(&secret, &secret_ref.password_key)?,
                ))
            }
            None => None,
        };

        let ca_certs = match &cluster.spec.ca_secret_ref {
            Some(secret_ref) => {
                let secret = self.get_secret(&id.namespace, &secret_ref.name).await?;
                vec![secret_value(&secret, &secret_ref.key)?]
            }
            None => Vec::new(),
        };

        Ok(EsClient::new(
            endpoint,
            user,
            ca_certs,
            self.observers.settings().request_timeout,
        )?)
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, ControllerError> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get(name).await?)
    }
}

/// Reads a UTF-8 value out of a Secret's data
pub(crate) fn secret_value(secret: &Secret, key: &str) -> Result<String, ControllerError> {
    let secret_name = secret.metadata.name.clone().unwrap_or_default();
    let bytes = secret
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .ok_or_else(|| ControllerError::InvalidSecret(secret_name.clone(), format!("missing key {}", key)))?;

    String::from_utf8(bytes.0.clone())
        .map_err(|_| ControllerError::InvalidSecret(secret_name, format!("key {} is not valid UTF-8", key)))
}

/// Maps an observed state to the resource status
pub(crate) fn status_from_state(state: &State, now: DateTime<Utc>) -> ElasticsearchClusterStatus {
    let phase = match state.health_status() {
        Some(HealthStatus::Green) => ClusterPhase::Green,
        Some(HealthStatus::Yellow) => ClusterPhase::Yellow,
        Some(HealthStatus::Red) => ClusterPhase::Red,
        None => ClusterPhase::Unknown,
    };

    ElasticsearchClusterStatus {
        phase,
        cluster_name: state.cluster_health.as_ref().map(|h| h.cluster_name.clone()),
        number_of_nodes: state.cluster_health.as_ref().map(|h| h.number_of_nodes),
        license_type: state.cluster_license.as_ref().map(|l| l.license_type.clone()),
        last_observed: Some(now),
    }
}

/// Whether `new` differs from `current` in anything but the observation timestamp
pub(crate) fn status_changed(
    current: Option<&ElasticsearchClusterStatus>,
    new: &ElasticsearchClusterStatus,
) -> bool {
    let Some(current) = current else {
        return true;
    };
    current.phase != new.phase
        || current.cluster_name != new.cluster_name
        || current.number_of_nodes != new.number_of_nodes
        || current.license_type != new.license_type
}
