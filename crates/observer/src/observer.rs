//! Background observer of a single Elasticsearch cluster.
//!
//! The observer task starts as soon as the observer is created. It polls the
//! cluster once immediately, then every `observation_interval`, and publishes
//! each result through a `watch` channel so readers never wait on a poll.

use crate::settings::Settings;
use crate::state::State;
use crds::NamespacedName;
use es_client::{EsClientError, EsClientTrait};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shortest accepted observation interval (`tokio::time::interval` rejects zero)
const MIN_OBSERVATION_INTERVAL: Duration = Duration::from_millis(100);

/// Periodically observes one cluster and caches the last observed state.
pub struct Observer<C> {
    cluster: NamespacedName,
    client: Arc<C>,
    settings: Settings,
    state: watch::Receiver<State>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<C> Observer<C>
where
    C: EsClientTrait + 'static,
{
    /// Creates an observer and starts polling the cluster right away.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(cluster: NamespacedName, client: Arc<C>, settings: Settings) -> Self {
        let (tx, rx) = watch::channel(State::default());
        let cancel = CancellationToken::new();

        debug!(cluster = %cluster, endpoint = client.endpoint(), "Starting observer");
        let task = tokio::spawn(run(
            cluster.clone(),
            Arc::clone(&client),
            settings,
            tx,
            cancel.clone(),
        ));

        Self {
            cluster,
            client,
            settings,
            state: rx,
            cancel,
            task: Mutex::new(Some(task)),
        }
    }

    /// Cluster this observer targets
    pub fn cluster(&self) -> &NamespacedName {
        &self.cluster
    }

    /// Client this observer polls with
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Settings this observer was created with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Last observed state, or the unknown state if no observation completed yet.
    ///
    /// Never waits for an in-flight observation.
    pub fn last_state(&self) -> State {
        self.state.borrow().clone()
    }

    /// True once a stop has been requested
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stops the observer and waits for its background task to finish.
    ///
    /// Any in-flight observation is abandoned. Calling `stop` again, or
    /// concurrently, returns once the task has finished.
    pub async fn stop(&self) {
        self.cancel.cancel();

        let mut task = self.task.lock().await;
        if let Some(handle) = task.take() {
            if let Err(e) = handle.await {
                warn!(cluster = %self.cluster, error = %e, "Observer task did not exit cleanly");
            }
            info!(cluster = %self.cluster, "Observer stopped");
        }
    }

    /// Requests a stop without waiting for the task to finish
    pub(crate) fn signal_stop(&self) {
        self.cancel.cancel();
    }
}

impl<C> Drop for Observer<C> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run<C>(
    cluster: NamespacedName,
    client: Arc<C>,
    settings: Settings,
    tx: watch::Sender<State>,
    cancel: CancellationToken,
) where
    C: EsClientTrait,
{
    let mut ticker = tokio::time::interval(settings.observation_interval.max(MIN_OBSERVATION_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let state = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            state = retrieve_state(&cluster, client.as_ref(), settings.request_timeout) => state,
        };

        debug!(
            cluster = %cluster,
            health = ?state.health_status(),
            "Observed cluster state"
        );
        tx.send_replace(state);
    }

    debug!(cluster = %cluster, "Observer task exiting");
}

/// Retrieves health and license concurrently; a failed retrieval leaves its field empty.
async fn retrieve_state<C>(cluster: &NamespacedName, client: &C, timeout: Duration) -> State
where
    C: EsClientTrait,
{
    let (cluster_health, cluster_license) = tokio::join!(
        fetch(cluster, "cluster health", timeout, client.get_cluster_health()),
        fetch(cluster, "license", timeout, client.get_license()),
    );

    State {
        cluster_health,
        cluster_license,
    }
}

async fn fetch<T>(
    cluster: &NamespacedName,
    what: &str,
    timeout: Duration,
    request: impl Future<Output = Result<T, EsClientError>>,
) -> Option<T> {
    match tokio::time::timeout(timeout, request).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!(cluster = %cluster, error = %e, "Unable to retrieve {}", what);
            None
        }
        Err(_) => {
            warn!(cluster = %cluster, timeout = ?timeout, "Timed out retrieving {}", what);
            None
        }
    }
}
