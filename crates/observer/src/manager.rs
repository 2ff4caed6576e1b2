//! Manager for a set of observers.
//!
//! The manager owns the mapping from cluster to observer. Lookups take the read
//! lock only; stopping an observer happens with no lock held, so a slow stop
//! never blocks reconciliation of other clusters. The lock is never held across
//! an `.await`.

use crate::observer::Observer;
use crate::settings::Settings;
use crate::state::State;
use crds::NamespacedName;
use es_client::EsClientTrait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

type ObserverMap<C> = HashMap<NamespacedName, Arc<Observer<C>>>;

/// Keeps at most one observer per cluster.
pub struct ObserverManager<C> {
    observers: RwLock<ObserverMap<C>>,
    settings: Settings,
}

impl<C> ObserverManager<C>
where
    C: EsClientTrait + 'static,
{
    /// Creates an empty manager; `settings` are passed to every observer it creates.
    pub fn new(settings: Settings) -> Self {
        Self {
            observers: RwLock::new(HashMap::new()),
            settings,
        }
    }

    /// Settings passed to new observers
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the last known state of the given cluster, as expected by the
    /// main reconciliation driver.
    pub async fn observed_state_resolver(&self, cluster: &NamespacedName, client: Arc<C>) -> State {
        self.observe(cluster, client).await.last_state()
    }

    /// Gets or creates the observer for the given cluster.
    ///
    /// If the existing observer's client is not equal to `client` (e.g. a
    /// different CA certificate or password), the observer is stopped and
    /// replaced by one using `client`.
    pub async fn observe(&self, cluster: &NamespacedName, client: Arc<C>) -> Arc<Observer<C>> {
        match self.get(cluster) {
            None => self.create_observer(cluster, client),
            Some(observer) if !observer.client().equal(&client) => {
                info!(cluster = %cluster, "Replacing observer HTTP client");
                self.stop_observing(cluster).await;
                self.create_observer(cluster, client)
            }
            Some(observer) => observer,
        }
    }

    /// Creates a new observer for the given cluster and inserts it, replacing
    /// any existing entry.
    ///
    /// Callers are expected to have stopped the previous observer. If an entry
    /// is displaced anyway (concurrent creation), it is told to stop so its
    /// task does not outlive its entry.
    pub fn create_observer(&self, cluster: &NamespacedName, client: Arc<C>) -> Arc<Observer<C>> {
        let observer = Arc::new(Observer::new(cluster.clone(), client, self.settings));
        let displaced = self.write().insert(cluster.clone(), Arc::clone(&observer));

        if let Some(displaced) = displaced {
            if !Arc::ptr_eq(&displaced, &observer) && !displaced.is_stopped() {
                debug!(cluster = %cluster, "Signalling displaced observer to stop");
                displaced.signal_stop();
            }
        }

        info!(cluster = %cluster, "Created observer");
        observer
    }

    /// Stops and deletes the observer for the given cluster.
    ///
    /// Meant to be called by the deletion finalizer. Absent clusters are a no-op.
    pub async fn stop_observing(&self, cluster: &NamespacedName) {
        let Some(observer) = self.get(cluster) else {
            return;
        };

        observer.stop().await;

        let mut observers = self.write();
        // The entry may already point to a newer observer if the cluster was
        // re-observed while this one was stopping.
        if observers
            .get(cluster)
            .is_some_and(|current| Arc::ptr_eq(current, &observer))
        {
            observers.remove(cluster);
        }
    }

    /// Stops every observer. Used on controller shutdown.
    pub async fn stop_all(&self) {
        for cluster in self.list() {
            self.stop_observing(&cluster).await;
        }
    }

    /// Names of the clusters currently observed.
    ///
    /// This is a snapshot; concurrent calls may add or remove clusters right after.
    pub fn list(&self) -> Vec<NamespacedName> {
        self.read().keys().cloned().collect()
    }

    /// Current observer of the given cluster, if any
    pub fn get(&self, cluster: &NamespacedName) -> Option<Arc<Observer<C>>> {
        self.read().get(cluster).cloned()
    }

    // Every critical section leaves the map consistent, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, ObserverMap<C>> {
        self.observers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ObserverMap<C>> {
        self.observers.write().unwrap_or_else(PoisonError::into_inner)
    }
}
