//! Elasticsearch cluster observers
//!
//! An [`Observer`] is a background task that periodically polls one cluster's
//! health and license and caches the result. The [`ObserverManager`] keeps exactly
//! one observer per cluster, replaces it when the cluster's connection parameters
//! change, and tears it down when the cluster is deleted.
//!
//! Reconcilers call [`ObserverManager::observed_state_resolver`] on every
//! reconciliation and [`ObserverManager::stop_observing`] from the deletion
//! finalizer.

pub mod manager;
pub mod observer;
pub mod settings;
pub mod state;

#[cfg(test)]
mod manager_test;

pub use manager::ObserverManager;
pub use observer::Observer;
pub use settings::Settings;
pub use state::State;
