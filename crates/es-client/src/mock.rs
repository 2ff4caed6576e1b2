//! Mock EsClient for unit testing
//!
//! This module provides a mock implementation of `EsClientTrait` that can be used
//! in unit tests without requiring a running Elasticsearch cluster.

use crate::client::BasicAuth;
use crate::error::EsClientError;
use crate::es_trait::EsClientTrait;
use crate::models::{Health, HealthStatus, License};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock EsClient for testing
///
/// Responses are stored in memory and shared between clones, so a test can keep a
/// handle on the mock while an observer owns another one.
#[derive(Clone, Debug)]
pub struct MockEsClient {
    endpoint: String,
    user: Option<BasicAuth>,
    ca_certs: Vec<String>,
    health: Arc<Mutex<Option<Health>>>,
    license: Arc<Mutex<Option<License>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    failing: Arc<AtomicBool>,
    health_calls: Arc<AtomicUsize>,
    license_calls: Arc<AtomicUsize>,
}

impl MockEsClient {
    /// Create a new mock client reporting a green single-node cluster
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            user: None,
            ca_certs: Vec::new(),
            health: Arc::new(Mutex::new(Some(Self::health_with_status(HealthStatus::Green)))),
            license: Arc::new(Mutex::new(Some(License {
                uid: "mock-license".to_string(),
                license_type: "basic".to_string(),
                status: "active".to_string(),
                expiry_date_in_millis: None,
            }))),
            delay: Arc::new(Mutex::new(None)),
            failing: Arc::new(AtomicBool::new(false)),
            health_calls: Arc::new(AtomicUsize::new(0)),
            license_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the credentials taken into account by `equal`
    pub fn with_user(mut self, user: BasicAuth) -> Self {
        self.user = Some(user);
        self
    }

    /// Set the CA certificates taken into account by `equal`
    pub fn with_ca_certs(mut self, ca_certs: Vec<String>) -> Self {
        self.ca_certs = ca_certs;
        self
    }

    /// Build a health response with the given color
    pub fn health_with_status(status: HealthStatus) -> Health {
        Health {
            cluster_name: "mock-cluster".to_string(),
            status,
            timed_out: false,
            number_of_nodes: 1,
            number_of_data_nodes: 1,
            active_primary_shards: 0,
            active_shards: 0,
            relocating_shards: 0,
            initializing_shards: 0,
            unassigned_shards: 0,
        }
    }

    /// Health returned by `get_cluster_health`; `None` makes the call fail
    pub fn set_health(&self, health: Option<Health>) {
        *self.health.lock().unwrap() = health;
    }

    /// License returned by `get_license`; `None` makes the call fail
    pub fn set_license(&self, license: Option<License>) {
        *self.license.lock().unwrap() = license;
    }

    /// Delay every response by `delay`
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Make every call fail (simulates an unreachable cluster)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `get_cluster_health` calls made so far
    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_license` calls made so far
    pub fn license_calls(&self) -> usize {
        self.license_calls.load(Ordering::SeqCst)
    }

    async fn maybe_delay(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check_failing(&self) -> Result<(), EsClientError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EsClientError::Api(format!("{} is unreachable", self.endpoint)));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl EsClientTrait for MockEsClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn equal(&self, other: &Self) -> bool {
        self.endpoint == other.endpoint && self.user == other.user && self.ca_certs == other.ca_certs
    }

    async fn get_cluster_health(&self) -> Result<Health, EsClientError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;
        self.check_failing()?;
        self.health
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| EsClientError::Api("cluster health unavailable".to_string()))
    }

    async fn get_license(&self) -> Result<License, EsClientError> {
        self.license_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;
        self.check_failing()?;
        self.license
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| EsClientError::Api("license unavailable".to_string()))
    }
}
