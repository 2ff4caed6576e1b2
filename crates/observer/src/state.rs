//! Observed cluster state

use es_client::{Health, HealthStatus, License};

/// Most recent observation of a cluster.
///
/// Each field is `None` when it has not been observed yet or when the last
/// attempt to retrieve it failed. `State::default()` is the "unknown" state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    /// Response of `GET /_cluster/health`
    pub cluster_health: Option<Health>,
    /// License reported by `GET /_license`
    pub cluster_license: Option<License>,
}

impl State {
    /// True when nothing is known about the cluster
    pub fn is_unknown(&self) -> bool {
        self.cluster_health.is_none() && self.cluster_license.is_none()
    }

    /// Observed health color, if any
    pub fn health_status(&self) -> Option<HealthStatus> {
        self.cluster_health.as_ref().map(|h| h.status)
    }
}
