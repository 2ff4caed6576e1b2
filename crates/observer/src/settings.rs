//! Observer settings

use std::time::Duration;

/// Default time between two observations of the same cluster
pub const DEFAULT_OBSERVATION_INTERVAL: Duration = Duration::from_secs(10);

/// Default upper bound for a single Elasticsearch request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Static settings shared by every observer created by a manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Time between two observations
    pub observation_interval: Duration,
    /// Upper bound for each request of an observation
    pub request_timeout: Duration,
}

impl Settings {
    /// Create settings with the given interval and request timeout
    #[must_use]
    pub fn new(observation_interval: Duration, request_timeout: Duration) -> Self {
        Self {
            observation_interval,
            request_timeout,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(DEFAULT_OBSERVATION_INTERVAL, DEFAULT_REQUEST_TIMEOUT)
    }
}
