//! Controller configuration loaded from environment variables.

use crate::error::ControllerError;
use observer::Settings;
use observer::settings::{DEFAULT_OBSERVATION_INTERVAL, DEFAULT_REQUEST_TIMEOUT};
use std::env;
use std::time::Duration;

/// Runtime configuration of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Namespace to watch; `None` watches all namespaces
    pub namespace: Option<String>,
    /// Settings passed to every observer
    pub observer_settings: Settings,
}

impl Config {
    /// Reads `WATCH_NAMESPACE`, `OBSERVATION_INTERVAL_SECONDS` and `REQUEST_TIMEOUT_SECONDS`
    pub fn from_env() -> Result<Self, ControllerError> {
        let namespace = env::var("WATCH_NAMESPACE").ok().filter(|ns| !ns.is_empty());
        let observation_interval = parse_seconds(
            "OBSERVATION_INTERVAL_SECONDS",
            env::var("OBSERVATION_INTERVAL_SECONDS").ok(),
            DEFAULT_OBSERVATION_INTERVAL,
        )?;
        let request_timeout = parse_seconds(
            "REQUEST_TIMEOUT_SECONDS",
            env::var("REQUEST_TIMEOUT_SECONDS").ok(),
            DEFAULT_REQUEST_TIMEOUT,
        )?;

        Ok(Self {
            namespace,
            observer_settings: Settings::new(observation_interval, request_timeout),
        })
    }
}

/// Parses a positive number of seconds, falling back to `default` when unset
pub fn parse_seconds(key: &str, value: Option<String>, default: Duration) -> Result<Duration, ControllerError> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.trim().parse::<u64>() {
        Ok(0) => Err(ControllerError::InvalidConfig(format!("{} must be greater than 0", key))),
        Ok(seconds) => Ok(Duration::from_secs(seconds)),
        Err(e) => Err(ControllerError::InvalidConfig(format!(
            "{} must be a number of seconds, got {:?}: {}",
            key, value, e
        ))),
    }
}
