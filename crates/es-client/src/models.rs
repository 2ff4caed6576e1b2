//! Elasticsearch API response models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cluster health color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Green,
    Yellow,
    Red,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthStatus::Green => "green",
            HealthStatus::Yellow => "yellow",
            HealthStatus::Red => "red",
        };
        f.write_str(s)
    }
}

/// Response of `GET /_cluster/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub cluster_name: String,
    pub status: HealthStatus,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub number_of_nodes: u32,
    #[serde(default)]
    pub number_of_data_nodes: u32,
    #[serde(default)]
    pub active_primary_shards: u32,
    #[serde(default)]
    pub active_shards: u32,
    #[serde(default)]
    pub relocating_shards: u32,
    #[serde(default)]
    pub initializing_shards: u32,
    #[serde(default)]
    pub unassigned_shards: u32,
}

/// License currently applied to the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub uid: String,
    #[serde(rename = "type")]
    pub license_type: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date_in_millis: Option<i64>,
}

/// Envelope of `GET /_license`
#[derive(Debug, Clone, Deserialize)]
pub struct LicenseResponse {
    pub license: License,
}
