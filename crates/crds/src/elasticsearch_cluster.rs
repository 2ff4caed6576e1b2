//! ElasticsearchCluster CRD
//!
//! Declares an external Elasticsearch cluster the operator observes.

use crate::references::{CaSecretReference, CredentialsSecretReference};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "stack.microscaler.io",
    version = "v1alpha1",
    kind = "ElasticsearchCluster",
    namespaced,
    status = "ElasticsearchClusterStatus",
    shortname = "esc",
    printcolumn = r#"{"name":"Health","type":"string","jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"Nodes","type":"integer","jsonPath":".status.numberOfNodes"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ElasticsearchClusterSpec {
    /// HTTP(S) endpoint of the cluster.
    /// Defaults to the cluster's HTTP service: `https://<name>-es-http.<namespace>.svc:9200`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Secret holding the credentials used to query the cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_secret_ref: Option<CredentialsSecretReference>,

    /// Secret holding the CA certificate the cluster's HTTP certificate is signed by
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_secret_ref: Option<CaSecretReference>,
}

/// Observed cluster health
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub enum ClusterPhase {
    /// No observation collected yet, or the cluster is unreachable
    #[default]
    Unknown,
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElasticsearchClusterStatus {
    /// Last observed health
    pub phase: ClusterPhase,

    /// Cluster name reported by Elasticsearch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,

    /// Number of nodes reported by the last health check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_nodes: Option<u32>,

    /// Type of the license applied to the cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,

    /// Timestamp of the reconciliation that produced this status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_observed: Option<chrono::DateTime<chrono::Utc>>,
}
