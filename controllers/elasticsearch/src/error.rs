//! Controller-specific error types.
//!
//! This module defines error types specific to the Elasticsearch Controller
//! that are not covered by upstream library errors.

use es_client::EsClientError;
use kube::Error as KubeError;
use kube_runtime::finalizer::Error as FinalizerError;
use thiserror::Error;

/// Errors that can occur in the Elasticsearch Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Elasticsearch client could not be built
    #[error("Elasticsearch client error: {0}")]
    EsClient(#[from] EsClientError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Referenced Secret is missing a key or holds invalid data
    #[error("Invalid secret {0}: {1}")]
    InvalidSecret(String, String),

    /// Resource is missing required metadata
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    /// Adding/removing the finalizer, or the wrapped reconciliation, failed
    #[error("Finalizer error: {0}")]
    Finalizer(#[source] Box<FinalizerError<ControllerError>>),
}
