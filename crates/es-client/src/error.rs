//! Elasticsearch client errors

use thiserror::Error;

/// Errors that can occur when interacting with the Elasticsearch API
#[derive(Debug, Error)]
pub enum EsClientError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Elasticsearch returned a non-success status
    #[error("Elasticsearch API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credentials rejected (401/403)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Client could not be built from the given parameters (e.g. unparseable CA certificate)
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}
