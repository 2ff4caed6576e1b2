//! EsClient trait for mocking
//!
//! Observers are generic over this trait so unit tests can drive them with an
//! in-memory client instead of a live Elasticsearch cluster.

use crate::error::EsClientError;
use crate::models::{Health, License};

/// Trait for the Elasticsearch operations an observer performs.
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait EsClientTrait: Send + Sync {
    /// Base URL the client talks to
    fn endpoint(&self) -> &str;

    /// Whether `other` is interchangeable with `self`.
    ///
    /// Clients are interchangeable when they reach the same endpoint with the same
    /// credentials and the same trusted CA certificates. Connection pools and
    /// timeouts are not part of the comparison.
    fn equal(&self, other: &Self) -> bool
    where
        Self: Sized;

    /// `GET /_cluster/health`
    async fn get_cluster_health(&self) -> Result<Health, EsClientError>;

    /// `GET /_license`
    async fn get_license(&self) -> Result<License, EsClientError>;
}
