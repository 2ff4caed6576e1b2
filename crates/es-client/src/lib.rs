//! Elasticsearch REST API Client
//!
//! A small client for the parts of the Elasticsearch REST API the operator
//! needs to observe a cluster: cluster health and license.
//!
//! # Example
//!
//! ```no_run
//! use es_client::{BasicAuth, EsClient, EsClientTrait};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = EsClient::new(
//!     "https://quickstart-es-http.default.svc:9200".to_string(),
//!     Some(BasicAuth::new("elastic", "changeme")),
//!     Vec::new(),
//!     Duration::from_secs(60),
//! )?;
//!
//! let health = client.get_cluster_health().await?;
//! println!("{} is {}", health.cluster_name, health.status);
//! # Ok(())
//! # }
//! ```
//!
//! Two clients compare equal (see [`EsClientTrait::equal`]) when they target the
//! same endpoint with the same credentials and trust the same CA certificates.
//! Observers use this to decide whether an existing observer can be reused.

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod es_trait;
#[cfg(feature = "test-util")]
pub mod mock;


pub use client::{BasicAuth, EsClient};
pub use error::EsClientError;
pub use es_trait::EsClientTrait;
pub use models::*;
#[cfg(feature = "test-util")]
pub use mock::MockEsClient;
