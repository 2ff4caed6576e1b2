//! Elasticsearch API client
//!
//! Implements the handful of read-only endpoints used to observe a cluster.

use crate::error::EsClientError;
use crate::es_trait::EsClientTrait;
use crate::models::{Health, License, LicenseResponse};
use reqwest::{Certificate, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Basic authentication credentials
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub name: String,
    pub password: String,
}

impl BasicAuth {
    /// Create credentials from a user name and password
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Elasticsearch API client
///
/// Holds the connection parameters it was built from so two clients can be
/// compared with [`EsClientTrait::equal`].
#[derive(Clone)]
pub struct EsClient {
    client: Client,
    endpoint: String,
    user: Option<BasicAuth>,
    ca_certs: Vec<String>,
}

impl EsClient {
    /// Create a new Elasticsearch client
    ///
    /// # Arguments
    /// * `endpoint` - Base URL (e.g., "https://quickstart-es-http.default.svc:9200")
    /// * `user` - Optional basic auth credentials
    /// * `ca_certs` - PEM encoded CA certificates to trust in addition to the web PKI roots
    /// * `timeout` - Per-request timeout
    pub fn new(
        endpoint: String,
        user: Option<BasicAuth>,
        ca_certs: Vec<String>,
        timeout: Duration,
    ) -> Result<Self, EsClientError> {
        let mut builder = Client::builder().timeout(timeout);
        for pem in &ca_certs {
            let cert = Certificate::from_pem(pem.as_bytes())
                .map_err(|e| EsClientError::InvalidConfig(format!("invalid CA certificate: {}", e)))?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder
            .build()
            .map_err(|e| EsClientError::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            user,
            ca_certs,
        })
    }

    /// Credentials used for every request, if any
    pub fn user(&self) -> Option<&BasicAuth> {
        self.user.as_ref()
    }

    /// PEM encoded CA certificates trusted by this client
    pub fn ca_certs(&self) -> &[String] {
        &self.ca_certs
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, EsClientError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("GET {}", url);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(user) = &self.user {
            request = request.basic_auth(&user.name, Some(&user.password));
        }
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(EsClientError::Authentication(format!("{} - {}", status, body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EsClientError::Api(format!("GET {} failed: {} - {}", path, status, body)));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl fmt::Debug for EsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EsClient")
            .field("endpoint", &self.endpoint)
            .field("user", &self.user)
            .field("ca_certs", &self.ca_certs.len())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl EsClientTrait for EsClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn equal(&self, other: &Self) -> bool {
        self.endpoint == other.endpoint && self.user() == other.user() && self.ca_certs() == other.ca_certs()
    }

    async fn get_cluster_health(&self) -> Result<Health, EsClientError> {
        self.get("/_cluster/health").await
    }

    async fn get_license(&self) -> Result<License, EsClientError> {
        let response: LicenseResponse = self.get("/_license").await?;
        Ok(response.license)
    }
}
