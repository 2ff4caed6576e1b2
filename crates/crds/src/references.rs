//! Secret references for stack-operator CRDs
//!
//! Secrets are always looked up in the namespace of the referencing resource.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_username_key() -> String {
    "username".to_string()
}

fn default_password_key() -> String {
    "password".to_string()
}

fn default_ca_key() -> String {
    "ca.crt".to_string()
}

/// Reference to a Secret holding basic auth credentials
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsSecretReference {
    /// Name of the Secret
    pub name: String,

    /// Key of the user name in the Secret data
    #[serde(default = "default_username_key")]
    pub username_key: String,

    /// Key of the password in the Secret data
    #[serde(default = "default_password_key")]
    pub password_key: String,
}

impl CredentialsSecretReference {
    /// Reference using the default `username`/`password` keys
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            username_key: default_username_key(),
            password_key: default_password_key(),
        }
    }
}

/// Reference to a Secret holding a PEM encoded CA certificate
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaSecretReference {
    /// Name of the Secret
    pub name: String,

    /// Key of the certificate in the Secret data
    #[serde(default = "default_ca_key")]
    pub key: String,
}

impl CaSecretReference {
    /// Reference using the default `ca.crt` key
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: default_ca_key(),
        }
    }
}
