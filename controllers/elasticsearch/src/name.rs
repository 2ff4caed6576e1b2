//! Names of the Kubernetes resources derived from an Elasticsearch cluster.
//!
//! Derived names are `<owner>-<default suffixes>-<suffixes>`. The owner part is
//! truncated so the whole name stays a valid DNS label.

use crds::NamespacedName;

/// Maximum length of a DNS label (RFC 1123)
pub const MAX_NAME_LENGTH: usize = 63;

const HTTP_SERVICE_SUFFIX: &str = "http";
const HTTP_PORT: u16 = 9200;

/// Namer for resources owned by an Elasticsearch cluster
pub const ES_NAMER: Namer = Namer::new(&["es"]);

/// Builds derived resource names with a fixed set of default suffixes
#[derive(Debug, Clone, Copy)]
pub struct Namer {
    default_suffixes: &'static [&'static str],
}

impl Namer {
    /// Namer appending `default_suffixes` before any per-call suffix
    pub const fn new(default_suffixes: &'static [&'static str]) -> Self {
        Self { default_suffixes }
    }

    /// Joins `owner`, the default suffixes and `suffixes` with `-`
    pub fn suffix(&self, owner: &str, suffixes: &[&str]) -> String {
        let suffix: String = self
            .default_suffixes
            .iter()
            .chain(suffixes)
            .map(|s| format!("-{}", s))
            .collect();

        let max_owner_length = MAX_NAME_LENGTH.saturating_sub(suffix.len());
        let owner: String = owner.chars().take(max_owner_length).collect();
        format!("{}{}", owner, suffix)
    }
}

/// Name of the HTTP service of an Elasticsearch cluster
pub fn http_service(es_name: &str) -> String {
    ES_NAMER.suffix(es_name, &[HTTP_SERVICE_SUFFIX])
}

/// In-cluster URL of an Elasticsearch cluster's HTTP service
pub fn default_endpoint(cluster: &NamespacedName) -> String {
    format!(
        "https://{}.{}.svc:{}",
        http_service(&cluster.name),
        cluster.namespace,
        HTTP_PORT
    )
}
