//! Namespace/name identity of a Kubernetes object.

use kube::{Resource, ResourceExt};
use std::fmt;

/// Namespace assumed for objects that do not carry one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Identifies a single namespaced Kubernetes object.
///
/// Used as the key of per-cluster bookkeeping (e.g. observers), so it is cheap to
/// clone, hashable and totally ordered. Objects without a namespace are
/// placed in [`DEFAULT_NAMESPACE`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespacedName {
    pub namespace: String,
    pub name: String,
}

impl NamespacedName {
    /// Create a new identity
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Identity of an existing object; a missing namespace maps to `default`
    pub fn from_resource<K: Resource>(obj: &K) -> Self {
        Self {
            namespace: obj.namespace().unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            name: obj.name_any(),
        }
    }
}

impl<K: Resource> From<&K> for NamespacedName {
    fn from(obj: &K) -> Self {
        Self::from_resource(obj)
    }
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElasticsearchCluster, ElasticsearchClusterSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::HashSet;

    #[test]
    fn test_display() {
        assert_eq!(NamespacedName::new("prod", "logs").to_string(), "prod/logs");
        assert_eq!(NamespacedName::new("", "global").to_string(), "global");
    }

    #[test]
    fn test_from_resource() {
        let cluster = ElasticsearchCluster {
            metadata: ObjectMeta {
                name: Some("quickstart".to_string()),
                namespace: Some("elastic".to_string()),
                ..Default::default()
            },
            spec: ElasticsearchClusterSpec::default(),
            status: None,
        };
        assert_eq!(
            NamespacedName::from_resource(&cluster),
            NamespacedName::new("elastic", "quickstart")
        );
    }

    #[test]
    fn test_from_resource_without_namespace_uses_default() {
        let cluster = ElasticsearchCluster {
            metadata: ObjectMeta {
                name: Some("q".to_string()),
                ..Default::default()
            },
            spec: ElasticsearchClusterSpec::default(),
            status: None,
        };

        let id = NamespacedName::from(&cluster);
        assert_eq!(id.namespace, DEFAULT_NAMESPACE);
        assert_eq!(id.to_string(), "default/q");
        assert_eq!(id, NamespacedName::from_resource(&cluster));
    }

    #[test]
    fn test_usable_as_key() {
        let mut set = HashSet::new();
        set.insert(NamespacedName::new("a", "one"));
        set.insert(NamespacedName::new("a", "one"));
        set.insert(NamespacedName::new("b", "one"));
        assert_eq!(set.len(), 2);
    }
}
