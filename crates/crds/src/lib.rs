//! stack-operator CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the stack-operator controllers,
//! plus the object identity type shared by controllers and observers.

pub mod elasticsearch_cluster;
pub mod namespaced_name;
pub mod references;

pub use elasticsearch_cluster::*;
pub use namespaced_name::*;
pub use references::*;
