//! Prints the stack-operator CRD manifests as YAML.
//!
//! Usage: `cargo run -p crds --bin crdgen > config/crds.yaml`

use crds::ElasticsearchCluster;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&ElasticsearchCluster::crd())?);
    Ok(())
}
