mod error;
mod provision;

pub use error::GraphError;
pub use provision::{build_graph, Dependency, NodeKind, ProvisioningGraph, ResourceNode};
