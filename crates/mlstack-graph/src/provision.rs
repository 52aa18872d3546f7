use std::collections::HashMap;

use mlstack_domain::ResolvedPlan;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Everything the provisioning engine creates for one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    ManagedIdentity,
    LogAnalytics,
    KeyVault,
    KeyAccessPolicy,
    EncryptionKey,
    StorageAccount,
    ContainerRegistry,
    MlWorkspace,
    Diagnostics,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::ManagedIdentity => write!(f, "managed-identity"),
            NodeKind::LogAnalytics => write!(f, "log-analytics"),
            NodeKind::KeyVault => write!(f, "key-vault"),
            NodeKind::KeyAccessPolicy => write!(f, "key-access-policy"),
            NodeKind::EncryptionKey => write!(f, "encryption-key"),
            NodeKind::StorageAccount => write!(f, "storage-account"),
            NodeKind::ContainerRegistry => write!(f, "container-registry"),
            NodeKind::MlWorkspace => write!(f, "ml-workspace"),
            NodeKind::Diagnostics => write!(f, "diagnostics"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub kind: NodeKind,
    pub name: String,
}

/// `to` cannot be created until `from` exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub from: NodeKind,
    pub to: NodeKind,
    pub reason: String,
}

/// Result returned by [`build_graph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningGraph {
    pub nodes: Vec<ResourceNode>,
    pub edges: Vec<Dependency>,
    /// Creation order: every node appears after all of its dependencies.
    pub topo_order: Vec<NodeKind>,
}

impl ProvisioningGraph {
    pub fn position(&self, kind: NodeKind) -> Option<usize> {
        self.topo_order.iter().position(|k| *k == kind)
    }
}

const EDGES: &[(NodeKind, NodeKind, &str)] = &[
    (NodeKind::ManagedIdentity, NodeKind::KeyAccessPolicy, "policy grants the identity's principal id"),
    (NodeKind::KeyVault, NodeKind::KeyAccessPolicy, "policy is attached to the vault"),
    (NodeKind::KeyVault, NodeKind::EncryptionKey, "key lives in the vault"),
    (NodeKind::EncryptionKey, NodeKind::MlWorkspace, "workspace encrypts with the key"),
    (NodeKind::KeyAccessPolicy, NodeKind::MlWorkspace, "identity must be able to wrap/unwrap"),
    (NodeKind::ManagedIdentity, NodeKind::MlWorkspace, "workspace runs as the identity"),
    (NodeKind::StorageAccount, NodeKind::MlWorkspace, "workspace default storage"),
    (NodeKind::ContainerRegistry, NodeKind::MlWorkspace, "workspace image registry"),
    (NodeKind::LogAnalytics, NodeKind::MlWorkspace, "workspace telemetry sink"),
];

const DIAGNOSTIC_EDGES: &[(NodeKind, NodeKind, &str)] = &[
    (NodeKind::MlWorkspace, NodeKind::Diagnostics, "setting targets the workspace"),
    (NodeKind::LogAnalytics, NodeKind::Diagnostics, "setting ships to log analytics"),
];

/// Build the creation-order graph for a resolved plan.
///
/// The diagnostics node only exists when the plan carries a diagnostic
/// binding.
pub fn build_graph(plan: &ResolvedPlan) -> Result<ProvisioningGraph, GraphError> {
    let mut nodes = vec![
        ResourceNode { kind: NodeKind::ManagedIdentity, name: plan.identity.name.clone() },
        ResourceNode { kind: NodeKind::LogAnalytics, name: plan.log_analytics.name.clone() },
        ResourceNode { kind: NodeKind::KeyVault, name: plan.key_vault.name.clone() },
        ResourceNode {
            kind: NodeKind::KeyAccessPolicy,
            name: format!("{}/add", plan.key_vault.name),
        },
        ResourceNode {
            kind: NodeKind::EncryptionKey,
            name: format!("{}/{}", plan.key_vault.name, plan.key_vault.key.name),
        },
        ResourceNode { kind: NodeKind::StorageAccount, name: plan.storage.name.clone() },
        ResourceNode { kind: NodeKind::ContainerRegistry, name: plan.registry.name.clone() },
        ResourceNode { kind: NodeKind::MlWorkspace, name: plan.workspace.name.clone() },
    ];

    let mut edge_table: Vec<&(NodeKind, NodeKind, &str)> = EDGES.iter().collect();
    if let Some(diag) = &plan.diagnostics {
        nodes.push(ResourceNode { kind: NodeKind::Diagnostics, name: diag.name.clone() });
        edge_table.extend(DIAGNOSTIC_EDGES.iter());
    }

    let edges: Vec<Dependency> = edge_table
        .into_iter()
        .map(|(from, to, reason)| Dependency {
            from: *from,
            to: *to,
            reason: reason.to_string(),
        })
        .collect();

    order(nodes, edges)
}

fn order(nodes: Vec<ResourceNode>, edges: Vec<Dependency>) -> Result<ProvisioningGraph, GraphError> {
    let mut graph: DiGraph<NodeKind, ()> = DiGraph::new();
    let node_map: HashMap<NodeKind, NodeIndex> = nodes
        .iter()
        .map(|n| (n.kind, graph.add_node(n.kind)))
        .collect();

    for edge in &edges {
        let from = node_map
            .get(&edge.from)
            .ok_or_else(|| GraphError::UnknownNode(edge.from.to_string()))?;
        let to = node_map
            .get(&edge.to)
            .ok_or_else(|| GraphError::UnknownNode(edge.to.to_string()))?;
        graph.add_edge(*from, *to, ());
    }

    if is_cyclic_directed(&graph) {
        return Err(GraphError::CycleDetected);
    }

    let topo = petgraph::algo::toposort(&graph, None)
        .map_err(|_| GraphError::CycleDetected)?;
    let topo_order = topo.iter().map(|idx| graph[*idx]).collect();

    Ok(ProvisioningGraph { nodes, edges, topo_order })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlstack_domain::{DeploymentInputs, ScopeId};

    fn plan(diagnostics: bool) -> ResolvedPlan {
        let mut inputs = DeploymentInputs::new("eastus2", "ml");
        inputs.enable_diagnostics = diagnostics;
        mlstack_resolver::resolve(&inputs, &ScopeId::new("abc123")).unwrap()
    }

    fn before(graph: &ProvisioningGraph, a: NodeKind, b: NodeKind) -> bool {
        graph.position(a).unwrap() < graph.position(b).unwrap()
    }

    #[test]
    fn identity_before_grant_and_key_before_workspace() {
        let graph = build_graph(&plan(false)).unwrap();
        assert!(before(&graph, NodeKind::ManagedIdentity, NodeKind::KeyAccessPolicy));
        assert!(before(&graph, NodeKind::KeyVault, NodeKind::EncryptionKey));
        assert!(before(&graph, NodeKind::EncryptionKey, NodeKind::MlWorkspace));
        assert!(before(&graph, NodeKind::KeyAccessPolicy, NodeKind::MlWorkspace));
    }

    #[test]
    fn every_edge_respected() {
        let graph = build_graph(&plan(true)).unwrap();
        for edge in &graph.edges {
            assert!(before(&graph, edge.from, edge.to), "{} -> {}", edge.from, edge.to);
        }
    }

    #[test]
    fn diagnostics_node_only_when_enabled() {
        let without = build_graph(&plan(false)).unwrap();
        assert!(without.position(NodeKind::Diagnostics).is_none());
        assert_eq!(without.nodes.len(), 8);

        let with = build_graph(&plan(true)).unwrap();
        assert_eq!(with.nodes.len(), 9);
        assert!(before(&with, NodeKind::MlWorkspace, NodeKind::Diagnostics));
    }

    #[test]
    fn node_names_come_from_plan() {
        let p = plan(false);
        let graph = build_graph(&p).unwrap();
        let key = graph
            .nodes
            .iter()
            .find(|n| n.kind == NodeKind::EncryptionKey)
            .unwrap();
        assert_eq!(key.name, format!("{}/cmk", p.key_vault.name));
    }

    #[test]
    fn unknown_edge_endpoint_rejected() {
        let nodes = vec![ResourceNode { kind: NodeKind::KeyVault, name: "kv".into() }];
        let edges = vec![Dependency {
            from: NodeKind::KeyVault,
            to: NodeKind::Diagnostics,
            reason: "test".into(),
        }];
        assert!(matches!(order(nodes, edges), Err(GraphError::UnknownNode(_))));
    }

    #[test]
    fn cycle_detected() {
        let nodes = vec![
            ResourceNode { kind: NodeKind::KeyVault, name: "kv".into() },
            ResourceNode { kind: NodeKind::EncryptionKey, name: "kv/cmk".into() },
        ];
        let edges = vec![
            Dependency { from: NodeKind::KeyVault, to: NodeKind::EncryptionKey, reason: "a".into() },
            Dependency { from: NodeKind::EncryptionKey, to: NodeKind::KeyVault, reason: "b".into() },
        ];
        assert!(matches!(order(nodes, edges), Err(GraphError::CycleDetected)));
    }
}
