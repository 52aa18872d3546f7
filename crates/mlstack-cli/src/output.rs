use mlstack_domain::{ResolvedPlan, ServiceKind};
use mlstack_graph::ProvisioningGraph;

/// Render a resolved plan as human-readable text.
pub fn render_plan(plan: &ResolvedPlan) -> String {
    let mut out = String::new();
    out.push_str(&format!("Location: {}\n", plan.location));
    out.push_str(&format!("Suffix:   {}\n", plan.suffix));
    out.push_str(&format!(
        "Network:  {} (default action {})\n\n",
        plan.network.public_network_access, plan.network.default_action
    ));

    for service in ServiceKind::ALL {
        out.push_str(&format!("  {:<24} {}\n", service.to_string(), plan.name_of(service)));
    }
    out.push_str(&format!(
        "  {:<24} {}/keys/{} ({} {})\n",
        "encryption key",
        plan.key_vault.name,
        plan.key_vault.key.name,
        plan.key_vault.key.kty,
        plan.key_vault.key.size
    ));

    match &plan.diagnostics {
        Some(diag) => out.push_str(&format!(
            "  {:<24} {} -> {}\n",
            "diagnostics", diag.name, diag.destination_workspace
        )),
        None => out.push_str(&format!("  {:<24} disabled\n", "diagnostics")),
    }

    if !plan.tags.is_empty() {
        out.push_str("\nTags:\n");
        for (k, v) in &plan.tags {
            out.push_str(&format!("  {}={}\n", k, v));
        }
    }
    out
}

/// Render the graph as Graphviz DOT.
pub fn render_dot(graph: &ProvisioningGraph) -> String {
    let mut out = String::from("digraph mlstack {\n  rankdir=LR;\n  node [shape=box];\n\n");
    for node in &graph.nodes {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\\n{}\"];\n",
            node.kind, node.kind, node.name
        ));
    }
    out.push('\n');
    for edge in &graph.edges {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
            edge.from, edge.to, edge.reason
        ));
    }
    out.push('}');
    out
}

/// Render the creation order as plain text.
pub fn render_graph_text(graph: &ProvisioningGraph) -> String {
    let mut out = String::new();
    for (i, kind) in graph.topo_order.iter().enumerate() {
        let name = graph
            .nodes
            .iter()
            .find(|n| n.kind == *kind)
            .map(|n| n.name.as_str())
            .unwrap_or("");
        out.push_str(&format!("{:>2}. {} ({})\n", i + 1, kind, name));
        for dep in graph.edges.iter().filter(|e| e.to == *kind) {
            out.push_str(&format!("      after {}: {}\n", dep.from, dep.reason));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlstack_domain::{DeploymentInputs, ScopeId};

    fn plan() -> ResolvedPlan {
        let mut inputs = DeploymentInputs::new("eastus2", "ml");
        inputs.enable_diagnostics = true;
        inputs.tags.insert("env".into(), "dev".into());
        mlstack_resolver::resolve(&inputs, &ScopeId::new("abc123")).unwrap()
    }

    #[test]
    fn plan_text_lists_every_service() {
        let p = plan();
        let text = render_plan(&p);
        for service in ServiceKind::ALL {
            assert!(text.contains(p.name_of(service)), "missing {}", service);
        }
        assert!(text.contains("ml-mlw-diag"));
        assert!(text.contains("env=dev"));
    }

    #[test]
    fn dot_has_one_line_per_edge() {
        let graph = mlstack_graph::build_graph(&plan()).unwrap();
        let dot = render_dot(&graph);
        assert!(dot.starts_with("digraph mlstack {"));
        assert_eq!(dot.matches(" -> ").count(), graph.edges.len());
    }

    #[test]
    fn graph_text_numbers_every_node() {
        let graph = mlstack_graph::build_graph(&plan()).unwrap();
        let text = render_graph_text(&graph);
        assert!(text.contains(&format!("{:>2}. ", graph.topo_order.len())));
    }

    #[test]
    fn json_outputs_use_camel_case_keys() {
        let p = plan();
        let plan_json = serde_json::to_value(&p).unwrap();
        assert!(plan_json.get("keyVault").is_some());
        assert!(plan_json["diagnostics"].get("destinationWorkspace").is_some());

        let graph_json = serde_json::to_value(mlstack_graph::build_graph(&p).unwrap()).unwrap();
        assert!(graph_json.get("topoOrder").is_some());
        assert!(graph_json.get("topo_order").is_none());
    }
}
