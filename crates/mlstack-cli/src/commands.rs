use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mlstack_domain::{DeploymentInputs, ResolvedPlan, RuntimeProperties, ScopeId};
use tracing::info;

use crate::cli::{GraphOutput, OutputFormat};
use crate::output;

// ── Suffix ────────────────────────────────────────────────────────────────────

pub fn suffix(scope_id: String, prefix: String) -> Result<()> {
    let token = mlstack_resolver::derive_suffix(&ScopeId::new(scope_id), &prefix)
        .context("Failed to derive suffix")?;
    println!("{}", token);
    Ok(())
}

// ── Resolve ───────────────────────────────────────────────────────────────────

pub fn resolve(inputs: PathBuf, scope_id: String, output_format: OutputFormat) -> Result<()> {
    let plan = load_plan(&inputs, scope_id)?;
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => print!("{}", output::render_plan(&plan)),
    }
    Ok(())
}

// ── Bind ──────────────────────────────────────────────────────────────────────

pub fn bind(inputs: PathBuf, runtime: PathBuf, scope_id: String) -> Result<()> {
    let plan = load_plan(&inputs, scope_id)?;
    let props = load_runtime(&runtime)?;
    let bound = mlstack_resolver::bind(&plan, &props).context("Failed to bind runtime properties")?;
    println!("{}", serde_json::to_string_pretty(&bound)?);
    Ok(())
}

// ── Graph ─────────────────────────────────────────────────────────────────────

pub fn graph(inputs: PathBuf, scope_id: String, output_format: GraphOutput) -> Result<()> {
    let plan = load_plan(&inputs, scope_id)?;
    let graph = mlstack_graph::build_graph(&plan).context("Failed to build provisioning graph")?;
    match output_format {
        GraphOutput::Json => println!("{}", serde_json::to_string_pretty(&graph)?),
        GraphOutput::Text => print!("{}", output::render_graph_text(&graph)),
        GraphOutput::Dot => println!("{}", output::render_dot(&graph)),
    }
    Ok(())
}

// ── Outputs ───────────────────────────────────────────────────────────────────

pub fn outputs(inputs: PathBuf, runtime: PathBuf, scope_id: String) -> Result<()> {
    let plan = load_plan(&inputs, scope_id)?;
    let props = load_runtime(&runtime)?;
    let outputs =
        mlstack_resolver::outputs(&plan, &props).context("Failed to project deployment outputs")?;
    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_plan(path: &Path, scope_id: String) -> Result<ResolvedPlan> {
    let inputs: DeploymentInputs = mlstack_config::load_inputs(path)
        .with_context(|| format!("Failed to load inputs from {}", path.display()))?;
    let scope = ScopeId::new(scope_id);
    let plan = mlstack_resolver::resolve(&inputs, &scope).context("Failed to resolve plan")?;
    info!(workspace = %plan.workspace.name, "plan ready");
    Ok(plan)
}

fn load_runtime(path: &Path) -> Result<RuntimeProperties> {
    mlstack_config::load_runtime(path)
        .with_context(|| format!("Failed to load runtime properties from {}", path.display()))
}
