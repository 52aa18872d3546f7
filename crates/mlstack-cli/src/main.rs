mod cli;
mod commands;
mod output;

use anyhow::Result;
use cli::{Cli, Command};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Command::Suffix { scope_id, prefix } => commands::suffix(scope_id, prefix),
        Command::Resolve { inputs, scope_id, output } => commands::resolve(inputs, scope_id, output),
        Command::Bind { inputs, runtime, scope_id } => commands::bind(inputs, runtime, scope_id),
        Command::Graph { inputs, scope_id, output } => commands::graph(inputs, scope_id, output),
        Command::Outputs { inputs, runtime, scope_id } => {
            commands::outputs(inputs, runtime, scope_id)
        }
    }
}
