use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "mlstack",
    about = "Derive resource names and property bundles for an encrypted ML workspace deployment",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the uniqueness token for a scope and prefix.
    Suffix {
        /// Stable identifier of the deployment target.
        #[arg(long, env = "MLSTACK_SCOPE_ID")]
        scope_id: String,

        /// Name prefix (2-12 letters or digits).
        #[arg(long)]
        prefix: String,
    },

    /// Resolve every resource name and property bundle.
    Resolve {
        /// Path to the deployment inputs file.
        inputs: PathBuf,

        #[arg(long, env = "MLSTACK_SCOPE_ID")]
        scope_id: String,

        /// Output format.
        #[arg(long, default_value = "text")]
        output: OutputFormat,
    },

    /// Resolve, then attach bundles that need runtime properties.
    Bind {
        /// Path to the deployment inputs file.
        inputs: PathBuf,

        /// Path to the runtime properties file.
        #[arg(long)]
        runtime: PathBuf,

        #[arg(long, env = "MLSTACK_SCOPE_ID")]
        scope_id: String,
    },

    /// Render the provisioning dependency graph.
    Graph {
        /// Path to the deployment inputs file.
        inputs: PathBuf,

        #[arg(long, env = "MLSTACK_SCOPE_ID")]
        scope_id: String,

        /// Output format.
        #[arg(long, default_value = "text")]
        output: GraphOutput,
    },

    /// Print the final deployment outputs.
    Outputs {
        /// Path to the deployment inputs file.
        inputs: PathBuf,

        /// Path to the runtime properties file.
        #[arg(long)]
        runtime: PathBuf,

        #[arg(long, env = "MLSTACK_SCOPE_ID")]
        scope_id: String,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum GraphOutput {
    Text,
    Json,
    Dot,
}
