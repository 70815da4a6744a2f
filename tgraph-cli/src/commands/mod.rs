//! Command implementations for tgraph
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod deps;
pub mod load;
pub mod targets;

use crate::config::TgraphConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tgraph_core::Graph;

/// Options shared by every command that runs the graph tool.
#[derive(Args, Debug, Clone, Default)]
pub struct ToolArgs {
    /// Forward this environment variable to the tool (repeatable).
    /// Unset or empty variables are skipped.
    #[arg(short = 'e', long = "env", value_name = "KEY")]
    pub env: Vec<String>,

    /// Keep the scratch directory with graph.json after a successful run
    #[arg(long)]
    pub keep_scratch: bool,
}

/// Run the graph tool for `path` on a blocking task and decode its output.
pub async fn load_graph(
    config: &TgraphConfig,
    args: &ToolArgs,
    path: Option<PathBuf>,
) -> Result<Graph> {
    let loader = config.loader(args.keep_scratch);
    let keys = config.forwarded_keys(&args.env);
    let label = describe_path(path.as_deref());

    tokio::task::spawn_blocking(move || loader.graph(path.as_deref(), &keys))
        .await
        .context("Graph loading task failed")?
        .with_context(|| format!("Failed to load graph for {}", label))
}

/// Display form of an optional project path.
pub fn describe_path(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "current directory".to_string(),
    }
}
