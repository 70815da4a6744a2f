//! Load command - run the graph tool and summarize the result
//!
//! Several paths are loaded concurrently, each by an independent tool
//! invocation with its own scratch directory.

use super::{describe_path, load_graph, ToolArgs};
use crate::config::TgraphConfig;
use crate::output::{truncate, JsonOutput, Output, OutputConfig, Outputter, TableOutput};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tgraph_core::Graph;

const MAX_PATH_WIDTH: usize = 60;

/// One loaded graph and the path it was requested for
#[derive(Debug, Serialize)]
pub struct LoadedGraph {
    /// Requested project path; `None` means the current directory
    pub requested: Option<String>,
    pub graph: Graph,
}

/// Result of a load command
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct LoadReport {
    pub graphs: Vec<LoadedGraph>,
}

impl Outputter for LoadReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = String::new();

        for loaded in &self.graphs {
            let graph = &loaded.graph;
            output.push_str(&format!(
                "{} {} ({})\n",
                "GRAPH:".cyan().bold(),
                graph.name.yellow(),
                graph.path.dimmed()
            ));
            output.push_str(&format!(
                "  {} projects, {} targets\n",
                graph.projects.len(),
                graph.target_count()
            ));

            let rows: Vec<Vec<String>> = graph
                .projects
                .values()
                .map(|project| {
                    let path = if config.should_truncate() {
                        truncate(&project.path, MAX_PATH_WIDTH)
                    } else {
                        project.path.clone()
                    };
                    vec![
                        project.name.clone(),
                        path,
                        project.targets.len().to_string(),
                        project.schemes.len().to_string(),
                        if project.is_external { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            output.push_str(&TableOutput::from_rows(
                &["Project", "Path", "Targets", "Schemes", "External"],
                &rows,
                config,
            ));
            output.push('\n');
        }

        output.trim_end().to_string()
    }

    /// A single graph prints as the tool emitted it; several print as an array.
    fn to_json(&self) -> String {
        match self.graphs.as_slice() {
            [single] => JsonOutput::format(&single.graph),
            _ => JsonOutput::format(self),
        }
    }
}

/// Load one graph per path (the current directory when none are given).
pub async fn run(
    paths: &[PathBuf],
    args: &ToolArgs,
    config: &TgraphConfig,
    output: OutputConfig,
) -> Result<()> {
    let requests: Vec<Option<PathBuf>> = if paths.is_empty() {
        vec![None]
    } else {
        paths.iter().cloned().map(Some).collect()
    };

    tracing::debug!(count = requests.len(), "Loading graphs");

    let loads = requests.into_iter().map(|path| async move {
        let requested = path.as_deref().map(|p| describe_path(Some(p)));
        load_graph(config, args, path)
            .await
            .map(|graph| LoadedGraph { requested, graph })
    });

    let graphs = futures::future::try_join_all(loads).await?;
    Output::new(LoadReport { graphs }, output).render()
}
