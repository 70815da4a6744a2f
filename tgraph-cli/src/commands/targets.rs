//! Targets command - list every target in the graph

use super::{load_graph, ToolArgs};
use crate::config::TgraphConfig;
use crate::output::{Output, OutputConfig, Outputter, TableOutput};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tgraph_core::Graph;

/// One row of the target listing
#[derive(Debug, Clone, Serialize)]
pub struct TargetRow {
    pub name: String,
    pub project: String,
    pub product: String,
    pub bundle_id: String,
    pub dependencies: usize,
}

#[derive(Debug, Serialize)]
pub struct TargetList {
    pub graph: String,
    pub targets: Vec<TargetRow>,
}

impl TargetList {
    /// Collect targets, optionally restricted to one project by name.
    pub fn from_graph(graph: &Graph, project: Option<&str>) -> Result<Self> {
        if let Some(name) = project {
            if graph.project_named(name).is_none() {
                anyhow::bail!("Project '{}' not found in graph '{}'", name, graph.name);
            }
        }

        let targets = graph
            .targets()
            .filter(|(p, _)| project.map_or(true, |name| p.name == name))
            .map(|(p, t)| TargetRow {
                name: t.name.clone(),
                project: p.name.clone(),
                product: t.product.clone(),
                bundle_id: t.bundle_id.clone(),
                dependencies: t.dependencies.len(),
            })
            .collect();

        Ok(Self {
            graph: graph.name.clone(),
            targets,
        })
    }
}

impl Outputter for TargetList {
    fn to_table(&self, config: &OutputConfig) -> String {
        let header = format!(
            "{} {} ({} targets)\n",
            "TARGETS:".cyan().bold(),
            self.graph.yellow(),
            self.targets.len()
        );

        let rows: Vec<Vec<String>> = self
            .targets
            .iter()
            .map(|t| {
                vec![
                    t.name.clone(),
                    t.project.clone(),
                    t.product.clone(),
                    t.bundle_id.clone(),
                    t.dependencies.to_string(),
                ]
            })
            .collect();

        header
            + &TableOutput::from_rows(
                &["Target", "Project", "Product", "Bundle ID", "Deps"],
                &rows,
                config,
            )
    }
}

pub async fn run(
    path: Option<PathBuf>,
    project: Option<&str>,
    args: &ToolArgs,
    config: &TgraphConfig,
    output: OutputConfig,
) -> Result<()> {
    let graph = load_graph(config, args, path).await?;
    let list = TargetList::from_graph(&graph, project)?;
    Output::new(list, output).render()
}
