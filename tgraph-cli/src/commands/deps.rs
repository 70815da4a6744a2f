//! Deps command - show direct dependencies of a target

use super::{load_graph, ToolArgs};
use crate::config::TgraphConfig;
use crate::output::{Output, OutputConfig, Outputter, TableOutput};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tgraph_core::{Graph, TargetDependency};

#[derive(Debug, Serialize)]
pub struct TargetDeps {
    pub target: String,
    pub project: String,
    pub dependencies: Vec<TargetDependency>,
}

impl TargetDeps {
    /// Resolve a target by name, optionally within one project.
    ///
    /// A name defined by several projects is an error unless `project`
    /// picks one of them.
    pub fn from_graph(graph: &Graph, target: &str, project: Option<&str>) -> Result<Self> {
        if let Some(name) = project {
            if graph.project_named(name).is_none() {
                anyhow::bail!("Project '{}' not found in graph '{}'", name, graph.name);
            }
        }

        let matches: Vec<_> = graph
            .targets_named(target)
            .filter(|(p, _)| project.map_or(true, |name| p.name == name))
            .collect();

        let (project, found) = match matches.as_slice() {
            [] => anyhow::bail!("Target '{}' not found in graph '{}'", target, graph.name),
            [single] => *single,
            several => {
                let owners: Vec<&str> = several.iter().map(|(p, _)| p.name.as_str()).collect();
                anyhow::bail!(
                    "Target '{}' is defined in several projects ({}); pick one with --project",
                    target,
                    owners.join(", ")
                )
            }
        };

        Ok(Self {
            target: found.name.clone(),
            project: project.name.clone(),
            dependencies: found.dependencies.clone(),
        })
    }
}

impl Outputter for TargetDeps {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = format!(
            "{} {} ({})\n",
            "DEPENDENCIES:".cyan().bold(),
            self.target.yellow(),
            self.project.dimmed()
        );

        if self.dependencies.is_empty() {
            output.push_str(&"  No dependencies.".dimmed().to_string());
            return output;
        }

        let rows: Vec<Vec<String>> = self
            .dependencies
            .iter()
            .map(|d| vec![d.kind().to_string(), d.label()])
            .collect();
        output.push_str(&TableOutput::from_rows(&["Kind", "Dependency"], &rows, config));
        output
    }
}

pub async fn run(
    target: &str,
    path: Option<PathBuf>,
    project: Option<&str>,
    args: &ToolArgs,
    config: &TgraphConfig,
    output: OutputConfig,
) -> Result<()> {
    let graph = load_graph(config, args, path).await?;
    let deps = TargetDeps::from_graph(&graph, target, project)?;
    Output::new(deps, output).render()
}
