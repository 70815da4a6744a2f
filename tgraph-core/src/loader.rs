//! Load a project graph by running `tuist graph`.
//!
//! One call to [`GraphLoader::graph`] creates a scratch directory, runs
//!
//! ```text
//! <tool> graph --format json --output-path <scratch> [--path <path>]
//! ```
//!
//! with a filtered environment, reads `<scratch>/graph.json`, decodes it, and
//! removes the scratch directory on every exit path.

use crate::env::{EnvProvider, ProcessEnv};
use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::process::{ProcessRunner, SystemRunner};
use crate::scratch::ScratchDir;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span};

/// Names the exact tool binary to run; wins over every other setting.
pub const BINARY_PATH_ENV: &str = "TUIST_CURRENT_BINARY_PATH";

/// Cache-directory override, always considered for forwarding.
pub const FORCE_CACHE_DIRECTORY_ENV: &str = "TUIST_CONFIG_FORCE_CONFIG_CACHE_DIRECTORY";

/// Tool looked up on `PATH` when nothing else is configured.
pub const DEFAULT_EXECUTABLE: &str = "tuist";

/// File the tool writes into the output directory.
pub const GRAPH_FILE_NAME: &str = "graph.json";

/// Runs the graph tool and decodes its output.
///
/// Holds no per-call state; one loader can serve concurrent calls from
/// several threads, each with its own scratch directory and child process.
pub struct GraphLoader {
    runner: Box<dyn ProcessRunner>,
    env: Box<dyn EnvProvider>,
    binary: Option<String>,
    scratch_root: Option<PathBuf>,
    keep_scratch: bool,
}

impl Default for GraphLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphLoader {
    /// Loader that spawns real processes and reads the real environment.
    pub fn new() -> Self {
        Self {
            runner: Box::new(SystemRunner),
            env: Box::new(ProcessEnv),
            binary: None,
            scratch_root: None,
            keep_scratch: false,
        }
    }

    pub fn with_runner(mut self, runner: impl ProcessRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn with_env(mut self, env: impl EnvProvider + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Fallback binary used when [`BINARY_PATH_ENV`] is not set.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    /// Directory under which scratch directories are created.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Leave the scratch directory on disk after a successful load.
    ///
    /// Failed loads always remove it.
    pub fn keep_scratch(mut self, keep: bool) -> Self {
        self.keep_scratch = keep;
        self
    }

    /// The executable a call would run.
    pub fn executable(&self) -> String {
        self.env
            .non_empty(BINARY_PATH_ENV)
            .or_else(|| self.binary.clone().filter(|b| !b.is_empty()))
            .unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string())
    }

    /// The environment a call would hand to the tool.
    ///
    /// Each requested key plus [`FORCE_CACHE_DIRECTORY_ENV`] is copied only
    /// when set to a non-empty value.
    pub fn environment<I, S>(&self, keys: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys: BTreeSet<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        keys.insert(FORCE_CACHE_DIRECTORY_ENV.to_string());

        keys.into_iter()
            .filter_map(|key| self.env.non_empty(&key).map(|value| (key, value)))
            .collect()
    }

    /// Run the tool for the project at `path` (the tool's working directory
    /// when `None`) and decode the graph it writes.
    pub fn graph<I, S>(&self, path: Option<&Path>, environment_keys: I) -> Result<Graph>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let executable = self.executable();
        let environment = self.environment(environment_keys);
        let scratch = self.create_scratch()?;
        let arguments = graph_arguments(scratch.path(), path);

        debug!(
            %executable,
            ?arguments,
            forwarded = ?environment.keys().collect::<Vec<_>>(),
            "Invoking graph tool"
        );

        info_span!("graph_tool", path = ?path).in_scope(|| {
            self.runner.run(&executable, &arguments, &environment)
        })?;

        let output_path = scratch.path().join(GRAPH_FILE_NAME);
        let bytes = fs::read(&output_path).map_err(|source| GraphError::ReadOutput {
            path: output_path.clone(),
            source,
        })?;
        let graph: Graph = serde_json::from_slice(&bytes)?;
        debug!(
            projects = graph.projects.len(),
            targets = graph.target_count(),
            "Decoded graph"
        );

        if self.keep_scratch {
            let kept = scratch.keep();
            info!(path = %kept.display(), "Kept scratch directory");
        } else {
            let scratch_path = scratch.path().to_path_buf();
            scratch
                .close()
                .map_err(|source| GraphError::RemoveScratch {
                    path: scratch_path,
                    source,
                })?;
        }

        Ok(graph)
    }

    fn create_scratch(&self) -> Result<ScratchDir> {
        let root = self
            .scratch_root
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        ScratchDir::create_in(&root).map_err(|source| GraphError::CreateScratch { path: root, source })
    }
}

/// Argument list for one tool invocation.
pub fn graph_arguments(output_dir: &Path, path: Option<&Path>) -> Vec<String> {
    let mut arguments = vec![
        "graph".to_string(),
        "--format".to_string(),
        "json".to_string(),
        "--output-path".to_string(),
        output_dir.to_string_lossy().into_owned(),
    ];
    if let Some(path) = path {
        arguments.push("--path".to_string());
        arguments.push(path.to_string_lossy().into_owned());
    }
    arguments
}

/// Load the graph at `path` with a default [`GraphLoader`].
pub fn load_graph<I, S>(path: Option<&Path>, environment_keys: I) -> Result<Graph>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    GraphLoader::new().graph(path, environment_keys)
}
