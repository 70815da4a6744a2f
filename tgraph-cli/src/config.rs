//! tgraph configuration loading from `.tgraph.toml`.
//!
//! Configuration is optional; every setting has a default and command-line
//! flags take precedence.
//!
//! # Example Configuration
//!
//! ```toml
//! [tool]
//! binary = "/opt/tuist/bin/tuist"
//!
//! [environment]
//! forward = ["TUIST_ACCESS_TOKEN", "DEVELOPER_DIR"]
//!
//! [scratch]
//! directory = "/tmp/tgraph"
//! keep = false
//!
//! [output]
//! format = "table"
//! color = true
//! ```

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tgraph_core::GraphLoader;

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".tgraph.toml";

/// Root configuration structure loaded from `.tgraph.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct TgraphConfig {
    #[serde(default)]
    pub tool: ToolConfig,

    #[serde(default)]
    pub environment: EnvironmentConfig,

    #[serde(default)]
    pub scratch: ScratchConfig,

    #[serde(default)]
    pub output: OutputSettings,
}

/// Which graph tool binary to run.
#[derive(Debug, Deserialize, Default)]
pub struct ToolConfig {
    /// Path or name of the tool.
    ///
    /// `TUIST_CURRENT_BINARY_PATH` still wins when set. Defaults to `tuist`
    /// on `PATH`.
    #[serde(default)]
    pub binary: Option<String>,
}

/// Environment variables handed to the tool.
#[derive(Debug, Deserialize, Default)]
pub struct EnvironmentConfig {
    /// Variable names forwarded on every call, in addition to `--env` flags.
    /// Unset or empty variables are skipped.
    #[serde(default)]
    pub forward: Vec<String>,
}

/// Scratch directory placement.
#[derive(Debug, Deserialize, Default)]
pub struct ScratchConfig {
    /// Parent directory for per-call scratch directories.
    /// Defaults to the platform temporary directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Leave the scratch directory (and its `graph.json`) after a successful
    /// load. Failed loads always clean up.
    #[serde(default)]
    pub keep: bool,
}

/// Output formatting preferences.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default output format: `table` or `json`.
    #[serde(default)]
    pub format: Option<String>,

    /// Force colored output on or off. Auto-detected when unset.
    #[serde(default)]
    pub color: Option<bool>,
}

impl TgraphConfig {
    /// Load configuration from `.tgraph.toml` in the given directory.
    ///
    /// Missing files yield defaults. Read and parse errors are logged as
    /// warnings and also yield defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE_NAME, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE_NAME, e);
                }
            }
        }
        Self::default()
    }

    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }

    /// Configured keys merged with the ones given on the command line.
    pub fn forwarded_keys(&self, extra: &[String]) -> BTreeSet<String> {
        self.environment
            .forward
            .iter()
            .chain(extra)
            .filter(|key| !key.is_empty())
            .cloned()
            .collect()
    }

    /// Build a loader reflecting this configuration.
    pub fn loader(&self, keep_scratch: bool) -> GraphLoader {
        let mut loader = GraphLoader::new().keep_scratch(keep_scratch || self.scratch.keep);
        if let Some(binary) = &self.tool.binary {
            loader = loader.with_binary(binary.clone());
        }
        if let Some(directory) = &self.scratch.directory {
            loader = loader.with_scratch_root(directory.clone());
        }
        loader
    }
}
