//! tgraph core - load Tuist project graphs from Rust.
//!
//! The graph itself is computed by the `tuist` executable. This crate runs
//! `tuist graph --format json` in a subprocess, reads the JSON it writes to a
//! per-call scratch directory, and decodes it into a [`Graph`].
//!
//! # Components
//!
//! - **Process runner** ([`process`]): spawn, wait, classify the exit status
//! - **Graph loader** ([`loader`]): scratch directory, arguments, environment
//!   forwarding, output decoding, cleanup on every exit path
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let graph = tgraph_core::load_graph(Some(Path::new("App")), ["TUIST_ACCESS_TOKEN"])?;
//! for (project, target) in graph.targets() {
//!     println!("{}/{}", project.name, target.name);
//! }
//! # Ok::<(), tgraph_core::GraphError>(())
//! ```

pub mod env;
pub mod error;
pub mod graph;
pub mod loader;
pub mod process;
pub mod scratch;

pub use env::{EnvProvider, ProcessEnv};
pub use error::{GraphError, InvocationError, Result, RunError};
pub use graph::{Graph, Package, Project, Scheme, Target, TargetDependency};
pub use loader::{load_graph, GraphLoader};
pub use process::{ProcessRunner, SystemRunner};
pub use scratch::ScratchDir;
