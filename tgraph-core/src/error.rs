//! Error types for tgraph-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for graph loading operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// A subprocess that ran and did not finish successfully.
///
/// `command` is the executable followed by every argument with no separator
/// in between. Existing consumers match on that exact rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// The process was terminated by a signal.
    #[error("{}", describe(.command, "was interrupted with a signal", .code, .stderr))]
    Signalled {
        /// Joined command line.
        command: String,
        /// Signal number.
        code: i32,
        /// Everything the process wrote to stderr.
        stderr: Vec<u8>,
    },

    /// The process exited normally with a nonzero status.
    #[error("{}", describe(.command, "exited with error code", .code, .stderr))]
    Terminated {
        /// Joined command line.
        command: String,
        /// Exit status.
        code: i32,
        /// Everything the process wrote to stderr.
        stderr: Vec<u8>,
    },
}

impl InvocationError {
    pub fn command(&self) -> &str {
        match self {
            Self::Signalled { command, .. } | Self::Terminated { command, .. } => command,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Signalled { code, .. } | Self::Terminated { code, .. } => *code,
        }
    }

    pub fn stderr(&self) -> &[u8] {
        match self {
            Self::Signalled { stderr, .. } | Self::Terminated { stderr, .. } => stderr,
        }
    }

    /// Captured stderr as text, if it is non-blank UTF-8.
    pub fn stderr_text(&self) -> Option<&str> {
        stderr_text(self.stderr())
    }
}

fn stderr_text(stderr: &[u8]) -> Option<&str> {
    std::str::from_utf8(stderr)
        .ok()
        .map(str::trim_end)
        .filter(|text| !text.trim().is_empty())
}

fn describe(command: &str, action: &str, code: &i32, stderr: &[u8]) -> String {
    match stderr_text(stderr) {
        Some(message) => format!(
            "The command '{}' {} {} and message:\n{}",
            command, action, code, message
        ),
        None => format!("The command '{}' {} {}", command, action, code),
    }
}

/// Failure of a [`ProcessRunner`](crate::process::ProcessRunner) call.
#[derive(Error, Debug)]
pub enum RunError {
    /// The executable could not be launched at all.
    #[error("Failed to launch '{executable}': {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but did not succeed.
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

/// Errors that can occur while loading a project graph.
#[derive(Error, Debug)]
pub enum GraphError {
    /// The graph tool was signalled or exited with a nonzero status.
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    /// The graph tool could not be launched.
    #[error("Failed to launch '{executable}': {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    /// The scratch directory could not be created.
    #[error("Failed to create scratch directory {}: {source}", .path.display())]
    CreateScratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scratch directory could not be removed after a successful load.
    #[error("Failed to remove scratch directory {}: {source}", .path.display())]
    RemoveScratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tool finished but its output file is missing or unreadable.
    #[error("Failed to read graph output {}: {source}", .path.display())]
    ReadOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file is not JSON matching the graph shape.
    #[error("Failed to decode graph output: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<RunError> for GraphError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::Spawn { executable, source } => GraphError::Spawn { executable, source },
            RunError::Invocation(err) => GraphError::Invocation(err),
        }
    }
}
