//! Synchronous subprocess execution with captured output.
//!
//! A [`ProcessRunner`] launches one executable, waits for it to exit, and
//! classifies the outcome. The child sees only the environment it is given:
//! the caller's environment is cleared before the explicit mapping is applied.

use crate::error::{InvocationError, RunError};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Launches an external executable and reports how it terminated.
pub trait ProcessRunner: Send + Sync {
    /// Run `executable` with `arguments` and exactly `environment`, blocking
    /// until it exits. Stdout is discarded; stderr is kept for error reporting.
    fn run(
        &self,
        executable: &str,
        arguments: &[String],
        environment: &BTreeMap<String, String>,
    ) -> Result<(), RunError>;
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        executable: &str,
        arguments: &[String],
        environment: &BTreeMap<String, String>,
    ) -> Result<(), RunError> {
        // Lookup uses our PATH; the child's environment is replaced below.
        let search_path = std::env::var_os("PATH");
        let program = resolve_executable(executable, search_path.as_deref())
            .unwrap_or_else(|| PathBuf::from(executable));

        let command = join_command(executable, arguments);
        debug!(program = %program.display(), %command, "Spawning process");

        let output = Command::new(&program)
            .args(arguments)
            .env_clear()
            .envs(environment)
            .output()
            .map_err(|source| RunError::Spawn {
                executable: executable.to_string(),
                source,
            })?;

        debug!(status = %output.status, stderr_bytes = output.stderr.len(), "Process exited");
        classify(command, output.status, output.stderr)?;
        Ok(())
    }
}

/// Render a command line the way error messages report it: the executable
/// immediately followed by every argument, with no separator.
pub fn join_command(executable: &str, arguments: &[String]) -> String {
    let mut command = String::from(executable);
    for argument in arguments {
        command.push_str(argument);
    }
    command
}

/// Map an exit status onto success or one of the two failure kinds.
pub fn classify(command: String, status: ExitStatus, stderr: Vec<u8>) -> Result<(), InvocationError> {
    if status.success() {
        return Ok(());
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Err(InvocationError::Signalled {
                command,
                code: signal,
                stderr,
            });
        }
    }

    Err(InvocationError::Terminated {
        command,
        code: status.code().unwrap_or(-1),
        stderr,
    })
}

/// Find `name` on `search_path` (a `PATH`-style list).
///
/// Names containing a path separator are returned as-is without touching the
/// filesystem. Returns `None` when no executable file matches.
pub fn resolve_executable(name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    if Path::new(name).components().count() > 1 {
        return Some(PathBuf::from(name));
    }

    let search_path = search_path?;
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| candidates(&dir, name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(not(windows))]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name)]
}

#[cfg(windows)]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name), dir.join(format!("{}.exe", name))]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
