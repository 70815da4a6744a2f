//! Per-call scratch directories.
//!
//! A [`ScratchDir`] is created fresh for one graph load and removed when the
//! guard goes away. [`ScratchDir::close`] removes it eagerly and reports
//! failures; dropping the guard removes it best-effort and only logs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Prefix of every scratch directory name.
pub const SCRATCH_PREFIX: &str = "tgraph-";

/// Exclusively owned temporary directory, removed exactly once.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    armed: bool,
}

impl ScratchDir {
    /// Create `tgraph-<uuid>` inside `root`, creating `root` if needed.
    ///
    /// Fails if a directory with the generated name already exists, so two
    /// callers never share one.
    pub fn create_in(root: &Path) -> io::Result<Self> {
        fs::create_dir_all(root)?;
        let path = root.join(format!("{}{}", SCRATCH_PREFIX, Uuid::new_v4()));
        fs::create_dir(&path)?;
        debug!(path = %path.display(), "Created scratch directory");
        Ok(Self { path, armed: true })
    }

    /// Create a scratch directory under the platform temporary directory.
    pub fn create() -> io::Result<Self> {
        Self::create_in(&std::env::temp_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now, surfacing any I/O error.
    pub fn close(mut self) -> io::Result<()> {
        self.armed = false;
        remove(&self.path)
    }

    /// Leave the directory on disk and hand back its path.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = remove(&self.path) {
            warn!(path = %self.path.display(), "Failed to remove scratch directory: {}", e);
        }
    }
}

fn remove(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed scratch directory");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
