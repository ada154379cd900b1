//! Exclusive temporary files with RAII cleanup.

use crate::error::{CogError, Result};
use crate::report::Reporter;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Create a new file, failing if anything already exists at `path`.
///
/// # Returns
///
/// * `Ok(File)` - The freshly created, empty file opened for writing
/// * `Err(CogError::ArtifactCollision)` - A file with that name already exists
/// * `Err(CogError::Filesystem)` - Any other creation failure
pub fn create_new(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                CogError::ArtifactCollision {
                    path: path.to_path_buf(),
                }
            } else {
                CogError::fs(format!("failed to create '{}'", path.display()), e)
            }
        })
}

/// RAII guard for a temporary file this run created.
///
/// When dropped, the file is deleted. A failed deletion is reported as a
/// warning and never panics or replaces the error that caused the drop.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    armed: bool,
    log: Reporter,
}

impl TempArtifact {
    /// Create `path` exclusively and guard it.
    pub fn create(path: PathBuf, log: Reporter) -> Result<(Self, File)> {
        let file = create_new(&path)?;
        Ok((
            Self {
                path,
                armed: true,
                log,
            },
            file,
        ))
    }

    /// Get the path to the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Leave the file on disk when the guard goes out of scope.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }

    /// Move the artifact over `target`, replacing it in one step.
    ///
    /// On failure the guard stays armed, so the artifact is still removed.
    pub fn commit_to(mut self, target: &Path) -> Result<()> {
        super::move_file(&self.path, target)?;
        self.armed = false;
        Ok(())
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.log
            .trace(format_args!("Removing temporary file '{}'", self.path.display()));
        if let Err(e) = fs::remove_file(&self.path)
            && e.kind() != io::ErrorKind::NotFound
        {
            self.log.warn(format_args!(
                "failed to remove temporary file '{}': {}",
                self.path.display(),
                e
            ));
        }
    }
}
