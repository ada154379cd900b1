//! File move helper used for the final commit.
//!
//! The output temp file normally sits next to the original, so the commit is
//! a single atomic `rename(2)`. If the output template points at another
//! volume (`$TMP` on a separate mount, say), rename fails with `EXDEV`; the
//! content is then copied next to the target with an atomic write and the
//! source is deleted.

use crate::error::{CogError, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Move `source` over `destination`, replacing it.
///
/// - Tries an atomic rename first.
/// - Falls back to an atomic write to `destination` + delete of `source` on EXDEV.
pub fn move_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    match super::atomic_replace(source, destination) {
        Ok(()) => Ok(()),
        Err(CogError::Filesystem { source: e, .. }) if is_cross_device_rename(&e) => {
            move_file_cross_device(source, destination, e)
        }
        Err(e) => Err(e),
    }
}

fn move_file_cross_device(
    source: &Path,
    destination: &Path,
    original_error: io::Error,
) -> Result<()> {
    let content = fs::read(source).map_err(|e| {
        CogError::fs(
            format!(
                "failed to read '{}' for cross-device move (rename failed: {})",
                source.display(),
                original_error
            ),
            e,
        )
    })?;

    let permissions = fs::metadata(source)
        .map_err(|e| CogError::fs(format!("failed to stat '{}'", source.display()), e))?
        .permissions();

    super::atomic_write(destination, &content)?;
    fs::set_permissions(destination, permissions).map_err(|e| {
        CogError::fs(
            format!("failed to set permissions on '{}'", destination.display()),
            e,
        )
    })?;

    fs::remove_file(source).map_err(|e| {
        CogError::fs(
            format!(
                "moved file across devices but failed to delete '{}'",
                source.display()
            ),
            e,
        )
    })
}

fn is_cross_device_rename(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(18)
}
