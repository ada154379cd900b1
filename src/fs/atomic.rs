//! Atomic filesystem operations for rcog.
//!
//! The original file must never be observed half-rewritten. Everything is
//! written to a sibling temporary file first, synced, and then renamed over
//! the target.
//!
//! # Cross-Platform Behavior
//!
//! `std::fs::rename` replaces an existing destination on POSIX (`rename(2)`)
//! and on Windows (`MoveFileExW` with `MOVEFILE_REPLACE_EXISTING`). Source and
//! destination must be on the same filesystem; see [`super::move_file`] for
//! the cross-device fallback.

use super::artifact::TempArtifact;
use crate::error::{CogError, Result};
use crate::report::Reporter;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file.
///
/// The content goes to `.{filename}.{pid}.tmp` in the target's directory,
/// is synced to disk, and then replaces the target.
///
/// # Example
///
/// ```no_run
/// use rcog::fs::atomic_write;
/// use std::path::Path;
///
/// atomic_write(Path::new("generated.rs"), b"// generated\n")?;
/// # Ok::<(), rcog::error::CogError>(())
/// ```
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let (artifact, mut file) = TempArtifact::create(temp_path_for(path)?, Reporter::quiet())?;

    file.write_all(content).map_err(|e| {
        CogError::fs(
            format!("failed to write '{}'", artifact.path().display()),
            e,
        )
    })?;
    file.sync_all().map_err(|e| {
        CogError::fs(
            format!("failed to sync '{}' to disk", artifact.path().display()),
            e,
        )
    })?;
    drop(file);

    atomic_replace(artifact.path(), path)?;
    artifact.keep();
    Ok(())
}

/// Generate a temporary file path in the same directory as the target.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target.file_name().ok_or_else(|| {
        CogError::Config(format!("'{}' does not name a file", target.display()))
    })?;

    let temp_name = format!(
        ".{}.{}.tmp",
        filename.to_string_lossy(),
        std::process::id()
    );
    Ok(parent.join(temp_name))
}

/// Atomically replace `target` with `source`.
///
/// The source is left in place on failure; callers own its cleanup.
pub fn atomic_replace(source: &Path, target: &Path) -> Result<()> {
    fs::rename(source, target).map_err(|e| {
        CogError::fs(
            format!(
                "failed to rename '{}' to '{}'",
                source.display(),
                target.display()
            ),
            e,
        )
    })?;

    sync_parent_dir(target);
    Ok(())
}

/// Persist the directory entry after a rename. Best effort.
#[cfg(unix)]
fn sync_parent_dir(target: &Path) {
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if let Ok(dir) = File::open(parent) {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_target: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        atomic_write(&file_path, b"hello world").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "hello world");
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");
        fs::write(&file_path, "original content").unwrap();

        atomic_write(&file_path, b"new content").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "new content");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        atomic_write(&file_path, b"content").unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("test.txt")]);
    }

    #[test]
    fn test_atomic_write_missing_parent_fails_cleanly() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("test.txt");

        let err = atomic_write(&file_path, b"content").unwrap_err();
        assert!(matches!(err, CogError::Filesystem { .. }));
        assert!(!file_path.exists());
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/some/path/file.txt")).unwrap();

        assert_eq!(temp.parent().unwrap(), Path::new("/some/path"));
        let name = temp.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".file.txt."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_atomic_replace_keeps_source_on_failure() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.txt");
        fs::write(&source, "payload").unwrap();

        let target = temp_dir.path().join("missing-dir").join("target.txt");
        assert!(atomic_replace(&source, &target).is_err());
        assert!(source.exists());
    }

    #[test]
    fn test_atomic_write_binary_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("binary.bin");

        let binary_content: Vec<u8> = (0..256).map(|i| i as u8).collect();
        atomic_write(&file_path, &binary_content).unwrap();

        assert_eq!(fs::read(&file_path).unwrap(), binary_content);
    }
}
