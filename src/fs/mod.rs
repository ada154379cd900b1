//! Filesystem utilities for rcog.
//!
//! Temporary artifacts are created exclusively and cleaned up by RAII guards;
//! the rewritten file replaces the original with a single atomic rename.

mod artifact;
pub mod atomic;
mod move_file;

pub use artifact::{TempArtifact, create_new};
pub use atomic::{atomic_replace, atomic_write};
pub use move_file::move_file;
