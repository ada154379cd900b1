//! Per-file context resolution.
//!
//! A [`FileContext`] is derived once from the target path and supplies the
//! variables that filename templates are expanded against:
//!
//! - `TMP`: the system temporary directory
//! - `DIR`: the directory containing the source file (`.` for bare names)
//! - `FILE`: the source file's base name
//! - `CTR`: the per-file generator block counter (generator files only)

use crate::error::{CogError, Result};
use crate::template::{self, vars};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Variable names available to the output temp file template.
pub const OUTPUT_TEMPLATE_VARS: &[&str] = &["TMP", "DIR", "FILE"];

/// Variable names available to the generator temp file template.
pub const GENERATOR_TEMPLATE_VARS: &[&str] = &["TMP", "DIR", "FILE", "CTR"];

/// Resolved paths for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    /// The source file as given by the caller.
    pub path: PathBuf,

    /// Directory containing the source file. Generators run here.
    pub dir: PathBuf,

    /// Base name of the source file.
    pub file_name: String,
}

impl FileContext {
    /// Resolve the context for a source file path.
    ///
    /// # Returns
    ///
    /// * `Ok(FileContext)` - Directory and base name resolved
    /// * `Err(CogError::Config)` - The path has no file name component
    pub fn resolve<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                CogError::Config(format!("'{}' does not name a file", path.display()))
            })?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self {
            path: path.to_path_buf(),
            dir,
            file_name,
        })
    }

    /// Template variables for the output temp file.
    pub fn output_vars(&self) -> HashMap<String, String> {
        vars([
            ("TMP", std::env::temp_dir().to_string_lossy().into_owned()),
            ("DIR", self.dir.to_string_lossy().into_owned()),
            ("FILE", self.file_name.clone()),
        ])
    }

    /// Template variables for the generator temp file of block `counter`.
    pub fn generator_vars(&self, counter: usize) -> HashMap<String, String> {
        let mut vars = self.output_vars();
        vars.insert("CTR".to_string(), counter.to_string());
        vars
    }

    /// Expand the output temp file template for this file.
    pub fn output_path(&self, template: &str) -> Result<PathBuf> {
        let rendered = template::render_template(template, &self.output_vars())?;
        Ok(PathBuf::from(rendered))
    }

    /// Expand the generator temp file template for block `counter`.
    pub fn generator_path(&self, template: &str, counter: usize) -> Result<PathBuf> {
        let rendered = template::render_template(template, &self.generator_vars(counter))?;
        Ok(PathBuf::from(rendered))
    }
}
