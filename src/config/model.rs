//! Options struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// User-facing processing options.
///
/// Unknown fields in YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    // =========================================================================
    // Markers
    // =========================================================================
    /// Regex that starts generator blocks.
    #[serde(default = "default_gen_start")]
    pub gen_start: String,

    /// Regex that ends generator code.
    #[serde(default = "default_gen_end")]
    pub gen_end: String,

    /// Optional regex that starts generator output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_start: Option<String>,

    /// Regex that ends generator output.
    #[serde(default = "default_out_end")]
    pub out_end: String,

    // =========================================================================
    // Behavior
    // =========================================================================
    /// The output-end marker can be assumed at end of file.
    #[serde(default)]
    pub use_eof: bool,

    /// Excise all generated output without running the generators.
    #[serde(default)]
    pub excise: bool,

    /// Don't delete temporary files containing generator code.
    #[serde(default)]
    pub retain: bool,

    // =========================================================================
    // Generator command
    // =========================================================================
    /// Command to run when the start marker doesn't name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments to the command; `%s` is replaced with the code file path.
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Seconds a generator may run before it is killed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    // =========================================================================
    // Temporary files
    // =========================================================================
    /// Filename template for temp generator code files.
    #[serde(default = "default_gen_file")]
    pub gen_file: String,

    /// Filename template for temp output files.
    #[serde(default = "default_out_file")]
    pub out_file: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            gen_start: default_gen_start(),
            gen_end: default_gen_end(),
            out_start: None,
            out_end: default_out_end(),
            use_eof: false,
            excise: false,
            retain: false,
            command: None,
            args: default_args(),
            timeout_seconds: None,
            gen_file: default_gen_file(),
            out_file: default_out_file(),
        }
    }
}
