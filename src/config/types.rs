//! Compiled configuration and option defaults.

use regex::Regex;
use std::time::Duration;

/// Placeholder replaced by the absolute generator file path in the command
/// string and in every argument.
pub const ARG_PLACEHOLDER: &str = "%s";

/// Immutable per-run configuration shared read-only by a file's processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Start marker. Group 1 overrides the command, group 2 holds inline code.
    pub gen_start: Regex,

    /// Ends the generator code block.
    pub gen_end: Regex,

    /// Optional marker separating decoration from the output region.
    pub out_start: Option<Regex>,

    /// Ends the output region.
    pub out_end: Regex,

    /// End of stream may stand in for the output-end marker.
    pub use_eof: bool,

    /// Empty every output region without running generators.
    pub excise: bool,

    /// Keep generator temp files after running them.
    pub retain: bool,

    /// Template for generator temp files (`TMP`, `DIR`, `FILE`, `CTR`).
    pub gen_file: String,

    /// Template for the output temp file (`TMP`, `DIR`, `FILE`).
    pub out_file: String,

    /// Command used when the start marker does not name one.
    pub command: Option<String>,

    /// Arguments appended after the command's own words.
    pub args: Vec<String>,

    /// Kill generators that run longer than this.
    pub timeout: Option<Duration>,
}

pub(crate) fn default_gen_start() -> String {
    r"\[\[\[generate\s+([^]]+)\]\]\]".to_string()
}

pub(crate) fn default_gen_end() -> String {
    r"\[\[\[output\]\]\]".to_string()
}

pub(crate) fn default_out_end() -> String {
    r"\[\[\[end\]\]\]".to_string()
}

pub(crate) fn default_gen_file() -> String {
    "$DIR/cog_${FILE}_cog_${CTR}_.txt".to_string()
}

pub(crate) fn default_out_file() -> String {
    "$DIR/${FILE}_cog".to_string()
}

pub(crate) fn default_args() -> Vec<String> {
    vec![ARG_PLACEHOLDER.to_string()]
}
