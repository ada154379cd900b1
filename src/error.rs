//! Error types for rcog.
//!
//! Uses thiserror for derive macros. Every fatal condition aborts processing of
//! a single file; the original file is left untouched whenever one of these is
//! returned from [`crate::processor::Processor::run`].

use crate::exit_codes;
use crate::template::TemplateError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The part of a file the scanner was inside when the stream ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// A start marker on the final, newline-less line with no inline code to run.
    StartMarker,
    /// Generator code between the start marker and the generator-end marker.
    GeneratorCode,
    /// Decorative lines between the generator-end and output-start markers.
    OutputStart,
    /// The previously generated text before the output-end marker.
    Output,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Region::StartMarker => "start marker",
            Region::GeneratorCode => "generator code block",
            Region::OutputStart => "generator block (missing output-start marker)",
            Region::Output => "output region",
        };
        f.write_str(s)
    }
}

/// Which comment style a generator block line violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    /// The line does not begin with the start marker's comment prefix.
    Prefix,
    /// The line is indented less than the first line of the block.
    Indent,
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleKind::Prefix => f.write_str("prefix"),
            StyleKind::Indent => f.write_str("indent"),
        }
    }
}

/// Main error type for rcog operations.
#[derive(Error, Debug)]
pub enum CogError {
    /// Invalid options, marker patterns, or missing generator command.
    #[error("{0}")]
    Config(String),

    /// A filename template could not be expanded.
    #[error("invalid filename template: {0}")]
    Template(#[from] TemplateError),

    /// End of stream reached inside a block that needs a closing marker.
    #[error("unterminated {region}: reached end of file after line {line}")]
    UnterminatedBlock { region: Region, line: usize },

    /// A generator code line breaks the block's comment prefix or indentation.
    #[error("line {line} has invalid {kind}: {}", text.trim_end())]
    StyleViolation {
        line: usize,
        kind: StyleKind,
        text: String,
    },

    /// The generator command could not be run or exited unsuccessfully.
    #[error("error generating code from source: {0}")]
    GeneratorFailed(String),

    /// A temporary artifact would overwrite an existing file.
    #[error("file '{}' already exists", path.display())]
    ArtifactCollision { path: PathBuf },

    /// Any read, write, rename, or remove failure.
    #[error("{context}: {source}")]
    Filesystem {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl CogError {
    /// Build a filesystem error with a description of the failed operation.
    pub fn fs(context: impl Into<String>, source: io::Error) -> Self {
        CogError::Filesystem {
            context: context.into(),
            source,
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CogError::Config(_) | CogError::Template(_) => exit_codes::USER_ERROR,
            CogError::UnterminatedBlock { .. }
            | CogError::StyleViolation { .. }
            | CogError::ArtifactCollision { .. }
            | CogError::Filesystem { .. } => exit_codes::PROCESSING_FAILURE,
            CogError::GeneratorFailed(_) => exit_codes::GENERATOR_FAILURE,
        }
    }
}

/// Result type alias for rcog operations.
pub type Result<T> = std::result::Result<T, CogError>;
