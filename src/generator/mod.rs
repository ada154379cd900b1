//! Generator block execution.
//!
//! A generator block's code is stripped of its comment decoration, written
//! to an exclusively created temp file named from the `gen_file` template,
//! and run by the configured command from the source file's directory.
//! The temp file is removed afterwards unless retention is configured.

mod invoker;

pub use invoker::{GeneratorOutput, Invocation};

use crate::config::ProcessorConfig;
use crate::context::FileContext;
use crate::error::{CogError, Result};
use crate::fs::TempArtifact;
use crate::normalize::normalize;
use crate::report::Reporter;
use std::io::Write;

/// The code of one generator block, as read from the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorBlock {
    /// Raw code lines, comment decoration included.
    pub lines: Vec<String>,
    /// Text before the start marker on its line.
    pub prefix: String,
    /// 1-based position of this block in the file.
    pub counter: usize,
    /// Command captured by the start marker, if any.
    pub command: Option<String>,
    /// 1-based file line number of `lines[0]`.
    pub first_line: usize,
}

/// Runs generator blocks for one source file.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    config: &'a ProcessorConfig,
    context: &'a FileContext,
    log: Reporter,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a ProcessorConfig, context: &'a FileContext, log: Reporter) -> Self {
        Self {
            config,
            context,
            log,
        }
    }

    /// Run a generator block and return its standard output.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The generated text
    /// * `Err(CogError::StyleViolation)` - The code's comment style is inconsistent
    /// * `Err(CogError::Config)` - No command was given by the marker or the options
    /// * `Err(CogError::ArtifactCollision)` - The generator temp file already exists
    /// * `Err(CogError::GeneratorFailed)` - The command failed
    pub fn generate(&self, block: &GeneratorBlock) -> Result<String> {
        self.log.trace("generating runnable code");

        let code = normalize(&block.lines, &block.prefix, block.first_line)?;

        let command = block
            .command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or(self.config.command.as_deref())
            .ok_or_else(|| {
                CogError::Config(format!(
                    "no generator command for block {} in '{}': the start marker \
                     captured none and no default command is configured",
                    block.counter,
                    self.context.path.display()
                ))
            })?;

        let path = self
            .context
            .generator_path(&self.config.gen_file, block.counter)?;
        self.log.trace(format_args!(
            "Creating generator code file: '{}'",
            path.display()
        ));
        let (artifact, mut file) = TempArtifact::create(path, self.log)?;

        let source = code.source();
        file.write_all(source.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| {
                CogError::fs(
                    format!("failed to write '{}'", artifact.path().display()),
                    e,
                )
            })?;
        drop(file);
        self.log
            .trace(format_args!("generator code:\n{}", source.trim_end()));

        // The generator runs from the source file's directory, so hand it an
        // absolute path to the code file.
        let code_path = std::path::absolute(artifact.path()).map_err(|e| {
            CogError::fs(
                format!("failed to resolve '{}'", artifact.path().display()),
                e,
            )
        })?;

        let _guard = if self.config.retain {
            self.log.trace(format_args!(
                "Retaining generator code file: '{}'",
                code_path.display()
            ));
            artifact.keep();
            None
        } else {
            Some(artifact)
        };

        let invocation = Invocation::new(command, &self.config.args, &code_path)?;
        let output = invocation.run(&self.context.dir, self.config.timeout, self.log)?;
        Ok(output.stdout)
    }
}
