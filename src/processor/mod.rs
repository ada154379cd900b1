//! Per-file processing: scan, generate, splice, commit.
//!
//! A file is copied line by line into a temp output file. Each generator
//! block is run and its output replaces the block's previous output region.
//! The original is replaced only after the whole file was copied without
//! error; on any failure the temp output is removed and the original is
//! left byte-for-byte unchanged.
//!
//! ```text
//! plain text ──start──▶ generator code ──gen end──▶ [decoration ──out start──▶]
//!     ▲                                                        │
//!     └────────────── output region ◀──────────────────────────┘
//!                     (discarded up to the out-end marker)
//! ```

use crate::config::ProcessorConfig;
use crate::context::FileContext;
use crate::error::{CogError, Region, Result};
use crate::fs::TempArtifact;
use crate::generator::{Generator, GeneratorBlock};
use crate::report::Reporter;
use crate::scan::{LineReader, MatchResult, Termination};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;


/// Result of processing a file that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file was rewritten with fresh output for this many blocks.
    Rewritten { blocks: usize },
    /// No start marker was found; the file was left alone.
    NoGeneratorContent,
}

/// What the plain-text scan stopped at.
#[derive(Debug)]
enum PlainText {
    /// A start marker, already copied to the output.
    Start(MatchResult),
    /// Clean end of stream after at least one block.
    End,
    /// End of stream on the first scan: nothing to do.
    NoContent,
}

/// Processes a single source file.
#[derive(Debug)]
pub struct Processor<'a> {
    context: FileContext,
    config: &'a ProcessorConfig,
    log: Reporter,
}

impl<'a> Processor<'a> {
    /// Create a processor for `file`.
    pub fn new<P: AsRef<Path>>(
        file: P,
        config: &'a ProcessorConfig,
        log: Reporter,
    ) -> Result<Self> {
        Ok(Self {
            context: FileContext::resolve(file)?,
            config,
            log,
        })
    }

    /// Process the file, replacing it only if every block succeeded.
    pub fn run(&self) -> Result<Outcome> {
        let path = self.context.path.display();
        self.log.trace(format_args!("Processing file '{}'", path));

        let result = self.try_cog();
        match &result {
            Ok(Outcome::Rewritten { blocks }) => self.log.info(format_args!(
                "Successfully processed '{}' ({} generator block{})",
                path,
                blocks,
                if *blocks == 1 { "" } else { "s" }
            )),
            Ok(Outcome::NoGeneratorContent) => self
                .log
                .info(format_args!("No generator code found in file '{}'", path)),
            Err(e) => self
                .log
                .error(format_args!("Error processing file '{}': {}", path, e)),
        }
        result
    }

    /// Open the input, create the temp output, splice, and commit.
    fn try_cog(&self) -> Result<Outcome> {
        let path = &self.context.path;
        let input = File::open(path)
            .map_err(|e| CogError::fs(format!("failed to open '{}'", path.display()), e))?;
        let permissions = input
            .metadata()
            .map_err(|e| CogError::fs(format!("failed to stat '{}'", path.display()), e))?
            .permissions();
        let mut reader = LineReader::new(BufReader::new(input));

        let output = self.context.output_path(&self.config.out_file)?;
        self.log
            .trace(format_args!("Writing output to '{}'", output.display()));
        let (artifact, file) = TempArtifact::create(output, self.log)?;
        let mut writer = BufWriter::new(file);

        let outcome = self.splice(&mut reader, &mut writer)?;
        if outcome == Outcome::NoGeneratorContent {
            return Ok(outcome);
        }
        drop(reader);

        let write_err = |e| {
            CogError::fs(
                format!("failed to write '{}'", artifact.path().display()),
                e,
            )
        };
        let file = writer.into_inner().map_err(|e| write_err(e.into_error()))?;
        file.set_permissions(permissions).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);

        self.log.trace(format_args!(
            "Renaming output file '{}' to original filename '{}'",
            artifact.path().display(),
            path.display()
        ));
        artifact.commit_to(path)?;
        Ok(outcome)
    }

    /// Drive the plain text → generator → output loop until end of stream.
    fn splice<R: BufRead, W: Write>(
        &self,
        reader: &mut LineReader<R>,
        out: &mut W,
    ) -> Result<Outcome> {
        let generator = Generator::new(self.config, &self.context, self.log);
        let mut counter = 0;

        loop {
            counter += 1;
            let start = match self.copy_plain_text(reader, out, counter == 1)? {
                PlainText::Start(start) => start,
                PlainText::End => return Ok(Outcome::Rewritten { blocks: counter - 1 }),
                PlainText::NoContent => return Ok(Outcome::NoGeneratorContent),
            };

            let command = start.capture(1).map(str::to_string);
            let generated = match start.capture(2) {
                Some(_) if self.config.excise => {
                    self.log
                        .trace(format_args!("excising inline block {}", counter));
                    String::new()
                }
                Some(code) => generator.generate(&GeneratorBlock {
                    lines: vec![format!("{}\n", code)],
                    prefix: start.prefix.clone(),
                    counter,
                    command,
                    first_line: start.line_no,
                })?,
                None => {
                    self.copy_generator_code(reader, out, &generator, &start, counter, command)?
                }
            };

            if self.copy_to_end(reader, out, &generated)? {
                return Ok(Outcome::Rewritten { blocks: counter });
            }
        }
    }

    /// Copy plain text up to and including the next start marker.
    ///
    /// On the first scan of a file, reaching the end without a start marker
    /// writes nothing and reports [`PlainText::NoContent`].
    fn copy_plain_text<R: BufRead, W: Write>(
        &self,
        reader: &mut LineReader<R>,
        out: &mut W,
        first_run: bool,
    ) -> Result<PlainText> {
        self.log.trace("copying plain text");
        let mut scan = reader
            .read_until(&self.config.gen_start)
            .map_err(|e| self.read_err(e))?;

        match scan.termination {
            Termination::Exhausted if first_run => return Ok(PlainText::NoContent),
            Termination::MatchedAtEof => {
                // A start marker on the final, unterminated line is only usable
                // when it carries its code inline and EOF may end the output.
                if scan.capture(2).is_some() && self.config.use_eof {
                    if let Some(last) = scan.lines.last_mut() {
                        last.push('\n');
                    }
                } else {
                    return Err(CogError::UnterminatedBlock {
                        region: Region::StartMarker,
                        line: scan.line_no,
                    });
                }
            }
            Termination::Exhausted | Termination::Matched => {}
        }

        self.write_lines(out, &scan.lines)?;

        if scan.found() {
            Ok(PlainText::Start(scan))
        } else {
            Ok(PlainText::End)
        }
    }

    /// Copy a fenced generator block through and run it.
    ///
    /// Reads code up to the generator-end marker, then (if configured) the
    /// decoration up to the output-start marker. Everything read is copied
    /// to the output unchanged; only the code lines are run.
    fn copy_generator_code<R: BufRead, W: Write>(
        &self,
        reader: &mut LineReader<R>,
        out: &mut W,
        generator: &Generator<'_>,
        start: &MatchResult,
        counter: usize,
        command: Option<String>,
    ) -> Result<String> {
        self.log.trace("copying generator code");
        let code = reader.read_until(&self.config.gen_end).map_err(|e| self.read_err(e))?;
        if code.termination != Termination::Matched {
            return Err(CogError::UnterminatedBlock {
                region: Region::GeneratorCode,
                line: code.line_no,
            });
        }
        self.write_lines(out, &code.lines)?;

        if let Some(out_start) = &self.config.out_start {
            let decoration = reader.read_until(out_start).map_err(|e| self.read_err(e))?;
            if decoration.termination != Termination::Matched {
                return Err(CogError::UnterminatedBlock {
                    region: Region::OutputStart,
                    line: decoration.line_no,
                });
            }
            self.write_lines(out, &decoration.lines)?;
        }

        if self.config.excise {
            self.log.trace(format_args!("excising block {}", counter));
            return Ok(String::new());
        }

        let mut lines = code.lines;
        lines.pop();
        generator.generate(&GeneratorBlock {
            lines,
            prefix: start.prefix.clone(),
            counter,
            command,
            first_line: start.line_no + 1,
        })
    }

    /// Discard the old output region and write the new one.
    ///
    /// Every generated line is indented like the output-end marker's line,
    /// which is then copied verbatim. Returns `true` once the stream has
    /// ended, either on the marker's line or (with `use_eof`) without one.
    fn copy_to_end<R: BufRead, W: Write>(
        &self,
        reader: &mut LineReader<R>,
        out: &mut W,
        generated: &str,
    ) -> Result<bool> {
        self.log.trace("copying to end of output");
        let end = reader
            .find_line(&self.config.out_end)
            .map_err(|e| self.read_err(e))?;

        if end.termination == Termination::Exhausted {
            if !self.config.use_eof {
                return Err(CogError::UnterminatedBlock {
                    region: Region::Output,
                    line: reader.line_no(),
                });
            }
            self.log
                .trace("No output end marker, treating end of file as end marker");
        }

        let marker_line = end.line.as_deref().unwrap_or("");
        let body = marker_line
            .trim_start_matches(|c: char| c.is_whitespace() && c != '\n' && c != '\r');
        let indent = &marker_line[..marker_line.len() - body.len()];

        for line in generated.lines() {
            writeln!(out, "{}{}", indent, line).map_err(|e| self.write_err(e))?;
        }

        if let Some(line) = &end.line {
            out.write_all(line.as_bytes())
                .map_err(|e| self.write_err(e))?;
        }

        Ok(end.termination != Termination::Matched)
    }

    fn write_lines<W: Write>(&self, out: &mut W, lines: &[String]) -> Result<()> {
        for line in lines {
            out.write_all(line.as_bytes())
                .map_err(|e| self.write_err(e))?;
        }
        self.log
            .trace(format_args!("Wrote {} lines to output file", lines.len()));
        Ok(())
    }

    fn read_err(&self, e: std::io::Error) -> CogError {
        CogError::fs(
            format!("failed to read '{}'", self.context.path.display()),
            e,
        )
    }

    fn write_err(&self, e: std::io::Error) -> CogError {
        CogError::fs(
            format!(
                "failed to write output for '{}'",
                self.context.path.display()
            ),
            e,
        )
    }
}
