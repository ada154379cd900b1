//! Line reader and marker matcher.
//!
//! Input is consumed one line at a time, each line keeping its terminator.
//! A line that ends without `\n` can only be the final fragment of the
//! stream, which is why a match there ([`Termination::MatchedAtEof`]) is
//! reported separately from an ordinary match.

use regex::Regex;
use std::io::{self, BufRead};

/// How a scan for a marker ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Marker found on a newline-terminated line; more input may follow.
    Matched,
    /// Marker found on the final fragment, which has no line terminator.
    MatchedAtEof,
    /// Input ended without a match.
    Exhausted,
}

impl Termination {
    pub fn found(self) -> bool {
        self != Termination::Exhausted
    }
}

/// Output of [`LineReader::read_until`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Every line consumed, including the matching line when found.
    pub lines: Vec<String>,
    /// Text on the matching line before the match start.
    pub prefix: String,
    /// Capture groups 1.. of the match; `None` for groups that did not participate.
    pub captures: Vec<Option<String>>,
    pub termination: Termination,
    /// 1-based number of the last line consumed.
    pub line_no: usize,
}

impl MatchResult {
    pub fn found(&self) -> bool {
        self.termination.found()
    }

    /// Capture group `index` (1-based, as in the pattern), if it matched.
    pub fn capture(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.captures.get(i))
            .and_then(|c| c.as_deref())
    }
}

/// Output of [`LineReader::find_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// The matching line, if any.
    pub line: Option<String>,
    pub termination: Termination,
}

/// Buffered line reader that counts the lines it consumes.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    line_no: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, line_no: 0 }
    }

    /// Number of lines consumed so far.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Read the next line including its terminator; `None` at end of input.
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        Ok(Some(line))
    }

    /// Consume lines up to and including the first one matching `marker`.
    ///
    /// The empty read at end of input is never tested against the pattern,
    /// so a pattern that matches the empty string does not match "past" the
    /// last line.
    pub fn read_until(&mut self, marker: &Regex) -> io::Result<MatchResult> {
        let mut lines = Vec::new();

        while let Some(line) = self.next_line()? {
            if let Some(caps) = marker.captures(&line) {
                let whole = caps.get(0).map_or(0..0, |m| m.range());
                let prefix = line[..whole.start].to_string();
                let captures = caps
                    .iter()
                    .skip(1)
                    .map(|m| m.map(|m| m.as_str().to_string()))
                    .collect();
                let termination = if line.ends_with('\n') {
                    Termination::Matched
                } else {
                    Termination::MatchedAtEof
                };
                lines.push(line);
                return Ok(MatchResult {
                    lines,
                    prefix,
                    captures,
                    termination,
                    line_no: self.line_no,
                });
            }
            lines.push(line);
        }

        Ok(MatchResult {
            lines,
            prefix: String::new(),
            captures: Vec::new(),
            termination: Termination::Exhausted,
            line_no: self.line_no,
        })
    }

    /// Skip lines until one matches `marker` and return only that line.
    pub fn find_line(&mut self, marker: &Regex) -> io::Result<LineMatch> {
        while let Some(line) = self.next_line()? {
            if marker.is_match(&line) {
                let termination = if line.ends_with('\n') {
                    Termination::Matched
                } else {
                    Termination::MatchedAtEof
                };
                return Ok(LineMatch {
                    line: Some(line),
                    termination,
                });
            }
        }

        Ok(LineMatch {
            line: None,
            termination: Termination::Exhausted,
        })
    }
}
