//! Comment prefix and indentation stripping for generator code.
//!
//! Generator code lives inside comments of the host file. Two styles are
//! recognised, decided by the first line of the block:
//!
//! - **Line comments**: the first line starts with the start marker's prefix
//!   (e.g. `// `). Every line must start with that prefix, which is removed.
//! - **Block comments**: otherwise the first line's leading whitespace is the
//!   baseline. Every line with content must be indented at least that much;
//!   the baseline is removed. Blank lines may be indented less.

use crate::error::{CogError, Result, StyleKind};

/// The comment style detected for a generator block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentStyle {
    /// Every line starts with this literal prefix.
    LinePrefix(String),
    /// Every non-blank line is indented by at least this many characters.
    Indent(usize),
}

/// Generator code with its comment decoration removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub style: CommentStyle,
    /// Stripped lines, terminators preserved.
    pub lines: Vec<String>,
}

impl Normalized {
    /// The stripped code as one string.
    pub fn source(&self) -> String {
        self.lines.concat()
    }
}

/// Split a line into its body and its terminator (`\n`, `\r\n`, or nothing).
fn split_terminator(line: &str) -> (&str, &str) {
    let body = line
        .strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line);
    line.split_at(body.len())
}

/// Leading whitespace of the line body, as (char count, byte length).
fn leading_whitespace(body: &str) -> (usize, usize) {
    let mut chars = 0;
    let mut bytes = 0;
    for c in body.chars() {
        if !c.is_whitespace() {
            break;
        }
        chars += 1;
        bytes += c.len_utf8();
    }
    (chars, bytes)
}

/// Byte offset just past the first `n` characters of `s`.
fn char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

/// Strip the comment prefix or indentation from a block of generator code.
///
/// `first_line_no` is the 1-based file line number of `lines[0]`, used to
/// point errors at the offending line.
///
/// # Returns
///
/// * `Ok(Normalized)` - The detected style and the stripped lines
/// * `Err(CogError::StyleViolation)` - A line breaks the block's style
pub fn normalize(lines: &[String], prefix: &str, first_line_no: usize) -> Result<Normalized> {
    let Some(first) = lines.first() else {
        return Ok(Normalized {
            style: CommentStyle::LinePrefix(prefix.to_string()),
            lines: Vec::new(),
        });
    };

    let style = if first.starts_with(prefix) {
        CommentStyle::LinePrefix(prefix.to_string())
    } else {
        let (body, _) = split_terminator(first);
        CommentStyle::Indent(leading_whitespace(body).0)
    };

    let mut stripped = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let line_no = first_line_no + i;
        let kept = match &style {
            CommentStyle::LinePrefix(prefix) => {
                line.strip_prefix(prefix.as_str())
                    .ok_or_else(|| CogError::StyleViolation {
                        line: line_no,
                        kind: StyleKind::Prefix,
                        text: line.clone(),
                    })?
            }
            CommentStyle::Indent(indent) => {
                let (body, _) = split_terminator(line);
                let (ws_chars, ws_bytes) = leading_whitespace(body);
                let blank = ws_bytes == body.len();
                if ws_chars < *indent && !blank {
                    return Err(CogError::StyleViolation {
                        line: line_no,
                        kind: StyleKind::Indent,
                        text: line.clone(),
                    });
                }
                &line[char_offset(line, ws_chars.min(*indent))..]
            }
        };
        stripped.push(kept.to_string());
    }

    Ok(Normalized {
        style,
        lines: stripped,
    })
}
