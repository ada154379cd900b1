//! Filename template expansion.
//!
//! Temporary file names are built from templates such as
//! `$DIR/cog_${FILE}_cog_${CTR}_.txt`.
//!
//! # Syntax
//!
//! - `$NAME` or `${NAME}` - Substitutes the value of variable `NAME`
//! - `$$` - Renders as a literal `$`
//! - A `$` not followed by `{`, `$` or a name character is kept as-is
//!
//! Undefined variables are an error; they never expand to an empty string.

use std::collections::HashMap;
use std::fmt;

/// Error type for template rendering failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A variable was referenced but not provided.
    UndefinedVariable {
        /// The name of the undefined variable.
        name: String,
        /// The byte position in the template where the reference starts.
        position: usize,
    },
    /// A `${` was found without a matching `}`.
    UnmatchedBrace {
        /// The position of the `$`.
        position: usize,
    },
    /// An empty braced name was found (`${}`).
    EmptyVariableName {
        /// The position of the `$`.
        position: usize,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UndefinedVariable { name, position } => {
                write!(
                    f,
                    "undefined variable '{}' at position {} in template",
                    name, position
                )
            }
            TemplateError::UnmatchedBrace { position } => {
                write!(f, "unmatched '${{' at position {} in template", position)
            }
            TemplateError::EmptyVariableName { position } => {
                write!(
                    f,
                    "empty variable name '${{}}' at position {} in template",
                    position
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Render a template string by substituting variables.
///
/// # Examples
///
/// ```
/// use rcog::template::{render_template, vars};
///
/// let vars = vars([("DIR", "src"), ("FILE", "lib.rs")]);
/// let result = render_template("$DIR/${FILE}_cog", &vars).unwrap();
/// assert_eq!(result, "src/lib.rs_cog");
/// ```
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let name = match chars.peek() {
            Some((_, '$')) => {
                chars.next();
                result.push('$');
                continue;
            }
            Some((_, '{')) => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => name.push(c),
                        None => return Err(TemplateError::UnmatchedBrace { position: pos }),
                    }
                }
                if name.is_empty() {
                    return Err(TemplateError::EmptyVariableName { position: pos });
                }
                name
            }
            Some(&(_, c)) if is_name_char(c) => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !is_name_char(c) {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                name
            }
            _ => {
                result.push('$');
                continue;
            }
        };

        match variables.get(&name) {
            Some(value) => result.push_str(value),
            None => {
                return Err(TemplateError::UndefinedVariable {
                    name,
                    position: pos,
                });
            }
        }
    }

    Ok(result)
}

/// Check that a template only references the given variable names.
pub fn check_template(template: &str, names: &[&str]) -> Result<(), TemplateError> {
    let placeholders = vars(names.iter().map(|n| (*n, "")));
    render_template(template, &placeholders).map(|_| ())
}

/// Helper to create a variables map from a list of key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
