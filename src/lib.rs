//! rcog: marker-driven inline code generation.
//!
//! Source files carry small generator programs inside comments, fenced by
//! marker patterns. Processing a file runs each generator and replaces the
//! text after it with the generator's standard output, so the file always
//! holds both the code and what it produced:
//!
//! ```text
//! // [[[generate python3]]]
//! // for n in ("a", "b"):
//! //     print(f"const {n.upper()} = \"{n}\";")
//! // [[[output]]]
//! const A = "a";
//! const B = "b";
//! // [[[end]]]
//! ```
//!
//! A file is only ever replaced as a whole, after every block in it
//! succeeded. See [`processor::Processor`] for the per-file engine and
//! [`driver`] for running many files.

pub mod cli;
pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod generator;
pub mod normalize;
pub mod processor;
pub mod report;
pub mod scan;
pub mod template;

#[cfg(test)]
mod test_support;
