//! Configuration for rcog.
//!
//! [`Options`] is the user-facing, serde-friendly form. It can be loaded from
//! a YAML file and overridden from the command line. [`Options::compile`]
//! turns it into the immutable [`ProcessorConfig`] a processor runs with.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Options;
pub use types::{ARG_PLACEHOLDER, ProcessorConfig};
