//! Exit code constants for the rcog CLI.
//!
//! - 0: Success (every file rewritten or left alone)
//! - 1: User error (bad args, bad config, bad templates)
//! - 2: Processing failure (unterminated block, style violation, file errors)
//! - 3: Generator failure (command missing, failed to spawn, nonzero exit)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration or templates.
pub const USER_ERROR: i32 = 1;

/// A file could not be processed.
pub const PROCESSING_FAILURE: i32 = 2;

/// A generator command could not be run or reported failure.
pub const GENERATOR_FAILURE: i32 = 3;
