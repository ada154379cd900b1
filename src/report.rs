//! Logging capability injected into processors.
//!
//! The library only *emits* `tracing` events; the binary owns the subscriber.
//! A [`Reporter`] is chosen when a processor is built and decides which of
//! the processor's messages are emitted at all, so a quiet run stays silent
//! even when a subscriber is installed.

use std::fmt::Display;

/// How much a processor reports about its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Nothing at all, not even failures.
    Quiet,
    /// Per-file results, warnings, and generator stderr.
    #[default]
    Normal,
    /// Normal output plus step-by-step tracing.
    Verbose,
}

impl Verbosity {
    /// Translate the CLI's verbose counter and quiet flag. Quiet wins.
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose > 0 {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Gated front-end over `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    verbosity: Verbosity,
}

impl Reporter {
    /// Create a reporter with the given verbosity.
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// A reporter that discards everything.
    pub fn quiet() -> Self {
        Self::new(Verbosity::Quiet)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Whether step tracing is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbosity >= Verbosity::Verbose
    }

    /// Report a per-file result.
    pub fn info(&self, message: impl Display) {
        if self.verbosity >= Verbosity::Normal {
            tracing::info!("{}", message);
        }
    }

    /// Report a recoverable problem, such as a failed cleanup.
    pub fn warn(&self, message: impl Display) {
        if self.verbosity >= Verbosity::Normal {
            tracing::warn!("{}", message);
        }
    }

    /// Report a failure that aborted a file.
    pub fn error(&self, message: impl Display) {
        if self.verbosity >= Verbosity::Normal {
            tracing::error!("{}", message);
        }
    }

    /// Step-by-step tracing, emitted only in verbose mode.
    pub fn trace(&self, message: impl Display) {
        if self.is_verbose() {
            tracing::debug!("{}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(Verbosity::from_flags(3, true), Verbosity::Quiet);
    }

    #[test]
    fn verbose_counter_enables_verbose() {
        assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(5, false), Verbosity::Verbose);
    }

    #[test]
    fn reporter_gates_tracing() {
        assert!(!Reporter::quiet().is_verbose());
        assert!(!Reporter::default().is_verbose());
        assert!(Reporter::new(Verbosity::Verbose).is_verbose());
    }
}
