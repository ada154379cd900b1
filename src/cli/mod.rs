//! CLI argument parsing for rcog.
//!
//! Uses clap derive macros for declarative argument definitions. The same
//! per-file option flags are accepted on the command line and on each line
//! of an `@listfile`; see [`ListLine`].

use crate::config::Options;
use crate::error::{CogError, Result};
use clap::{ArgAction, Args, Parser};
use std::path::PathBuf;

/// rcog: regenerate text in source files from the code embedded in them.
///
/// Each input file is scanned for generator blocks. The code of every block
/// is run and its output replaces the block's previous output. Inputs that
/// start with `@` name list files: each line holds further options and inputs.
#[derive(Parser, Debug)]
#[command(name = "rcog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub options: OptionArgs,

    /// YAML file with default options; command line flags override it.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (repeat for more detail).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Turn off all output.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Process files one at a time, in input order.
    #[arg(short = 'S', long)]
    pub serial: bool,

    /// Files to process, or `@FILELIST` files of further command lines.
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<String>,
}

/// Per-file processing options.
///
/// Every field is optional so that a flag only overrides what it names.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionArgs {
    /// The output end marker can be assumed at end of file.
    #[arg(short = 'z', long = "eof")]
    pub use_eof: bool,

    /// Excise all generated output without running the generators.
    #[arg(short = 'x', long)]
    pub excise: bool,

    /// Don't delete temporary files containing generator code.
    #[arg(short = 'r', long)]
    pub retain: bool,

    /// Comma separated arguments to the command, `%s` for the code file.
    #[arg(
        short = 'a',
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        value_name = "ARGS"
    )]
    pub args: Option<Vec<String>>,

    /// Command to run when the start marker doesn't name one.
    #[arg(short = 'c', long = "cmd", value_name = "CMD")]
    pub command: Option<String>,

    /// Regex that starts generator blocks.
    #[arg(short = 'g', long, value_name = "REGEX")]
    pub genstart: Option<String>,

    /// Regex that ends generator code.
    #[arg(short = 'G', long, value_name = "REGEX")]
    pub genend: Option<String>,

    /// Optional regex that starts generator output.
    #[arg(short = 'o', long, value_name = "REGEX")]
    pub outstart: Option<String>,

    /// Regex that ends generator output.
    #[arg(short = 'O', long, value_name = "REGEX")]
    pub outend: Option<String>,

    /// Filename template for temp generator code files.
    #[arg(short = 'f', long, value_name = "TEMPLATE")]
    pub genfile: Option<String>,

    /// Filename template for temp output files.
    #[arg(short = 'F', long, value_name = "TEMPLATE")]
    pub outfile: Option<String>,

    /// Seconds a generator may run before it is killed.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl OptionArgs {
    /// Layer these flags over `options`.
    ///
    /// Switches can only be turned on; valued flags replace the current value.
    pub fn apply_to(&self, options: &mut Options) {
        options.use_eof |= self.use_eof;
        options.excise |= self.excise;
        options.retain |= self.retain;

        if let Some(args) = &self.args {
            options.args = args.clone();
        }
        if let Some(command) = &self.command {
            options.command = Some(command.clone());
        }
        if let Some(pattern) = &self.genstart {
            options.gen_start = pattern.clone();
        }
        if let Some(pattern) = &self.genend {
            options.gen_end = pattern.clone();
        }
        if let Some(pattern) = &self.outstart {
            options.out_start = Some(pattern.clone());
        }
        if let Some(pattern) = &self.outend {
            options.out_end = pattern.clone();
        }
        if let Some(template) = &self.genfile {
            options.gen_file = template.clone();
        }
        if let Some(template) = &self.outfile {
            options.out_file = template.clone();
        }
        if let Some(seconds) = self.timeout {
            options.timeout_seconds = Some(seconds);
        }
    }
}

/// One command line read from an `@listfile`.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
pub struct ListLine {
    #[command(flatten)]
    pub options: OptionArgs,

    /// Files or nested `@FILELIST`s this line applies to.
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<String>,
}

impl ListLine {
    /// Parse a list file line using shell-word rules.
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let words = shell_words::split(trimmed).map_err(|e| {
            CogError::Config(format!("failed to split list line '{}': {}", trimmed, e))
        })?;

        Self::try_parse_from(words)
            .map(Some)
            .map_err(|e| CogError::Config(format!("invalid list line '{}': {}", trimmed, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_inputs_only() {
        let cli = Cli::try_parse_from(["rcog", "a.txt", "@list"]).unwrap();
        assert_eq!(cli.inputs, vec!["a.txt", "@list"]);
        assert_eq!(cli.options, OptionArgs::default());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(!cli.serial);
        assert!(cli.config.is_none());
    }

    #[test]
    fn inputs_are_required() {
        assert!(Cli::try_parse_from(["rcog"]).is_err());
    }

    #[test]
    fn parse_all_short_flags() {
        let cli = Cli::try_parse_from([
            "rcog", "-z", "-x", "-r", "-S", "-vv", "-a", "-u,%s", "-c", "python3", "-g",
            "@GEN@", "-G", "@OUT@", "-o", "@BEGIN@", "-O", "@END@", "-f", "$TMP/g_$CTR",
            "-F", "$TMP/o", "f.txt",
        ])
        .unwrap();

        let opts = &cli.options;
        assert!(opts.use_eof && opts.excise && opts.retain);
        assert!(cli.serial);
        assert_eq!(cli.verbose, 2);
        assert_eq!(opts.args.as_deref(), Some(&["-u".to_string(), "%s".to_string()][..]));
        assert_eq!(opts.command.as_deref(), Some("python3"));
        assert_eq!(opts.genstart.as_deref(), Some("@GEN@"));
        assert_eq!(opts.genend.as_deref(), Some("@OUT@"));
        assert_eq!(opts.outstart.as_deref(), Some("@BEGIN@"));
        assert_eq!(opts.outend.as_deref(), Some("@END@"));
        assert_eq!(opts.genfile.as_deref(), Some("$TMP/g_$CTR"));
        assert_eq!(opts.outfile.as_deref(), Some("$TMP/o"));
        assert_eq!(cli.inputs, vec!["f.txt"]);
    }

    #[test]
    fn parse_long_flags() {
        let cli = Cli::try_parse_from([
            "rcog",
            "--eof",
            "--cmd",
            "sh -e",
            "--timeout",
            "30",
            "--config",
            "rcog.yaml",
            "--quiet",
            "f.txt",
        ])
        .unwrap();

        assert!(cli.options.use_eof);
        assert_eq!(cli.options.command.as_deref(), Some("sh -e"));
        assert_eq!(cli.options.timeout, Some(30));
        assert_eq!(cli.config, Some(PathBuf::from("rcog.yaml")));
        assert!(cli.quiet);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["rcog", "-q", "-v", "f.txt"]).is_err());
    }

    #[test]
    fn apply_overrides_only_given_fields() {
        let mut options = Options {
            command: Some("sh".to_string()),
            retain: true,
            ..Options::default()
        };
        let args = OptionArgs {
            use_eof: true,
            outend: Some("@END@".to_string()),
            ..OptionArgs::default()
        };

        args.apply_to(&mut options);

        assert!(options.use_eof);
        assert!(options.retain, "unset switch must not clear an enabled one");
        assert_eq!(options.out_end, "@END@");
        assert_eq!(options.command.as_deref(), Some("sh"));
        assert_eq!(options.gen_start, Options::default().gen_start);
    }

    #[test]
    fn list_line_skips_blank_and_comment() {
        assert!(ListLine::parse("").unwrap().is_none());
        assert!(ListLine::parse("   \t").unwrap().is_none());
        assert!(ListLine::parse("  # a comment").unwrap().is_none());
    }

    #[test]
    fn list_line_with_options_and_quoted_input() {
        let line = ListLine::parse(r#"-x --cmd "python3 -u" "dir with space/a.py" b.py"#)
            .unwrap()
            .unwrap();

        assert!(line.options.excise);
        assert_eq!(line.options.command.as_deref(), Some("python3 -u"));
        assert_eq!(line.inputs, vec!["dir with space/a.py", "b.py"]);
    }

    #[test]
    fn list_line_nested_listfile() {
        let line = ListLine::parse("@more.list").unwrap().unwrap();
        assert_eq!(line.inputs, vec!["@more.list"]);
    }

    #[test]
    fn list_line_unknown_flag_is_config_error() {
        let err = ListLine::parse("--bogus a.txt").unwrap_err();
        assert!(matches!(err, CogError::Config(_)));
    }

    #[test]
    fn list_line_unbalanced_quote_is_config_error() {
        let err = ListLine::parse("\"a.txt").unwrap_err();
        assert!(matches!(err, CogError::Config(_)));
    }
}
