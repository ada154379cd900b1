//! rcog: regenerate text in source files from the code embedded in them.
//!
//! This is the entry point for the `rcog` CLI. It parses arguments, sets up
//! logging, merges the config file with the command line options, and hands
//! the expanded inputs to the driver.

mod logging;

use clap::Parser;
use rcog::cli::Cli;
use rcog::config::Options;
use rcog::driver::{self, Driver};
use rcog::error::Result;
use rcog::exit_codes;
use rcog::report::{Reporter, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    // clap's own usage errors exit with 2, which is taken by processing failures.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(exit_codes::USER_ERROR as u8)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);

    if let Err(err) = logging::init_logging(verbosity, cli.verbose) {
        eprintln!("Warning: {:#}", err);
    }

    let code = run(&cli, Reporter::new(verbosity));
    ExitCode::from(code as u8)
}

fn run(cli: &Cli, log: Reporter) -> i32 {
    let jobs = match load_options(cli).and_then(|o| driver::expand_inputs(&cli.inputs, &o)) {
        Ok(jobs) => jobs,
        Err(err) => {
            if log.verbosity() != Verbosity::Quiet {
                eprintln!("Error: {}", err);
            }
            return err.exit_code();
        }
    };

    let reports = Driver::new(cli.serial, log).run(&jobs);
    let code = driver::exit_code(&reports);

    let failed = reports.iter().filter(|r| r.result.is_err()).count();
    if code != exit_codes::SUCCESS {
        log.warn(format_args!(
            "{} of {} file{} failed",
            failed,
            reports.len(),
            if reports.len() == 1 { "" } else { "s" }
        ));
    }
    code
}

/// Config file options (or defaults), overridden by command line flags.
fn load_options(cli: &Cli) -> Result<Options> {
    let mut options = match &cli.config {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    cli.options.apply_to(&mut options);
    Ok(options)
}
