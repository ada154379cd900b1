//! Generator subprocess invocation.
//!
//! Runs a generator command with output capture, an optional timeout, and
//! error handling. Standard output becomes the generated text; standard
//! error is only ever logged and reported, never spliced into the file.

use crate::config::ARG_PLACEHOLDER;
use crate::error::{CogError, Result};
use crate::report::Reporter;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// A fully resolved generator command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

/// Captured result of a successful generator run.
#[derive(Debug, Clone)]
pub struct GeneratorOutput {
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl Invocation {
    /// Build the command line for a generator code file.
    ///
    /// `command` is split with shell-word rules: the first word is the
    /// program and the rest precede `args`. Every `%s` in the command words
    /// and in `args` is replaced with `code_path`.
    pub fn new(command: &str, args: &[String], code_path: &Path) -> Result<Self> {
        let words = shell_words::split(command).map_err(|e| {
            CogError::Config(format!(
                "failed to parse generator command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                command, e
            ))
        })?;

        if words.first().is_none_or(|p| p.is_empty()) {
            return Err(CogError::Config(format!(
                "generator command is empty after parsing: '{}'",
                command
            )));
        }

        let path = code_path.to_string_lossy();
        let mut words = words
            .iter()
            .chain(args)
            .map(|w| w.replace(ARG_PLACEHOLDER, &path));

        Ok(Self {
            program: words.next().unwrap_or_default(),
            args: words.collect(),
        })
    }

    /// Display form used in logs and errors.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.as_str()];
        parts.extend(self.args.iter().map(String::as_str));
        shell_words::join(parts)
    }

    /// Run the command in `dir` and capture its output.
    ///
    /// # Returns
    ///
    /// * `Ok(GeneratorOutput)` - The process exited successfully
    /// * `Err(CogError::GeneratorFailed)` - Spawn failure, timeout, or unsuccessful exit
    pub fn run(
        &self,
        dir: &Path,
        timeout: Option<Duration>,
        log: Reporter,
    ) -> Result<GeneratorOutput> {
        log.trace(format_args!(
            "running in '{}': {}",
            dir.display(),
            self.display()
        ));

        let start_time = Instant::now();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                CogError::GeneratorFailed(format!(
                    "failed to execute '{}': {}\n\
                     Fix: ensure the command is installed and in PATH.",
                    self.program, e
                ))
            })?;

        // Drain both pipes concurrently so a chatty generator can't block on a full pipe.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let Some(status) = wait_with_timeout(&mut child, timeout)? else {
            // Processes the generator started may still hold the pipes open,
            // so the drain threads are left behind rather than joined.
            return Err(CogError::GeneratorFailed(format!(
                "'{}' timed out after {:?}",
                self.display(),
                timeout.unwrap_or_default()
            )));
        };
        let stdout = join_drain(stdout);
        let stderr = String::from_utf8_lossy(&join_drain(stderr)).into_owned();
        let duration = start_time.elapsed();

        if !stderr.is_empty() {
            log.warn(format_args!("{}: {}", self.program, stderr.trim_end()));
        }

        if !status.success() {
            let detail = if stderr.trim().is_empty() {
                String::new()
            } else {
                format!("\n{}", stderr.trim_end())
            };
            return Err(CogError::GeneratorFailed(format!(
                "'{}' failed ({}){}",
                self.display(),
                status,
                detail
            )));
        }

        let stdout = String::from_utf8(stdout).map_err(|e| {
            CogError::GeneratorFailed(format!(
                "'{}' wrote output that is not valid UTF-8: {}",
                self.display(),
                e.utf8_error()
            ))
        })?;

        log.trace(format_args!(
            "generator finished in {:.2?}, {} bytes of output",
            duration,
            stdout.len()
        ));

        Ok(GeneratorOutput {
            stdout,
            stderr,
            duration,
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<thread::JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn join_drain(handle: Option<thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Wait for a child process, killing it once `timeout` elapses.
///
/// Returns `None` if the process was killed.
fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child
            .wait()
            .map(Some)
            .map_err(|e| CogError::GeneratorFailed(format!("failed to wait for generator: {}", e)));
    };

    let start = Instant::now();
    let poll_interval = Duration::from_millis(50);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(None);
                }
                thread::sleep(poll_interval);
            }
            Err(e) => {
                return Err(CogError::GeneratorFailed(format!(
                    "failed to check generator status: {}",
                    e
                )));
            }
        }
    }
}
