//! Multi-file driver.
//!
//! Expands command line inputs (including nested `@listfile`s) into jobs,
//! runs each job's [`Processor`] on a bounded pool of worker threads, and
//! folds the per-file results into one exit code.
//!
//! Files never share mutable state: each job owns its path and holds a
//! read-only handle to the compiled options it runs with.

use crate::cli::ListLine;
use crate::config::{Options, ProcessorConfig};
use crate::error::{CogError, Result};
use crate::exit_codes;
use crate::processor::{Outcome, Processor};
use crate::report::Reporter;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// One file to process with the options in effect where it was named.
#[derive(Debug, Clone)]
pub struct Job {
    pub path: PathBuf,
    pub config: Arc<ProcessorConfig>,
}

/// Result of processing one job.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<Outcome>,
}

impl FileReport {
    pub fn exit_code(&self) -> i32 {
        match &self.result {
            Ok(_) => exit_codes::SUCCESS,
            Err(e) => e.exit_code(),
        }
    }
}

/// Highest exit code over all reports; success when there are none.
pub fn exit_code(reports: &[FileReport]) -> i32 {
    reports
        .iter()
        .map(FileReport::exit_code)
        .max()
        .unwrap_or(exit_codes::SUCCESS)
}

/// Expand inputs into jobs, in the order they were named.
///
/// An input starting with `@` names a list file. Each of its lines is parsed
/// as a command line; flags on a line are layered over `options` for the
/// inputs on that same line only. List files may name further list files,
/// but not themselves, directly or through others.
///
/// # Returns
///
/// * `Ok(Vec<Job>)` - Every file to process
/// * `Err(CogError::Config)` - Unreadable or cyclic list file, bad list line,
///   or options that fail to compile
pub fn expand_inputs(inputs: &[String], options: &Options) -> Result<Vec<Job>> {
    let config = Arc::new(options.compile()?);
    let mut jobs = Vec::new();
    let mut stack = Vec::new();
    expand_into(inputs, options, &config, &mut stack, &mut jobs)?;
    Ok(jobs)
}

fn expand_into(
    inputs: &[String],
    options: &Options,
    config: &Arc<ProcessorConfig>,
    stack: &mut Vec<PathBuf>,
    jobs: &mut Vec<Job>,
) -> Result<()> {
    for input in inputs {
        let Some(list) = input.strip_prefix('@') else {
            jobs.push(Job {
                path: PathBuf::from(input),
                config: Arc::clone(config),
            });
            continue;
        };

        if list.is_empty() {
            return Err(CogError::Config(
                "'@' must be followed by a list file name".to_string(),
            ));
        }
        expand_list_file(Path::new(list), options, stack, jobs)?;
    }
    Ok(())
}

fn expand_list_file(
    list: &Path,
    options: &Options,
    stack: &mut Vec<PathBuf>,
    jobs: &mut Vec<Job>,
) -> Result<()> {
    let read_err = |e: std::io::Error| {
        CogError::Config(format!(
            "failed to read list file '{}': {}",
            list.display(),
            e
        ))
    };
    let canonical = list.canonicalize().map_err(read_err)?;
    if stack.contains(&canonical) {
        return Err(CogError::Config(format!(
            "list file '{}' includes itself",
            list.display()
        )));
    }
    let content = std::fs::read_to_string(&canonical).map_err(read_err)?;

    stack.push(canonical);
    for (i, line) in content.lines().enumerate() {
        let Some(line) = ListLine::parse(line).map_err(|e| {
            CogError::Config(format!("{}:{}: {}", list.display(), i + 1, e))
        })?
        else {
            continue;
        };

        let mut line_options = options.clone();
        line.options.apply_to(&mut line_options);
        let config = Arc::new(line_options.compile().map_err(|e| {
            CogError::Config(format!("{}:{}: {}", list.display(), i + 1, e))
        })?);
        expand_into(&line.inputs, &line_options, &config, stack, jobs)?;
    }
    stack.pop();
    Ok(())
}

/// Runs jobs, concurrently or one at a time.
#[derive(Debug, Clone, Copy)]
pub struct Driver {
    serial: bool,
    workers: Option<NonZeroUsize>,
    log: Reporter,
}

impl Driver {
    pub fn new(serial: bool, log: Reporter) -> Self {
        Self {
            serial,
            workers: None,
            log,
        }
    }

    /// Cap the worker pool at `workers` threads instead of one per CPU.
    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Process every job and return one report per job, in job order.
    pub fn run(&self, jobs: &[Job]) -> Vec<FileReport> {
        let workers = self.worker_count(jobs.len());
        self.log.trace(format_args!(
            "processing {} file{} with {} worker{}",
            jobs.len(),
            if jobs.len() == 1 { "" } else { "s" },
            workers,
            if workers == 1 { "" } else { "s" }
        ));

        if workers <= 1 {
            return jobs.iter().map(|job| self.process(job)).collect();
        }

        let next = AtomicUsize::new(0);
        let mut indexed: Vec<(usize, FileReport)> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(|| {
                        let mut done = Vec::new();
                        loop {
                            let index = next.fetch_add(1, Ordering::Relaxed);
                            let Some(job) = jobs.get(index) else {
                                break;
                            };
                            done.push((index, self.process(job)));
                        }
                        done
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|h| match h.join() {
                    Ok(done) => done,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, report)| report).collect()
    }

    fn worker_count(&self, jobs: usize) -> usize {
        if self.serial {
            return 1;
        }
        let limit = self
            .workers
            .or_else(|| thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get);
        limit.min(jobs)
    }

    fn process(&self, job: &Job) -> FileReport {
        let result = Processor::new(&job.path, &job.config, self.log).and_then(|p| p.run());
        FileReport {
            path: job.path.clone(),
            result,
        }
    }
}
