use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use log::{error, warn};
use rayon::prelude::*;
use serde::Serialize;
use crate::Result;

/// What happens to the rest of the batch when one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    FailFast,
    KeepGoing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub status: Status,
    pub error: Option<String>,
}

impl FileOutcome {
    fn from_result(input: &Path, result: Result<PathBuf>) -> Self {
        match result {
            Ok(output) => Self {
                input: input.to_path_buf(),
                output: Some(output),
                status: Status::Ok,
                error: None,
            },
            Err(e) => Self {
                input: input.to_path_buf(),
                output: None,
                status: Status::Failed,
                error: Some(e.to_string()),
            },
        }
    }

    fn skipped(input: &Path) -> Self {
        Self {
            input: input.to_path_buf(),
            output: None,
            status: Status::Skipped,
            error: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    pub fn count(&self, status: Status) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn has_failures(&self) -> bool {
        self.count(Status::Failed) > 0
    }

    pub fn first_error(&self) -> Option<&str> {
        self.outcomes.iter().find_map(|o| o.error.as_deref())
    }
}

/// Runs a per-file job over the whole input list, sequentially or on a
/// dedicated rayon pool.
pub struct BatchRunner {
    jobs: usize,
    policy: FailurePolicy,
}

impl BatchRunner {
    /// `jobs == 0` uses one worker per CPU.
    pub fn new(jobs: usize, policy: FailurePolicy) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs, policy }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn run<F>(&self, files: &[PathBuf], job: F) -> Result<BatchSummary>
    where
        F: Fn(&Path) -> Result<PathBuf> + Send + Sync,
    {
        if self.jobs <= 1 || files.len() <= 1 {
            return Ok(self.run_sequential(files, job));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()?;
        let aborted = AtomicBool::new(false);

        let outcomes = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    if aborted.load(Ordering::SeqCst) {
                        return FileOutcome::skipped(file);
                    }
                    let outcome = self.record(file, job(file));
                    if outcome.status == Status::Failed && self.policy == FailurePolicy::FailFast {
                        aborted.store(true, Ordering::SeqCst);
                    }
                    outcome
                })
                .collect()
        });

        Ok(BatchSummary { outcomes })
    }

    /// Failures are logged as they happen when the batch carries on past them;
    /// under fail-fast the caller reports the one that stopped the run.
    fn record(&self, file: &Path, result: Result<PathBuf>) -> FileOutcome {
        let outcome = FileOutcome::from_result(file, result);
        if let (FailurePolicy::KeepGoing, Some(message)) = (self.policy, &outcome.error) {
            error!("{}: {}", file.display(), message);
        }
        outcome
    }

    fn run_sequential<F>(&self, files: &[PathBuf], job: F) -> BatchSummary
    where
        F: Fn(&Path) -> Result<PathBuf>,
    {
        let mut outcomes = Vec::with_capacity(files.len());
        let mut aborted = false;

        for file in files {
            if aborted {
                outcomes.push(FileOutcome::skipped(file));
                continue;
            }
            let outcome = self.record(file, job(file));
            if outcome.status == Status::Failed && self.policy == FailurePolicy::FailFast {
                warn!("stopping after first failure");
                aborted = true;
            }
            outcomes.push(outcome);
        }

        BatchSummary { outcomes }
    }
}
