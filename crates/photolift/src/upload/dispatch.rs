//! Runs several jobs concurrently against one outbound queue.

use super::cancel::CancellationToken;
use super::error::{Result, UploadError};
use super::job::Job;
use super::queue::UploadQueue;
use super::scanner::{ScanStats, Scanner};
use std::path::PathBuf;
use std::thread;
use tracing::{error, info};

/// Result of one job's scan.
#[derive(Debug)]
pub struct JobOutcome {
    pub source: PathBuf,
    pub result: Result<ScanStats>,
}

impl JobOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Orchestrates one scan thread per job.
pub struct Dispatcher {
    scanner: Scanner,
}

impl Dispatcher {
    pub fn new(scanner: Scanner) -> Self {
        Self { scanner }
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Scan every job on its own thread, then release `queue`.
    ///
    /// Each thread publishes through a clone of `queue`. The original handle
    /// is dropped once the threads are spawned, so the receiver sees the
    /// channel close as soon as the last scan finishes. Outcomes are returned
    /// in job order.
    pub fn run(&self, jobs: Vec<Job>, queue: UploadQueue, cancel: &CancellationToken) -> Vec<JobOutcome> {
        info!(jobs = jobs.len(), "Dispatching scan jobs");

        thread::scope(|scope| {
            let handles: Vec<_> = jobs
                .into_iter()
                .map(|job| {
                    let queue = queue.clone();
                    let scanner = &self.scanner;
                    let source = job.source().to_path_buf();
                    let handle = scope.spawn(move || scanner.scan_with_cancel(&job, &queue, cancel));
                    (source, handle)
                })
                .collect();
            drop(queue);

            handles
                .into_iter()
                .map(|(source, handle)| {
                    let result = match handle.join() {
                        Ok(result) => result,
                        Err(_) => Err(UploadError::ScanPanicked(source.clone())),
                    };
                    if let Err(e) = &result {
                        error!(source = %source.display(), error = %e, "Scan failed");
                    }
                    JobOutcome { source, result }
                })
                .collect()
        })
    }
}
