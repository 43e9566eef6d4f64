//! Depth-first source folder scanner.
//!
//! # Design
//!
//! - Walk with `walkdir`, pre-order and sorted by file name, without
//!   following symlinks
//! - Each entry is evaluated to a [`Decision`]; a pruned directory's subtree
//!   is never visited
//! - Accepted files go through the tracking check and collection resolution,
//!   then are published to the outbound queue in walk order
//! - Per-entry failures are reported to the [`ScanObserver`] and skipped; only
//!   the initial source folder check can fail the scan

use super::cancel::CancellationToken;
use super::collection::CollectionResolver;
use super::error::{Result, UploadError};
use super::events::{ScanEvent, ScanObserver, TracingObserver};
use super::filter::EntryKind;
use super::fs::{FileSystem, LocalFileSystem};
use super::job::Job;
use super::queue::UploadQueue;
use super::tracking::TrackingFailurePolicy;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use walkdir::{DirEntry, WalkDir};

/// Counters for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Directories descended into, including the source folder
    pub dirs_visited: u64,
    /// Directories skipped together with their subtree
    pub dirs_pruned: u64,
    /// Non-directory entries considered
    pub files_seen: u64,
    /// Files rejected by the filter or not regular files
    pub files_filtered: u64,
    pub already_uploaded: u64,
    /// Tracking lookups that failed, whatever the policy did with the file
    pub tracking_errors: u64,
    /// Directories whose collection could not be resolved
    pub collection_failures: u64,
    /// Unreadable entries skipped
    pub entry_errors: u64,
    pub tasks_enqueued: u64,
    pub cancelled: bool,
    /// The consumer went away before the walk finished
    pub queue_closed: bool,
    pub duration_ms: u64,
}

/// Outcome of evaluating one walked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    /// Nothing to publish; keep walking (descends into allowed directories).
    Continue,
    /// A regular file that passed the filter.
    Accept,
    /// A disallowed directory; skip its subtree.
    Prune,
}

/// Walks source folders and produces upload tasks.
pub struct Scanner {
    fs: Arc<dyn FileSystem>,
    observer: Arc<dyn ScanObserver>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Scanner over the local filesystem reporting through `tracing`.
    pub fn new() -> Self {
        Self {
            fs: Arc::new(LocalFileSystem),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn observer(&self) -> &Arc<dyn ScanObserver> {
        &self.observer
    }

    /// Scan `job`'s source folder, publishing a task per new eligible file.
    ///
    /// Publishing blocks while a bounded queue is full. The queue is never
    /// closed here; that is up to whoever created it.
    pub fn scan(&self, job: &Job, queue: &UploadQueue) -> Result<ScanStats> {
        self.scan_with_cancel(job, queue, &CancellationToken::new())
    }

    /// [`Scanner::scan`] that stops at the next entry once `cancel` is set.
    pub fn scan_with_cancel(
        &self,
        job: &Job,
        queue: &UploadQueue,
        cancel: &CancellationToken,
    ) -> Result<ScanStats> {
        let source = job.source();
        if !self.fs.is_dir(source) {
            return Err(UploadError::NotADirectory(source.to_path_buf()));
        }

        let start = Instant::now();
        let mut stats = ScanStats::default();
        self.emit(ScanEvent::Started {
            source: source.to_path_buf(),
        });

        let mut collections = CollectionResolver::new(&**job.client(), &*self.observer);
        let tasks = job.task_builder();

        let mut walker = WalkDir::new(source)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = walker.next() {
            if cancel.is_cancelled() {
                stats.cancelled = true;
                self.emit(ScanEvent::Cancelled {
                    source: source.to_path_buf(),
                });
                break;
            }

            let entry = match next {
                Ok(entry) => entry,
                Err(err) => {
                    stats.entry_errors += 1;
                    self.emit(ScanEvent::EntryError {
                        path: err.path().map(Path::to_path_buf),
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            match self.evaluate(job, &entry, &mut stats) {
                Decision::Continue => continue,
                Decision::Prune => {
                    walker.skip_current_dir();
                    continue;
                }
                Decision::Accept => {}
            }

            let path = entry.path();
            match job.tracker().is_already_uploaded(path) {
                Ok(true) => {
                    stats.already_uploaded += 1;
                    self.emit(ScanEvent::AlreadyUploaded {
                        path: path.to_path_buf(),
                    });
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    stats.tracking_errors += 1;
                    let policy = job.options().on_tracking_error();
                    self.emit(ScanEvent::TrackingFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                        policy,
                    });
                    if policy == TrackingFailurePolicy::Skip {
                        continue;
                    }
                }
            }

            let collection_id = if job.options().create_collections() {
                collections.resolve(path.parent().unwrap_or(source))
            } else {
                String::new()
            };

            let task = tasks.build(path, collection_id.clone());
            if queue.publish(task).is_err() {
                stats.queue_closed = true;
                self.emit(ScanEvent::QueueClosed {
                    path: path.to_path_buf(),
                });
                break;
            }
            stats.tasks_enqueued += 1;
            self.emit(ScanEvent::Enqueued {
                path: path.to_path_buf(),
                collection_id,
            });
        }

        stats.collection_failures = collections.failures();
        stats.duration_ms = start.elapsed().as_millis() as u64;
        self.emit(ScanEvent::Finished {
            source: source.to_path_buf(),
            stats: stats.clone(),
        });
        Ok(stats)
    }

    fn evaluate(&self, job: &Job, entry: &DirEntry, stats: &mut ScanStats) -> Decision {
        let path = entry.path();
        let rel = path.strip_prefix(job.source()).unwrap_or(path);

        if let Err(err) = entry.metadata() {
            stats.entry_errors += 1;
            self.emit(ScanEvent::EntryError {
                path: Some(path.to_path_buf()),
                message: err.to_string(),
            });
            return if entry.file_type().is_dir() {
                Decision::Prune
            } else {
                Decision::Continue
            };
        }

        if entry.file_type().is_dir() {
            if job.filter().is_allowed(rel, EntryKind::Directory) {
                stats.dirs_visited += 1;
                return Decision::Continue;
            }
            stats.dirs_pruned += 1;
            self.emit(ScanEvent::Pruned {
                path: path.to_path_buf(),
            });
            return Decision::Prune;
        }

        stats.files_seen += 1;
        if !job.filter().is_allowed(rel, EntryKind::File) || !self.fs.is_file(path) {
            stats.files_filtered += 1;
            return Decision::Continue;
        }
        Decision::Accept
    }

    fn emit(&self, event: ScanEvent) {
        self.observer.on_event(&event);
    }
}
