//! Diagnostics emitted by the scanner.
//!
//! The scanner never logs directly. It reports typed [`ScanEvent`]s to an
//! injected [`ScanObserver`]; [`TracingObserver`] turns them into `tracing`
//! events and [`RecordingObserver`] keeps them for assertions.

use super::scanner::ScanStats;
use super::tracking::TrackingFailurePolicy;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Started {
        source: PathBuf,
    },
    /// An entry could not be read or had no metadata; it was skipped.
    EntryError {
        path: Option<PathBuf>,
        message: String,
    },
    /// A directory was disallowed and its subtree skipped.
    Pruned {
        path: PathBuf,
    },
    AlreadyUploaded {
        path: PathBuf,
    },
    TrackingFailed {
        path: PathBuf,
        message: String,
        policy: TrackingFailurePolicy,
    },
    CollectionFailed {
        name: String,
        message: String,
    },
    Enqueued {
        path: PathBuf,
        collection_id: String,
    },
    /// Every receiver is gone; the walk stops here.
    QueueClosed {
        path: PathBuf,
    },
    Cancelled {
        source: PathBuf,
    },
    Finished {
        source: PathBuf,
        stats: ScanStats,
    },
}

/// Sink for scanner diagnostics. Shared by concurrent scans.
pub trait ScanObserver: Send + Sync {
    fn on_event(&self, event: &ScanEvent);
}

/// Default observer: structured `tracing` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn on_event(&self, event: &ScanEvent) {
        match event {
            ScanEvent::Started { source } => {
                info!(source = %source.display(), "Starting folder scan");
            }
            ScanEvent::EntryError { path, message } => {
                let path = path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                warn!(path = %path, error = %message, "Skipping unreadable entry");
            }
            ScanEvent::Pruned { path } => {
                debug!(path = %path.display(), "Skipping excluded directory");
            }
            ScanEvent::AlreadyUploaded { path } => {
                info!(path = %path.display(), "Already uploaded, skipping file");
            }
            ScanEvent::TrackingFailed {
                path,
                message,
                policy,
            } => {
                warn!(
                    path = %path.display(),
                    error = %message,
                    policy = ?policy,
                    "Tracking store lookup failed"
                );
            }
            ScanEvent::CollectionFailed { name, message } => {
                warn!(name = %name, error = %message, "Collection creation failed, uploading without collection");
            }
            ScanEvent::Enqueued {
                path,
                collection_id,
            } => {
                debug!(path = %path.display(), collection = %collection_id, "Queued upload");
            }
            ScanEvent::QueueClosed { path } => {
                warn!(path = %path.display(), "Upload queue closed, stopping scan");
            }
            ScanEvent::Cancelled { source } => {
                info!(source = %source.display(), "Scan cancelled");
            }
            ScanEvent::Finished { source, stats } => {
                info!(
                    source = %source.display(),
                    enqueued = stats.tasks_enqueued,
                    already_uploaded = stats.already_uploaded,
                    filtered = stats.files_filtered,
                    pruned = stats.dirs_pruned,
                    errors = stats.entry_errors,
                    duration_ms = stats.duration_ms,
                    "Folder scan complete"
                );
            }
        }
    }
}

/// Observer that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ScanEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl ScanObserver for RecordingObserver {
    fn on_event(&self, event: &ScanEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
